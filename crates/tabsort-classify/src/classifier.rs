//! Zero-shot classifier API
//!
//! The model itself (weights, download, inference runtime) lives outside the
//! workspace. It is reached through [`ClassifierLoader`] and used through
//! [`ZeroShotClassifier`]; [`ClassifierHandle`] loads it lazily, once.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::labels::LabelSet;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyOptions {
    /// Score labels independently instead of as one distribution
    pub multi_label: bool,
}

/// Byte progress of a model download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadProgress {
    pub loaded: u64,
    pub total: u64,
}

impl DownloadProgress {
    /// Rounded percentage, `None` when the total size is unknown
    pub fn percent(&self) -> Option<u64> {
        if self.total == 0 {
            return None;
        }
        let pct = (self.loaded as f64 / self.total as f64 * 100.0).round();
        Some(pct.clamp(0.0, 100.0) as u64)
    }
}

#[async_trait]
pub trait ZeroShotClassifier: Send + Sync {
    /// Rank the candidate labels for a text, best first
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[String],
        options: &ClassifyOptions,
    ) -> Result<Vec<LabelScore>>;
}

#[async_trait]
pub trait ClassifierLoader: Send + Sync {
    /// Instantiate the classifier, downloading weights if needed
    async fn load(
        &self,
        on_progress: &(dyn Fn(DownloadProgress) + Send + Sync),
    ) -> Result<Arc<dyn ZeroShotClassifier>>;
}

/// Lazily-initialized classifier owned by the backend that uses it.
///
/// The first successful [`get`](Self::get) loads the model; later calls reuse
/// it. A failed load is not cached, so the next run tries again.
pub struct ClassifierHandle {
    loader: Arc<dyn ClassifierLoader>,
    model: OnceCell<Arc<dyn ZeroShotClassifier>>,
}

impl ClassifierHandle {
    pub fn new(loader: Arc<dyn ClassifierLoader>) -> Self {
        Self {
            loader,
            model: OnceCell::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.model.initialized()
    }

    pub async fn get(
        &self,
        on_progress: &(dyn Fn(DownloadProgress) + Send + Sync),
    ) -> Result<Arc<dyn ZeroShotClassifier>> {
        let model = self
            .model
            .get_or_try_init(|| async {
                tracing::info!("Loading classifier");
                self.loader.load(on_progress).await
            })
            .await?;
        Ok(Arc::clone(model))
    }
}

/// Pick the winning label from a ranking.
///
/// Highest score wins; equal top scores go to the label listed first in
/// `labels`. Returns `None` for an empty ranking.
pub fn top_label(ranking: &[LabelScore], labels: &LabelSet) -> Option<String> {
    let order = |label: &str| labels.position(label).unwrap_or(usize::MAX);

    let mut best: Option<&LabelScore> = None;
    for candidate in ranking {
        best = match best {
            None => Some(candidate),
            Some(current)
                if candidate.score > current.score
                    || (candidate.score == current.score
                        && order(&candidate.label) < order(&current.label)) =>
            {
                Some(candidate)
            }
            keep => keep,
        };
    }

    best.map(|s| s.label.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn score(label: &str, score: f32) -> LabelScore {
        LabelScore {
            label: label.to_string(),
            score,
        }
    }

    struct Fixed;

    #[async_trait]
    impl ZeroShotClassifier for Fixed {
        async fn classify(
            &self,
            _text: &str,
            candidate_labels: &[String],
            _options: &ClassifyOptions,
        ) -> Result<Vec<LabelScore>> {
            Ok(candidate_labels.iter().map(|l| score(l, 0.5)).collect())
        }
    }

    struct CountingLoader {
        loads: AtomicUsize,
    }

    #[async_trait]
    impl ClassifierLoader for CountingLoader {
        async fn load(
            &self,
            on_progress: &(dyn Fn(DownloadProgress) + Send + Sync),
        ) -> Result<Arc<dyn ZeroShotClassifier>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            on_progress(DownloadProgress {
                loaded: 50,
                total: 100,
            });
            Ok(Arc::new(Fixed))
        }
    }

    #[test]
    fn test_top_label_prefers_highest_score() {
        let labels = LabelSet::from_labels(["Work", "News"]);
        let ranking = vec![score("News", 0.9), score("Work", 0.1)];
        assert_eq!(top_label(&ranking, &labels), Some("News".to_string()));
    }

    #[test]
    fn test_top_label_ties_go_to_first_label() {
        let labels = LabelSet::from_labels(["Work", "News", "Social"]);
        let ranking = vec![score("Social", 0.4), score("News", 0.4), score("Work", 0.2)];
        assert_eq!(top_label(&ranking, &labels), Some("News".to_string()));
        assert_eq!(top_label(&[], &labels), None);
    }

    #[test]
    fn test_download_percent() {
        let half = DownloadProgress {
            loaded: 1,
            total: 3,
        };
        assert_eq!(half.percent(), Some(33));
        let unknown = DownloadProgress {
            loaded: 10,
            total: 0,
        };
        assert_eq!(unknown.percent(), None);
    }

    #[tokio::test]
    async fn test_handle_loads_once() {
        let loader = Arc::new(CountingLoader {
            loads: AtomicUsize::new(0),
        });
        let handle = ClassifierHandle::new(loader.clone());
        assert!(!handle.is_loaded());

        let seen = AtomicUsize::new(0);
        let on_progress = |_: DownloadProgress| {
            seen.fetch_add(1, Ordering::SeqCst);
        };
        handle.get(&on_progress).await.unwrap();
        handle.get(&on_progress).await.unwrap();

        assert!(handle.is_loaded());
        assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }
}

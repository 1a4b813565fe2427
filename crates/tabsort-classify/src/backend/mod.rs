//! Classification backends
//!
//! All backends take the whole tab snapshot and the label set and return raw
//! groups, reporting progress on the way. Which one runs is a configuration
//! choice ([`BackendKind`]).

mod embedded;
mod prompt;
mod worker;

pub use embedded::EmbeddedBackend;
pub use prompt::PromptModelBackend;
pub use worker::WorkerBackend;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tabsort_groups::RawGroups;
use tabsort_tabs::Tab;

use crate::classifier::{top_label, ClassifyOptions, DownloadProgress, ZeroShotClassifier};
use crate::error::ClassifyError;
use crate::labels::LabelSet;
use crate::progress::ProgressSender;
use crate::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Zero-shot classifier on the calling task
    #[default]
    Embedded,
    /// Zero-shot classifier on a separate worker task
    Worker,
    /// Generative language model asked for a JSON grouping
    PromptModel,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Embedded => "embedded",
            BackendKind::Worker => "worker",
            BackendKind::PromptModel => "prompt_model",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "embedded" => Ok(BackendKind::Embedded),
            "worker" => Ok(BackendKind::Worker),
            "prompt_model" | "prompt-model" => Ok(BackendKind::PromptModel),
            _ => Err(format!("Unknown backend: {}", s)),
        }
    }
}

#[async_trait]
pub trait ClassificationBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Classify every eligible tab. Progress goes to `progress`; the caller
    /// emits the terminal event from the returned result.
    async fn classify(
        &self,
        tabs: &[Tab],
        labels: &LabelSet,
        progress: &ProgressSender,
    ) -> Result<RawGroups>;
}

/// Status text for a model download update
pub(crate) fn download_message(subject: &str, update: DownloadProgress) -> String {
    match update.percent() {
        Some(pct) => format!("Downloading {subject}: {pct}%"),
        None => format!("Downloading {subject}..."),
    }
}

/// Classify tabs one after another with a zero-shot classifier.
///
/// Tabs on an excluded scheme are skipped and land in no group. The first
/// failure aborts the whole run. `on_classified(done, total)` fires after
/// each tab.
pub(crate) async fn classify_each<T, F>(
    model: &dyn ZeroShotClassifier,
    tabs: &[Tab],
    labels: &LabelSet,
    excluded_schemes: &[String],
    text_of: T,
    mut on_classified: F,
) -> Result<RawGroups>
where
    T: Fn(&Tab) -> String,
    F: FnMut(usize, usize),
{
    let eligible: Vec<&Tab> = tabs
        .iter()
        .filter(|tab| !tab.has_excluded_scheme(excluded_schemes))
        .collect();
    let total = eligible.len();
    let options = ClassifyOptions::default();
    let mut groups = RawGroups::new();

    for (i, tab) in eligible.into_iter().enumerate() {
        let ranking = model
            .classify(&text_of(tab), labels.as_slice(), &options)
            .await?;
        let label =
            top_label(&ranking, labels).ok_or(ClassifyError::EmptyRanking { tab_id: tab.id })?;

        tracing::debug!(tab_id = tab.id, label = %label, "Classified tab");

        groups.assign(label, tab.clone());
        on_classified(i + 1, total);
    }

    Ok(groups)
}

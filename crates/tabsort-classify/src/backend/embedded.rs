//! In-process zero-shot classification

use async_trait::async_trait;
use std::sync::Arc;

use tabsort_groups::RawGroups;
use tabsort_tabs::Tab;

use super::{classify_each, download_message, BackendKind, ClassificationBackend};
use crate::classifier::{ClassifierHandle, ClassifierLoader, DownloadProgress};
use crate::labels::LabelSet;
use crate::progress::ProgressSender;
use crate::Result;

/// Classifies each tab's title and URL on the calling task.
pub struct EmbeddedBackend {
    classifier: ClassifierHandle,
    excluded_schemes: Vec<String>,
}

impl EmbeddedBackend {
    pub fn new(loader: Arc<dyn ClassifierLoader>, excluded_schemes: Vec<String>) -> Self {
        Self {
            classifier: ClassifierHandle::new(loader),
            excluded_schemes,
        }
    }

    pub fn is_model_loaded(&self) -> bool {
        self.classifier.is_loaded()
    }
}

#[async_trait]
impl ClassificationBackend for EmbeddedBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Embedded
    }

    async fn classify(
        &self,
        tabs: &[Tab],
        labels: &LabelSet,
        progress: &ProgressSender,
    ) -> Result<RawGroups> {
        let on_download =
            |update: DownloadProgress| progress.progress(download_message("model", update));
        let model = self.classifier.get(&on_download).await?;

        progress.progress("Classifying tabs...");

        classify_each(
            model.as_ref(),
            tabs,
            labels,
            &self.excluded_schemes,
            Tab::title_and_url,
            |_, _| {},
        )
        .await
    }
}

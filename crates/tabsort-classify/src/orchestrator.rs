//! Classification runs
//!
//! One run drives the configured backend over a tab snapshot. The backend
//! produces into a progress channel while the orchestrator consumes it on the
//! same task, relaying status text until the terminal event arrives.

use std::sync::Arc;
use uuid::Uuid;

use tabsort_groups::RawGroups;
use tabsort_tabs::Tab;

use crate::backend::{BackendKind, ClassificationBackend};
use crate::error::ClassifyError;
use crate::labels::LabelSet;
use crate::progress::{progress_channel, ProgressEvent};
use crate::Result;

pub struct ClassificationOrchestrator {
    backend: Arc<dyn ClassificationBackend>,
}

impl ClassificationOrchestrator {
    pub fn new(backend: Arc<dyn ClassificationBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Classify `tabs` into raw groups over `labels`.
    ///
    /// Every progress message is passed to `on_progress` in emission order.
    /// A failed run is reported once and never retried.
    pub async fn run<F>(&self, tabs: Vec<Tab>, labels: LabelSet, mut on_progress: F) -> Result<RawGroups>
    where
        F: FnMut(&str) + Send,
    {
        let run_id = Uuid::new_v4();
        let kind = self.backend.kind();
        tracing::info!(
            run_id = %run_id,
            backend = %kind,
            tabs = tabs.len(),
            labels = labels.len(),
            "Classification started"
        );

        let (tx, mut rx) = progress_channel();
        tx.progress("Loading AI model...");

        let backend = self.backend.as_ref();
        let produce = async move {
            let result = backend.classify(&tabs, &labels, &tx).await;
            match result {
                Ok(groups) => tx.complete(groups),
                Err(e) => tx.fail(e),
            }
        };

        let consume = async {
            while let Some(event) = rx.recv().await {
                match event {
                    ProgressEvent::Progress(message) => {
                        tracing::debug!(run_id = %run_id, message = %message, "Progress");
                        on_progress(&message);
                    }
                    ProgressEvent::Complete(groups) => return Ok(groups),
                    ProgressEvent::Error(e) => return Err(e),
                }
            }
            Err(ClassifyError::Disconnected)
        };

        let ((), outcome) = tokio::join!(produce, consume);

        match &outcome {
            Ok(groups) => tracing::info!(
                run_id = %run_id,
                groups = groups.len(),
                tabs = groups.tab_count(),
                "Classification complete"
            ),
            Err(e) => tracing::warn!(run_id = %run_id, error = %e, "Classification failed"),
        }

        outcome
    }
}

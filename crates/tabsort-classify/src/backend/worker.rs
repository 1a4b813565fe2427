//! Worker-delegated classification
//!
//! The classifier runs on its own task and owns its model. The backend and
//! the worker share nothing: each run is one serialized request, answered by
//! serialized progress messages and exactly one `complete` or `error`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;

use tabsort_groups::RawGroups;
use tabsort_tabs::Tab;

use super::{classify_each, download_message, BackendKind, ClassificationBackend};
use crate::classifier::{ClassifierHandle, ClassifierLoader, DownloadProgress};
use crate::error::ClassifyError;
use crate::labels::LabelSet;
use crate::progress::ProgressSender;
use crate::Result;

/// Serialized request plus the channel its messages go back on
type Envelope = (String, mpsc::UnboundedSender<String>);

#[derive(Debug, Serialize, Deserialize)]
struct WorkerRequest {
    tabs: Vec<Tab>,
    labels: LabelSet,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WorkerMessage {
    Progress { message: String },
    Complete { groups: RawGroups },
    Error { message: String },
}

pub struct WorkerBackend {
    requests: mpsc::UnboundedSender<Envelope>,
}

impl WorkerBackend {
    /// Start the worker task. Must be called from within a Tokio runtime.
    /// The worker stops when the backend is dropped.
    pub fn spawn(loader: Arc<dyn ClassifierLoader>, excluded_schemes: Vec<String>) -> Self {
        let (requests, inbox) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(
            ClassifierHandle::new(loader),
            excluded_schemes,
            inbox,
        ));
        Self { requests }
    }
}

#[async_trait]
impl ClassificationBackend for WorkerBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Worker
    }

    async fn classify(
        &self,
        tabs: &[Tab],
        labels: &LabelSet,
        progress: &ProgressSender,
    ) -> Result<RawGroups> {
        let request = serde_json::to_string(&WorkerRequest {
            tabs: tabs.to_vec(),
            labels: labels.clone(),
        })?;

        let (reply, mut replies) = mpsc::unbounded_channel();
        self.requests
            .send((request, reply))
            .map_err(|_| ClassifyError::Disconnected)?;

        while let Some(raw) = replies.recv().await {
            match serde_json::from_str::<WorkerMessage>(&raw)? {
                WorkerMessage::Progress { message } => progress.progress(message),
                WorkerMessage::Complete { groups } => return Ok(groups),
                WorkerMessage::Error { message } => {
                    return Err(ClassifyError::Classification(message))
                }
            }
        }

        Err(ClassifyError::Disconnected)
    }
}

async fn run_worker(
    classifier: ClassifierHandle,
    excluded_schemes: Vec<String>,
    mut inbox: mpsc::UnboundedReceiver<Envelope>,
) {
    tracing::debug!("Classification worker started");

    while let Some((request, reply)) = inbox.recv().await {
        let post = |message: WorkerMessage| match serde_json::to_string(&message) {
            Ok(json) => {
                let _ = reply.send(json);
            }
            Err(e) => tracing::error!(error = %e, "Could not encode worker message"),
        };

        let request: WorkerRequest = match serde_json::from_str(&request) {
            Ok(request) => request,
            Err(e) => {
                post(WorkerMessage::Error {
                    message: format!("Invalid classification request: {e}"),
                });
                continue;
            }
        };

        match handle_request(&classifier, &excluded_schemes, &request, &post).await {
            Ok(groups) => post(WorkerMessage::Complete { groups }),
            Err(e) => {
                tracing::warn!(error = %e, "Worker classification failed");
                post(WorkerMessage::Error {
                    message: e.to_string(),
                })
            }
        }
    }

    tracing::debug!("Classification worker stopped");
}

async fn handle_request(
    classifier: &ClassifierHandle,
    excluded_schemes: &[String],
    request: &WorkerRequest,
    post: &(dyn Fn(WorkerMessage) + Send + Sync),
) -> Result<RawGroups> {
    let progress = |message: String| post(WorkerMessage::Progress { message });

    let on_download = |update: DownloadProgress| progress(download_message("model", update));
    let model = classifier.get(&on_download).await?;

    progress("Classifying tabs...".to_string());

    classify_each(
        model.as_ref(),
        &request.tabs,
        &request.labels,
        excluded_schemes,
        |tab| tab.title_or_url().to_string(),
        |done, total| progress(format!("Classified {done}/{total} tabs")),
    )
    .await
}

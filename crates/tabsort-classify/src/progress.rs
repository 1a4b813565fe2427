//! Progress channel
//!
//! Single-producer, single-consumer stream of status events for one run.
//! The terminal methods consume the sender, so a producer can end the stream
//! at most once; a producer that goes away without ending it is reported to
//! the consumer as [`ClassifyError::Disconnected`].

use tokio::sync::mpsc;

use tabsort_groups::RawGroups;

use crate::error::ClassifyError;

#[derive(Debug)]
pub enum ProgressEvent {
    /// Human-readable status text
    Progress(String),
    Complete(RawGroups),
    Error(ClassifyError),
}

impl ProgressEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProgressEvent::Progress(_))
    }
}

pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        ProgressSender { tx },
        ProgressReceiver {
            rx,
            finished: false,
        },
    )
}

#[derive(Debug)]
pub struct ProgressSender {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ProgressSender {
    pub fn progress(&self, message: impl Into<String>) {
        // A consumer that stopped listening just misses the update
        let _ = self.tx.send(ProgressEvent::Progress(message.into()));
    }

    pub fn complete(self, groups: RawGroups) {
        let _ = self.tx.send(ProgressEvent::Complete(groups));
    }

    pub fn fail(self, error: ClassifyError) {
        let _ = self.tx.send(ProgressEvent::Error(error));
    }
}

#[derive(Debug)]
pub struct ProgressReceiver {
    rx: mpsc::UnboundedReceiver<ProgressEvent>,
    finished: bool,
}

impl ProgressReceiver {
    /// Next event in emission order. Returns `None` once a terminal event
    /// has been delivered.
    pub async fn recv(&mut self) -> Option<ProgressEvent> {
        if self.finished {
            return None;
        }

        let event = self
            .rx
            .recv()
            .await
            .unwrap_or(ProgressEvent::Error(ClassifyError::Disconnected));

        if event.is_terminal() {
            self.finished = true;
            self.rx.close();
        }
        Some(event)
    }
}

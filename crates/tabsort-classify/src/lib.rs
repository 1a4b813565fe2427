//! TabSort Classification
//!
//! Turns a tab snapshot and a label set into raw groups. Three backends sit
//! behind one [`ClassificationBackend`] contract:
//! - embedded: a zero-shot classifier invoked in-process, one tab at a time
//! - worker: the same classification on a separate task, reached only
//!   through serialized messages
//! - prompt model: a generative model asked once for a JSON grouping
//!
//! Progress flows back through a typed channel that always ends with exactly
//! one terminal event.

mod backend;
mod classifier;
mod error;
mod labels;
mod model;
mod orchestrator;
mod progress;

pub use backend::{
    BackendKind, ClassificationBackend, EmbeddedBackend, PromptModelBackend, WorkerBackend,
};
pub use classifier::{
    top_label, ClassifierHandle, ClassifierLoader, ClassifyOptions, DownloadProgress, LabelScore,
    ZeroShotClassifier,
};
pub use error::ClassifyError;
pub use labels::{parse_label_input, resolve_labels, LabelSet, DEFAULT_LABELS};
pub use model::{Availability, LanguageModel, PromptSession};
pub use orchestrator::ClassificationOrchestrator;
pub use progress::{progress_channel, ProgressEvent, ProgressReceiver, ProgressSender};

pub type Result<T> = std::result::Result<T, ClassifyError>;

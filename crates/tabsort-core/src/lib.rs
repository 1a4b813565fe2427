//! TabSort Core
//!
//! Coordination layer for the tab organizer. The [`Organizer`] owns the
//! settings store, the configured classification backend and the commit
//! executor, and reports progress to a [`StatusBoard`] the popup renders.

mod config;
mod error;
mod organizer;
mod status;

pub use config::Config;
pub use error::CoreError;
pub use organizer::{Organizer, Services};
pub use status::{Severity, StatusBoard, StatusUpdate};

pub use tabsort_classify::{
    Availability, BackendKind, ClassifierLoader, ClassifyError, DownloadProgress, LabelSet,
    LanguageModel, PromptSession, ZeroShotClassifier,
};
pub use tabsort_groups::{CommitSummary, GroupError, ReviewEntry, ReviewSession};
pub use tabsort_storage::{Database, StorageError};
pub use tabsort_tabs::{HostTabs, Tab, TabError, TabWindow};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}

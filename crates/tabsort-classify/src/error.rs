//! Classification error types
//!
//! Every variant is fatal to the run it occurs in. A model download in
//! progress is reported as progress, never as an error.

use thiserror::Error;

use tabsort_tabs::TabId;

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("{0}")]
    UnavailableBackend(String),

    #[error("{0}")]
    Classification(String),

    #[error("Could not parse model response: {0}")]
    Parse(String),

    #[error("Classifier returned no labels for tab {tab_id}")]
    EmptyRanking { tab_id: TabId },

    #[error("Classification stopped without a result")]
    Disconnected,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] tabsort_storage::StorageError),

    #[error(transparent)]
    Tab(#[from] tabsort_tabs::TabError),

    #[error(transparent)]
    Classify(#[from] tabsort_classify::ClassifyError),

    #[error(transparent)]
    Group(#[from] tabsort_groups::GroupError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

//! Group error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GroupError {
    #[error("No group named {0} is under review")]
    UnknownGroup(String),

    #[error("A commit is already in progress")]
    CommitInProgress,

    /// The host rejected a grouping call. Groups committed before the failure
    /// stay in place; the counts include a group the host formed but could
    /// not name.
    #[error("{message}")]
    Commit {
        message: String,
        committed_groups: usize,
        committed_tabs: usize,
    },
}

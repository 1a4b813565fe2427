//! Tab error types

use thiserror::Error;

use crate::host::GroupId;
use crate::tab::TabId;

#[derive(Error, Debug)]
pub enum TabError {
    #[error("Tab not found: {0}")]
    NotFound(TabId),

    #[error("Tab group not found: {0}")]
    GroupNotFound(GroupId),

    #[error("Cannot group an empty set of tabs")]
    EmptyGroup,

    #[error("{0}")]
    Host(String),
}

//! Host tab/window API
//!
//! The browser owns tabs and tab groups. Everything the organizer needs from
//! it goes through this trait so the pipeline can run against any host.

use async_trait::async_trait;

use crate::tab::{Tab, TabId};
use crate::Result;

/// Host-assigned tab group identifier
pub type GroupId = i64;

#[async_trait]
pub trait HostTabs: Send + Sync {
    /// Tabs of the current window, in left-to-right display order
    async fn current_window_tabs(&self) -> Result<Vec<Tab>>;

    /// Titles of the tab groups that already exist. Untitled groups may be
    /// reported as empty strings.
    async fn group_titles(&self) -> Result<Vec<String>>;

    /// Form a new tab group from the given tabs
    async fn group_tabs(&self, tab_ids: &[TabId]) -> Result<GroupId>;

    /// Set the display name of an existing group
    async fn set_group_title(&self, group_id: GroupId, title: &str) -> Result<()>;
}

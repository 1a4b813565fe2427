//! In-memory browser window
//!
//! Holds the tabs of one window and the groups formed over them. Useful as a
//! host for embedding applications that track tabs themselves, and for tests.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::TabError;
use crate::host::{GroupId, HostTabs};
use crate::tab::{Tab, TabId};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabGroup {
    pub id: GroupId,
    /// Empty until the group is named
    pub title: String,
    pub tab_ids: Vec<TabId>,
}

#[derive(Debug, Default)]
struct WindowState {
    tabs: Vec<Tab>,
    groups: Vec<TabGroup>,
    next_group_id: GroupId,
}

pub struct TabWindow {
    state: Arc<RwLock<WindowState>>,
}

impl TabWindow {
    pub fn new(tabs: Vec<Tab>) -> Self {
        Self {
            state: Arc::new(RwLock::new(WindowState {
                tabs,
                groups: Vec::new(),
                next_group_id: 1,
            })),
        }
    }

    /// Add a pre-existing named group (e.g. restored from a previous session)
    pub fn insert_group(&self, title: impl Into<String>, tab_ids: Vec<TabId>) -> GroupId {
        let mut state = self.state.write();
        let id = state.next_group_id;
        state.next_group_id += 1;
        state.groups.push(TabGroup {
            id,
            title: title.into(),
            tab_ids,
        });
        id
    }

    pub fn tabs(&self) -> Vec<Tab> {
        self.state.read().tabs.clone()
    }

    pub fn groups(&self) -> Vec<TabGroup> {
        self.state.read().groups.clone()
    }

    /// Get the group a tab currently belongs to
    pub fn group_of(&self, tab_id: TabId) -> Option<TabGroup> {
        self.state
            .read()
            .groups
            .iter()
            .find(|g| g.tab_ids.contains(&tab_id))
            .cloned()
    }
}

impl Clone for TabWindow {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

#[async_trait]
impl HostTabs for TabWindow {
    async fn current_window_tabs(&self) -> Result<Vec<Tab>> {
        Ok(self.tabs())
    }

    async fn group_titles(&self) -> Result<Vec<String>> {
        Ok(self
            .state
            .read()
            .groups
            .iter()
            .map(|g| g.title.clone())
            .collect())
    }

    async fn group_tabs(&self, tab_ids: &[TabId]) -> Result<GroupId> {
        if tab_ids.is_empty() {
            return Err(TabError::EmptyGroup);
        }

        let mut state = self.state.write();
        if let Some(missing) = tab_ids
            .iter()
            .find(|id| !state.tabs.iter().any(|t| t.id == **id))
        {
            return Err(TabError::NotFound(*missing));
        }

        // A tab belongs to at most one group; moving it empties old groups
        for group in state.groups.iter_mut() {
            group.tab_ids.retain(|id| !tab_ids.contains(id));
        }
        state.groups.retain(|g| !g.tab_ids.is_empty());

        let id = state.next_group_id;
        state.next_group_id += 1;
        state.groups.push(TabGroup {
            id,
            title: String::new(),
            tab_ids: tab_ids.to_vec(),
        });

        tracing::debug!(group_id = id, tabs = tab_ids.len(), "Formed tab group");

        Ok(id)
    }

    async fn set_group_title(&self, group_id: GroupId, title: &str) -> Result<()> {
        let mut state = self.state.write();
        let group = state
            .groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or(TabError::GroupNotFound(group_id))?;
        group.title = title.to_string();
        Ok(())
    }
}

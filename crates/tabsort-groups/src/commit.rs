//! Commit to the host
//!
//! Each final group becomes one host tab group named after it. Commits are
//! not atomic: when the host rejects a call the remaining groups are skipped
//! and the groups already formed stay in place.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use tabsort_tabs::{HostTabs, TabError, TabId};

use crate::error::GroupError;
use crate::groups::FinalGroups;
use crate::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitSummary {
    pub grouped_tab_count: usize,
    pub group_count: usize,
}

impl std::fmt::Display for CommitSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Organized {} tabs into {} groups",
            self.grouped_tab_count, self.group_count
        )
    }
}

pub struct CommitExecutor {
    host: Arc<dyn HostTabs>,
    /// Held for the duration of a commit
    in_flight: Mutex<()>,
}

impl CommitExecutor {
    pub fn new(host: Arc<dyn HostTabs>) -> Self {
        Self {
            host,
            in_flight: Mutex::new(()),
        }
    }

    /// Form and name one host group per final group.
    ///
    /// Fails with [`GroupError::CommitInProgress`] instead of waiting when
    /// another commit is still running.
    pub async fn commit(&self, groups: FinalGroups) -> Result<CommitSummary> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| GroupError::CommitInProgress)?;

        let mut summary = CommitSummary::default();

        for (name, tabs) in groups.iter() {
            if tabs.is_empty() {
                continue;
            }
            let ids: Vec<TabId> = tabs.iter().map(|t| t.id).collect();

            let group_id = match self.host.group_tabs(&ids).await {
                Ok(group_id) => group_id,
                Err(e) => return Err(rejected(name, &e, summary)),
            };

            // The host group exists from here on, named or not
            summary.grouped_tab_count += ids.len();
            summary.group_count += 1;

            if let Err(e) = self.host.set_group_title(group_id, name).await {
                return Err(rejected(name, &e, summary));
            }
        }

        tracing::info!(
            tabs = summary.grouped_tab_count,
            groups = summary.group_count,
            "Committed tab groups"
        );

        Ok(summary)
    }
}

fn rejected(group: &str, error: &TabError, summary: CommitSummary) -> GroupError {
    tracing::warn!(
        group = %group,
        committed_groups = summary.group_count,
        error = %error,
        "Host rejected tab group"
    );
    GroupError::Commit {
        message: error.to_string(),
        committed_groups: summary.group_count,
        committed_tabs: summary.grouped_tab_count,
    }
}

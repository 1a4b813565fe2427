//! Review and reconciliation
//!
//! The user sees every non-empty raw group under its original name and may
//! type a new one. Reconciliation applies the edits: a blank edit keeps the
//! original name, and groups renamed onto the same name are merged in review
//! order rather than overwriting each other.

use serde::Serialize;
use std::collections::HashMap;

use crate::error::GroupError;
use crate::groups::{FinalGroups, RawGroups};
use crate::Result;

/// Apply user renames to raw groups.
///
/// `renames` maps an original group name to the edited value. Missing or
/// blank edits keep the original name. Empty groups are dropped.
pub fn reconcile(raw: &RawGroups, renames: &HashMap<String, String>) -> FinalGroups {
    let mut groups = FinalGroups::new();

    for (original, tabs) in raw.non_empty() {
        let name = renames
            .get(original)
            .map(|edited| edited.trim())
            .filter(|edited| !edited.is_empty())
            .unwrap_or(original);

        if name != original {
            tracing::debug!(from = %original, to = %name, "Renamed group");
        }

        groups.merge(name.to_string(), tabs);
    }

    groups
}

/// One row of the review list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewEntry {
    pub original_name: String,
    /// Current value of the name field
    pub name: String,
    pub tab_titles: Vec<String>,
}

/// Proposed groups awaiting user confirmation.
///
/// Not `Clone`: [`finalize`](Self::finalize) consumes the session, so one
/// review yields at most one commit.
///
/// ```compile_fail
/// fn copyable<T: Clone>() {}
/// copyable::<tabsort_groups::ReviewSession>();
/// ```
#[derive(Debug)]
pub struct ReviewSession {
    raw: RawGroups,
    renames: HashMap<String, String>,
}

impl ReviewSession {
    pub fn new(raw: RawGroups) -> Self {
        Self {
            raw,
            renames: HashMap::new(),
        }
    }

    pub fn raw_groups(&self) -> &RawGroups {
        &self.raw
    }

    /// Rows to display, one per non-empty group
    pub fn entries(&self) -> Vec<ReviewEntry> {
        self.raw
            .non_empty()
            .map(|(original, tabs)| ReviewEntry {
                original_name: original.to_string(),
                name: self
                    .renames
                    .get(original)
                    .cloned()
                    .unwrap_or_else(|| original.to_string()),
                tab_titles: tabs.iter().map(|t| t.display_title().to_string()).collect(),
            })
            .collect()
    }

    /// Record the edited name for a group
    pub fn rename(&mut self, original: &str, name: impl Into<String>) -> Result<()> {
        if !self.raw.non_empty().any(|(n, _)| n == original) {
            return Err(GroupError::UnknownGroup(original.to_string()));
        }
        self.renames.insert(original.to_string(), name.into());
        Ok(())
    }

    /// Number of tabs under review
    pub fn tab_count(&self) -> usize {
        self.raw.tab_count()
    }

    pub fn finalize(self) -> FinalGroups {
        reconcile(&self.raw, &self.renames)
    }
}

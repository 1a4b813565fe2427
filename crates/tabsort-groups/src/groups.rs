//! Group containers
//!
//! Both containers keep names in first-insertion order so the review list
//! and the committed tab groups follow the order tabs were classified in.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use tabsort_tabs::Tab;

/// Classifier (or duplicate scan) output before user review
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawGroups {
    groups: IndexMap<String, Vec<Tab>>,
}

impl RawGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tab to a group, creating the group on first use
    pub fn assign(&mut self, name: impl Into<String>, tab: Tab) {
        self.groups.entry(name.into()).or_default().push(tab);
    }

    /// Wrap a list of tabs as a single named group. Returns `None` when there
    /// are no tabs, so an empty group never reaches review.
    pub fn single(name: impl Into<String>, tabs: Vec<Tab>) -> Option<Self> {
        if tabs.is_empty() {
            return None;
        }
        let mut groups = IndexMap::with_capacity(1);
        groups.insert(name.into(), tabs);
        Some(Self { groups })
    }

    pub fn get(&self, name: &str) -> Option<&[Tab]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Tab])> {
        self.groups
            .iter()
            .map(|(name, tabs)| (name.as_str(), tabs.as_slice()))
    }

    /// Groups holding at least one tab
    pub fn non_empty(&self) -> impl Iterator<Item = (&str, &[Tab])> {
        self.iter().filter(|(_, tabs)| !tabs.is_empty())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn tab_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

impl FromIterator<(String, Vec<Tab>)> for RawGroups {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Tab>)>>(iter: I) -> Self {
        let mut raw = RawGroups::new();
        for (name, tabs) in iter {
            raw.groups.entry(name).or_default().extend(tabs);
        }
        raw
    }
}

/// User-confirmed grouping, ready to commit.
///
/// Only reconciliation builds one, which guarantees unique names and no
/// empty entries. Not `Clone`: committing consumes it.
///
/// ```compile_fail
/// fn copyable<T: Clone>() {}
/// copyable::<tabsort_groups::FinalGroups>();
/// ```
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FinalGroups {
    groups: IndexMap<String, Vec<Tab>>,
}

impl FinalGroups {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Merge tabs into a group, appending after any tabs already there
    pub(crate) fn merge(&mut self, name: String, tabs: &[Tab]) {
        if tabs.is_empty() {
            return;
        }
        self.groups
            .entry(name)
            .or_default()
            .extend(tabs.iter().cloned());
    }

    pub fn get(&self, name: &str) -> Option<&[Tab]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Tab])> {
        self.groups
            .iter()
            .map(|(name, tabs)| (name.as_str(), tabs.as_slice()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn tab_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_keeps_first_seen_order() {
        let mut raw = RawGroups::new();
        raw.assign("News", Tab::new(1, "a", "https://a.x/"));
        raw.assign("Work", Tab::new(2, "b", "https://b.x/"));
        raw.assign("News", Tab::new(3, "c", "https://c.x/"));

        assert_eq!(raw.names().collect::<Vec<_>>(), vec!["News", "Work"]);
        let news: Vec<i64> = raw.get("News").unwrap().iter().map(|t| t.id).collect();
        assert_eq!(news, vec![1, 3]);
        assert_eq!(raw.tab_count(), 3);
    }

    #[test]
    fn test_single_skips_empty() {
        assert!(RawGroups::single("Duplicates", Vec::new()).is_none());

        let raw = RawGroups::single("Duplicates", vec![Tab::new(1, "a", "https://a.x/")]).unwrap();
        assert_eq!(raw.len(), 1);
        assert!(raw.contains("Duplicates"));
    }

    #[test]
    fn test_raw_groups_serialize_as_map() {
        let mut raw = RawGroups::new();
        raw.assign("Work", Tab::new(1, "Mail", "https://mail.x/"));

        let json = serde_json::to_value(&raw).unwrap();
        assert_eq!(json["Work"][0]["id"], 1);

        let back: RawGroups = serde_json::from_value(json).unwrap();
        assert_eq!(back, raw);
    }
}

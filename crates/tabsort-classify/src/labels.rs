//! Working label set
//!
//! Labels come from the user's comma-separated input plus the names of tab
//! groups that already exist in the browser, so earlier groupings are reused.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use tabsort_tabs::HostTabs;

pub const DEFAULT_LABELS: [&str; 7] = [
    "Work",
    "Social",
    "Entertainment",
    "Shopping",
    "News",
    "Finance",
    "Development",
];

/// Ordered, duplicate-free, never-empty set of category names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSet(Vec<String>);

impl LabelSet {
    /// Build a label set keeping the first occurrence of each label.
    /// Blank labels are skipped; an empty result falls back to the defaults.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let labels: Vec<String> = labels
            .into_iter()
            .map(Into::into)
            .filter(|label| !label.trim().is_empty())
            .filter(|label| seen.insert(label.clone()))
            .collect();

        if labels.is_empty() {
            Self::defaults()
        } else {
            Self(labels)
        }
    }

    pub fn defaults() -> Self {
        Self(DEFAULT_LABELS.iter().map(|l| l.to_string()).collect())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.0.iter().position(|l| l == label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.position(label).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Labels joined for display in an input field
    pub fn to_input(&self) -> String {
        self.0.join(", ")
    }
}

impl Default for LabelSet {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Split comma-separated input into trimmed, non-empty labels
pub fn parse_label_input(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve the working label set: user labels first, then existing group
/// titles. Never fails; a host lookup error falls back to the user labels.
pub async fn resolve_labels(input: &str, host: &dyn HostTabs) -> LabelSet {
    let mut labels = parse_label_input(input);

    match host.group_titles().await {
        Ok(titles) => {
            labels.extend(titles.into_iter().filter(|t| !t.trim().is_empty()));
        }
        Err(e) => {
            tracing::warn!(error = %e, "Could not read existing tab groups, using input labels only");
        }
    }

    let labels = LabelSet::from_labels(labels);
    tracing::debug!(labels = %labels.to_input(), "Resolved labels");
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tabsort_tabs::{GroupId, Tab, TabError, TabId, TabWindow};

    struct BrokenHost;

    #[async_trait]
    impl HostTabs for BrokenHost {
        async fn current_window_tabs(&self) -> tabsort_tabs::Result<Vec<Tab>> {
            Ok(Vec::new())
        }

        async fn group_titles(&self) -> tabsort_tabs::Result<Vec<String>> {
            Err(TabError::Host("tab groups unsupported".to_string()))
        }

        async fn group_tabs(&self, _tab_ids: &[TabId]) -> tabsort_tabs::Result<GroupId> {
            Err(TabError::Host("tab groups unsupported".to_string()))
        }

        async fn set_group_title(&self, _group_id: GroupId, _title: &str) -> tabsort_tabs::Result<()> {
            Err(TabError::Host("tab groups unsupported".to_string()))
        }
    }

    #[test]
    fn test_parse_label_input() {
        assert_eq!(
            parse_label_input(" Work, ,News ,, Fun"),
            vec!["Work", "News", "Fun"]
        );
        assert!(parse_label_input(" , ").is_empty());
    }

    #[test]
    fn test_label_set_dedupes_case_sensitively() {
        let labels = LabelSet::from_labels(["Work", "News", "Work", "work"]);
        assert_eq!(labels.as_slice(), &["Work", "News", "work"]);
    }

    #[test]
    fn test_empty_falls_back_to_defaults() {
        let labels = LabelSet::from_labels(Vec::<String>::new());
        assert_eq!(labels, LabelSet::defaults());
        assert_eq!(labels.len(), 7);
        assert_eq!(labels.iter().next(), Some("Work"));
    }

    #[tokio::test]
    async fn test_host_group_titles_are_appended() {
        let window = TabWindow::new(vec![Tab::new(1, "a", "https://a.x/")]);
        window.insert_group("Research", vec![1]);
        window.insert_group("", vec![]);
        window.insert_group("Work", vec![]);

        let labels = resolve_labels("Work, Travel", &window).await;
        assert_eq!(labels.as_slice(), &["Work", "Travel", "Research"]);
    }

    #[tokio::test]
    async fn test_host_failure_falls_back_silently() {
        let labels = resolve_labels("Travel", &BrokenHost).await;
        assert_eq!(labels.as_slice(), &["Travel"]);

        let labels = resolve_labels("", &BrokenHost).await;
        assert_eq!(labels, LabelSet::defaults());
    }

    #[tokio::test]
    async fn test_resolved_labels_never_empty_or_duplicated() {
        let inputs = ["", ",,,", "A, A, B", "  x  ,x,X", "Work,Social"];
        for input in inputs {
            let labels = resolve_labels(input, &TabWindow::new(Vec::new())).await;
            assert!(!labels.is_empty());
            let unique: HashSet<&str> = labels.iter().collect();
            assert_eq!(unique.len(), labels.len());
        }
    }
}

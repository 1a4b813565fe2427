//! Tab data structure
//!
//! A tab is the host's view of one open page: its numeric id, title and URL.

use serde::{Deserialize, Serialize};

/// Host-assigned tab identifier
pub type TabId = i64;

const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    /// Unique identifier assigned by the host
    pub id: TabId,
    /// Page title (may be empty while loading)
    pub title: String,
    /// Current URL
    pub url: String,
}

impl Tab {
    pub fn new(id: TabId, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            url: url.into(),
        }
    }

    /// Get display title (with fallback to "Untitled")
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            UNTITLED
        } else {
            &self.title
        }
    }

    /// Title and URL joined, used when the classifier should see both
    pub fn title_and_url(&self) -> String {
        format!("{} {}", self.title, self.url)
    }

    /// Title, falling back to the URL and then to "Untitled"
    pub fn title_or_url(&self) -> &str {
        if !self.title.is_empty() {
            &self.title
        } else if !self.url.is_empty() {
            &self.url
        } else {
            UNTITLED
        }
    }

    /// Check whether the URL starts with any of the given scheme prefixes
    /// (e.g. `chrome://`). Host-internal pages are never classified.
    pub fn has_excluded_scheme<S: AsRef<str>>(&self, schemes: &[S]) -> bool {
        schemes
            .iter()
            .any(|scheme| self.url.starts_with(scheme.as_ref()))
    }
}

//! Duplicate tab detection
//!
//! Tabs are compared by normalized URL. The leftmost tab with a given URL is
//! the original and is kept; every later tab with the same URL is a duplicate.

use std::collections::HashSet;
use url::Url;

use crate::tab::Tab;

/// Canonicalize a URL for comparison. Unparseable input is used as-is.
pub fn normalize_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(url) => url.to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Find duplicate tabs in host order (left-to-right).
///
/// The first occurrence of each normalized URL is never reported; every
/// subsequent occurrence is, in the order encountered.
pub fn find_duplicates(tabs: &[Tab]) -> Vec<Tab> {
    let mut seen: HashSet<String> = HashSet::with_capacity(tabs.len());
    let mut duplicates = Vec::new();

    for tab in tabs {
        let url = normalize_url(&tab.url);
        if !seen.insert(url) {
            duplicates.push(tab.clone());
        }
    }

    tracing::debug!(
        scanned = tabs.len(),
        duplicates = duplicates.len(),
        "Scanned tabs for duplicates"
    );

    duplicates
}

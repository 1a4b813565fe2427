//! Organizer configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use tabsort_classify::{BackendKind, LabelSet};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the settings database
    pub database_path: PathBuf,
    /// Classification backend used until a persisted choice overrides it
    pub backend: BackendKind,
    /// Label text offered before the user has organized anything
    pub default_labels_input: String,
    /// URL prefixes of host-internal pages that are never classified
    pub excluded_schemes: Vec<String>,
    pub duplicates_group_name: String,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("tabsort.db"),
            backend: BackendKind::default(),
            default_labels_input: LabelSet::defaults().to_input(),
            excluded_schemes: vec!["chrome://".to_string()],
            duplicates_group_name: "Duplicates".to_string(),
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("TabSort"))
            .unwrap_or_else(|| PathBuf::from(".tabsort"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config_defaults() {
        let config = Config::new(PathBuf::from("/tmp/tabsort-test"));
        assert_eq!(
            config.database_path,
            PathBuf::from("/tmp/tabsort-test/tabsort.db")
        );
        assert_eq!(config.backend, BackendKind::Embedded);
        assert_eq!(
            config.default_labels_input,
            "Work, Social, Entertainment, Shopping, News, Finance, Development"
        );
        assert_eq!(config.excluded_schemes, vec!["chrome://"]);
        assert_eq!(config.duplicates_group_name, "Duplicates");
    }

    #[test]
    fn test_config_deserializes_backend_choice() {
        let json = r#"{
            "database_path": "/tmp/t.db",
            "backend": "prompt_model",
            "default_labels_input": "Work",
            "excluded_schemes": [],
            "duplicates_group_name": "Copies"
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.backend, BackendKind::PromptModel);
        assert_eq!(config.duplicates_group_name, "Copies");
    }
}

//! Synchronization settings
//!
//! Stored in `~/.config/cstview/config.yaml`. Every field is optional in
//! the file; missing ones take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default debounce between the last edit and the render it triggers
pub const DEFAULT_DEBOUNCE_MS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Quiet period after an edit before rendering
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Style class of the text decoration for a clicked node
    #[serde(default = "default_highlight_class")]
    pub highlight_class: String,
    /// Style class marking the tree node under the cursor
    #[serde(default = "default_node_highlight_class")]
    pub node_highlight_class: String,
    /// Seed the buffer from the saved session on startup
    #[serde(default = "default_restore_session")]
    pub restore_session: bool,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_highlight_class() -> String {
    "cst-highlight".to_string()
}

fn default_node_highlight_class() -> String {
    "cst-node-active".to_string()
}

fn default_restore_session() -> bool {
    true
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            highlight_class: default_highlight_class(),
            node_highlight_class: default_node_highlight_class(),
            restore_session: default_restore_session(),
        }
    }
}

impl SyncConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`, falling back to defaults on any problem
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.debounce_ms, 30);
        assert_eq!(config.highlight_class, "cst-highlight");
        assert!(config.restore_session);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: SyncConfig = serde_yaml::from_str("debounce_ms: 120\n").unwrap();
        assert_eq!(config.debounce_ms, 120);
        assert_eq!(config.node_highlight_class, "cst-node-active");
    }

    #[test]
    fn test_invalid_yaml_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "debounce_ms: [not a number").unwrap();
        assert_eq!(SyncConfig::load_from(&path), SyncConfig::default());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            SyncConfig::load_from(&dir.path().join("nope.yaml")),
            SyncConfig::default()
        );
    }
}

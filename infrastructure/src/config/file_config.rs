//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file
//! and are deserialized directly.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Backend connection settings
    pub backend: FileBackendConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Transcript logging settings
    pub log: FileLogConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    /// Base URL of the assistant backend. Also settable via the
    /// `API_BASE_URL` environment variable.
    pub base_url: String,
}

impl Default for FileBackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
        }
    }
}

/// REPL settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Persist readline history across sessions.
    pub history: bool,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self { history: true }
    }
}

/// Transcript logging settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLogConfig {
    /// Path of the JSONL conversation transcript. Unset disables it.
    pub transcript_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = FileConfig::default();
        assert_eq!(config.backend.base_url, "http://localhost:3000/api");
        assert!(config.repl.history);
        assert!(config.log.transcript_file.is_none());
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
            [backend]
            base_url = "https://assistant.internal/api"
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.base_url, "https://assistant.internal/api");
        assert!(config.repl.history);
    }
}

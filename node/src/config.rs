//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chanvote_utils::LogFormat;

use crate::NodeError;

/// Configuration for a chanvote node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Relative store paths are
/// resolved against `data_dir`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Directory holding the keys file and the ledger.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Persisted configuration store: one section per joined channel.
    #[serde(default = "default_keys_file")]
    pub keys_file: PathBuf,

    /// LMDB directory for the vote and outbound message ledgers.
    #[serde(default = "default_ledger_dir")]
    pub ledger_dir: PathBuf,

    /// LMDB map size in bytes.
    #[serde(default = "default_ledger_map_size")]
    pub ledger_map_size: usize,

    /// How long to wait for the address service before giving up.
    #[serde(default = "default_address_timeout")]
    pub address_request_timeout_secs: u64,

    #[serde(default = "default_address_queue_capacity")]
    pub address_queue_capacity: usize,

    #[serde(default = "default_send_queue_capacity")]
    pub send_queue_capacity: usize,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./chanvote_data")
}

fn default_keys_file() -> PathBuf {
    PathBuf::from("keys.toml")
}

fn default_ledger_dir() -> PathBuf {
    PathBuf::from("ledger")
}

fn default_ledger_map_size() -> usize {
    64 * 1024 * 1024
}

fn default_address_timeout() -> u64 {
    30
}

fn default_address_queue_capacity() -> usize {
    64
}

fn default_send_queue_capacity() -> usize {
    256
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn keys_path(&self) -> PathBuf {
        self.data_dir.join(&self.keys_file)
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join(&self.ledger_dir)
    }

    pub fn address_timeout(&self) -> Duration {
        Duration::from_secs(self.address_request_timeout_secs)
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            keys_file: default_keys_file(),
            ledger_dir: default_ledger_dir(),
            ledger_map_size: default_ledger_map_size(),
            address_request_timeout_secs: default_address_timeout(),
            address_queue_capacity: default_address_queue_capacity(),
            send_queue_capacity: default_send_queue_capacity(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = NodeConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = NodeConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = NodeConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.address_timeout(), Duration::from_secs(30));
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.keys_path(), PathBuf::from("./chanvote_data/keys.toml"));
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            data_dir = "/var/lib/chanvote"
            address_request_timeout_secs = 5
            log_format = "json"
        "#;
        let config = NodeConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.address_timeout(), Duration::from_secs(5));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.ledger_path(), PathBuf::from("/var/lib/chanvote/ledger"));
        assert_eq!(config.log_level, "info"); // default
    }

    #[test]
    fn absolute_keys_file_ignores_data_dir() {
        let config = NodeConfig {
            keys_file: PathBuf::from("/etc/chanvote/keys.toml"),
            ..NodeConfig::default()
        };
        assert_eq!(config.keys_path(), PathBuf::from("/etc/chanvote/keys.toml"));
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = NodeConfig::from_toml_file("/nonexistent/chanvote.toml");
        assert!(matches!(result, Err(NodeError::Config(_))));
    }
}

//! Configuration Management
//!
//! Handles persistent configuration storage for mladmin.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Origin of the local reverse proxy in front of the cluster's Management
/// API.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Management API origin
    #[serde(default)]
    pub base_url: Option<String>,
    /// Log file opened when the Logs tab is first activated
    #[serde(default)]
    pub log_file: Option<String>,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("mladmin").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Get effective base URL (CLI > config > default)
    pub fn effective_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Get effective initial log file (config > default)
    pub fn effective_log_file(&self) -> String {
        self.log_file
            .clone()
            .unwrap_or_else(|| crate::manage::logs::DEFAULT_LOG_FILE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_proxy() {
        let config = Config::default();
        assert_eq!(config.effective_base_url(), "http://localhost:8080");
        assert_eq!(config.effective_log_file(), "ErrorLog.txt");
    }

    #[test]
    fn explicit_values_win() {
        let config = Config {
            base_url: Some("http://ml-proxy:9090".to_string()),
            log_file: Some("AuditLog.txt".to_string()),
        };
        assert_eq!(config.effective_base_url(), "http://ml-proxy:9090");
        assert_eq!(config.effective_log_file(), "AuditLog.txt");
    }
}

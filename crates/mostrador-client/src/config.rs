//! # Client Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Priority (highest first)                                               │
//! │                                                                         │
//! │  1. Environment      MOSTRADOR_API_URL, MOSTRADOR_TIMEOUT_SECS,         │
//! │                      MOSTRADOR_DB_PATH, MOSTRADOR_BAND_RULE             │
//! │  2. Config file      <config dir>/mostrador/config.toml                 │
//! │  3. Defaults         ClientConfig::default()                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! api_url = "http://192.168.0.20:5000"
//! timeout_secs = 15
//! db_path = "/var/lib/mostrador/mostrador.db"
//! band_rule = "lower_bound_inclusive"  # or "upper_bound_inclusive"
//! ```

use mostrador_core::BandRule;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};

const CONFIG_FILE: &str = "config.toml";
const DB_FILE: &str = "mostrador.db";

fn default_api_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_timeout() -> u64 {
    15
}

/// Settings of the counter client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the backend, without the `/api` suffix.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Local SQLite file. Falls back to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,

    /// How a price that equals a threshold is banded.
    #[serde(default)]
    pub band_rule: BandRule,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_url: default_api_url(),
            timeout_secs: default_timeout(),
            db_path: None,
            band_rule: BandRule::default(),
        }
    }
}

impl ClientConfig {
    // =========================================================================
    // Loading & Saving
    // =========================================================================

    /// Loads configuration: defaults, then the file (if it exists), then
    /// environment overrides. The result is validated.
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file, creating the parent directory.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = self.api_url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `MOSTRADOR_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("MOSTRADOR_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api_url = url;
        }

        if let Some(timeout) = lookup("MOSTRADOR_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(t) => self.timeout_secs = t,
                Err(_) => warn!(value = %timeout, "Ignoring invalid MOSTRADOR_TIMEOUT_SECS"),
            }
        }

        if let Some(path) = lookup("MOSTRADOR_DB_PATH") {
            self.db_path = Some(PathBuf::from(path));
        }

        if let Some(rule) = lookup("MOSTRADOR_BAND_RULE") {
            match rule.parse() {
                Ok(parsed) => {
                    debug!(rule = %rule, "Overriding band rule from environment");
                    self.band_rule = parsed;
                }
                Err(_) => warn!(rule = %rule, "Unknown band rule in environment"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "mostrador", "mostrador")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Base URL without trailing slashes.
    pub fn base_url(&self) -> &str {
        self.api_url.trim().trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The local database file: `db_path`, else the platform data
    /// directory, else the working directory.
    pub fn database_path(&self) -> PathBuf {
        if let Some(path) = &self.db_path {
            return path.clone();
        }
        directories::ProjectDirs::from("com", "mostrador", "mostrador")
            .map(|dirs| dirs.data_dir().join(DB_FILE))
            .unwrap_or_else(|| Path::new(DB_FILE).to_path_buf())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.band_rule, BandRule::LowerBoundInclusive);
        assert_eq!(config.timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ClientConfig {
            api_url: "ftp://example.com".into(),
            ..ClientConfig::default()
        };
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        let config = ClientConfig {
            timeout_secs: 0,
            ..ClientConfig::default()
        };
        assert!(matches!(config.validate(), Err(ClientError::InvalidConfig(_))));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("MOSTRADOR_API_URL", "https://tienda.example/"),
            ("MOSTRADOR_TIMEOUT_SECS", "not-a-number"),
            ("MOSTRADOR_DB_PATH", "/tmp/m.db"),
            ("MOSTRADOR_BAND_RULE", "upper"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.base_url(), "https://tienda.example");
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.database_path(), PathBuf::from("/tmp/m.db"));
        assert_eq!(config.band_rule, BandRule::UpperBoundInclusive);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = ClientConfig {
            api_url: "http://10.0.0.5:8000".into(),
            timeout_secs: 3,
            db_path: Some(dir.path().join("local.db")),
            band_rule: BandRule::UpperBoundInclusive,
        };
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("band_rule = \"upper_bound_inclusive\""));

        let loaded: ClientConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let loaded: ClientConfig = toml::from_str("api_url = \"http://x:1\"").unwrap();
        assert_eq!(loaded.timeout_secs, 15);
        assert_eq!(loaded.db_path, None);
    }
}

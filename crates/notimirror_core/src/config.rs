//! Runtime configuration.
//!
//! # Responsibility
//! - Load user configuration from a JSON file with per-field defaults.
//! - Validate values before any cache or logger is built from them.
//!
//! # Invariants
//! - A missing config file yields `Config::default()`, not an error.
//! - `cache_ttl_hours` is at least 1.
//! - Locations left as `None` are resolved by the caller.

use crate::cache::ttl_from_hours;
use crate::logging::{default_log_level, normalize_level};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CACHE_TTL_HOURS: u64 = 1;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "config read failed: {err}"),
            Self::Parse(err) => write!(f, "config is malformed: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

/// User configuration for one notimirror installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Snapshot file. `None` means the platform cache directory.
    pub cache_path: Option<PathBuf>,
    pub cache_ttl_hours: u64,
    /// JSON snapshot read by the file fetcher. `None` disables refresh.
    pub remote_path: Option<PathBuf>,
    pub log_level: String,
    /// Absolute log directory. `None` means next to the cache.
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_path: None,
            cache_ttl_hours: DEFAULT_CACHE_TTL_HOURS,
            remote_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl Config {
    /// Reads and validates the config at `path`.
    ///
    /// # Errors
    /// - `ConfigError::Io` for read failures other than a missing file.
    /// - `ConfigError::Parse` for malformed JSON.
    /// - `ConfigError::Invalid` when validation fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = match std::fs::read_to_string(path.as_ref()) {
            Ok(content) => serde_json::from_str(&content).map_err(ConfigError::Parse)?,
            Err(err) if err.kind() == ErrorKind::NotFound => Self::default(),
            Err(err) => return Err(ConfigError::Io(err)),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_ttl_hours == 0 {
            return Err(ConfigError::Invalid(
                "cache_ttl_hours must be at least 1".to_string(),
            ));
        }
        normalize_level(&self.log_level).map_err(ConfigError::Invalid)?;
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        ttl_from_hours(self.cache_ttl_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigError, DEFAULT_CACHE_TTL_HOURS};
    use std::time::Duration;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let config = Config::load(dir.path().join("absent.json")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.cache_ttl_hours, DEFAULT_CACHE_TTL_HOURS);
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"cache_ttl_hours": 6, "log_level": "warn"}"#).unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.cache_ttl_hours, 6);
        assert_eq!(config.cache_ttl(), Duration::from_secs(6 * 3600));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.cache_path, None);
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"cache_ttl_hours": 0}"#).unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "unexpected: {err}");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "unexpected: {err}");
    }
}

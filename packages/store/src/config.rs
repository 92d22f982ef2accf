//! # Client configuration: `confhub.toml`
//!
//! Defines the optional TOML file the app reads at startup
//! (filename: [`AppConfig::filename`] = `"confhub.toml"`), layered with
//! environment overrides.
//!
//! ## Structure
//!
//! ```toml
//! [api]
//! base_url = "https://api.example.org/api"
//! timeout_ms = 30000
//!
//! [storage]
//! data_dir = "/var/lib/confhub"   # omitted = platform data dir
//! ```
//!
//! ## Environment
//!
//! [`AppConfig::load`] first loads a `.env` file through `dotenvy` (if any), then
//! applies `CONFHUB_API_BASE_URL`, `CONFHUB_API_TIMEOUT_MS` and
//! `CONFHUB_DATA_DIR` on top of whatever the file said.
//!
//! All structs derive `Default` so that a missing or empty config file is
//! equivalent to the default configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_BASE_URL: &str = "CONFHUB_API_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "CONFHUB_API_TIMEOUT_MS";
pub const ENV_DATA_DIR: &str = "CONFHUB_DATA_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("api.timeout_ms must be greater than zero")]
    ZeroTimeout,
}

/// Top-level configuration stored in `confhub.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Backend connection settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Builder method to set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Where persisted session data lives.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base directory for the file store. `None` means the platform data dir.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("confhub")
        })
    }
}

impl AppConfig {
    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "confhub.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Read `confhub.toml` from `dir` if present, then apply environment overrides.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let path = dir.join(Self::filename());
        let mut config = match std::fs::read_to_string(&path) {
            Ok(raw) => Self::from_toml(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make every request fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Apply overrides from a variable lookup (the environment in production).
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            self.api.timeout_ms = raw
                .trim()
                .parse()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or(ConfigError::InvalidEnv {
                    name: ENV_TIMEOUT_MS,
                    value: raw,
                })?;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            self.storage.data_dir = Some(PathBuf::from(dir));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
    }

    #[test]
    fn test_parse_partial_file() {
        let config = AppConfig::from_toml(
            r#"
            [api]
            base_url = "https://conf.example.org/api"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://conf.example.org/api");
        assert_eq!(config.api.timeout_ms, 30_000);
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = AppConfig::default();
        config.api = ApiConfig::new("https://x.test").with_timeout(Duration::from_secs(5));
        config.storage.data_dir = Some(PathBuf::from("/tmp/confhub"));
        let parsed = AppConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_BASE_URL, "https://env.test/api"),
            (ENV_TIMEOUT_MS, "1500"),
            (ENV_DATA_DIR, "/data"),
        ]);
        let mut config = AppConfig::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.api.base_url, "https://env.test/api");
        assert_eq!(config.api.timeout_ms, 1500);
        assert_eq!(config.storage.resolved_data_dir(), PathBuf::from("/data"));
    }

    #[test]
    fn test_zero_timeout_in_file_is_rejected() {
        let config = AppConfig::from_toml("[api]\ntimeout_ms = 0\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTimeout)));
        assert!(AppConfig::default().validate().is_ok());

        let dir = std::env::temp_dir().join(format!("confhub-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(AppConfig::filename()), "[api]\ntimeout_ms = 0\n").unwrap();
        let loaded = AppConfig::load(&dir);
        std::fs::remove_dir_all(&dir).ok();
        assert!(loaded.is_err());
    }

    #[test]
    fn test_bad_timeout_is_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_overrides(|k| (k == ENV_TIMEOUT_MS).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
    }
}

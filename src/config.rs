//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendSection,

    #[serde(default)]
    pub session: SessionSection,

    #[serde(default)]
    pub sync: SyncSection,

    #[serde(default)]
    pub push: PushSection,

    #[serde(default)]
    pub alerts: AlertsSection,

    #[serde(default)]
    pub logging: LoggingSection,
}

/// Notification backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackendSection {
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_backend_url() -> String {
    "http://localhost:8082/api".to_string()
}

fn default_request_timeout() -> u64 {
    5000 // 5 seconds
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

/// Session credentials supplied by the authentication context
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionSection {
    /// Bearer token; an empty token means no valid session
    #[serde(default)]
    pub token: String,

    /// Identity used for the per-user push channel
    #[serde(default)]
    pub user_id: String,
}

impl SessionSection {
    /// Whether a session is present (token and user id both set)
    pub fn is_valid(&self) -> bool {
        !self.token.is_empty() && !self.user_id.is_empty()
    }
}

/// Polling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SyncSection {
    #[serde(default = "default_sync_interval")]
    pub interval_secs: u64,
}

fn default_sync_interval() -> u64 {
    10
}

impl Default for SyncSection {
    fn default() -> Self {
        Self {
            interval_secs: default_sync_interval(),
        }
    }
}

/// Push transport configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PushSection {
    #[serde(default = "default_push_enabled")]
    pub enabled: bool,

    #[serde(default = "default_push_url")]
    pub url: String,
}

fn default_push_enabled() -> bool {
    true
}

fn default_push_url() -> String {
    "ws://localhost:6001/ws".to_string()
}

impl Default for PushSection {
    fn default() -> Self {
        Self {
            enabled: default_push_enabled(),
            url: default_push_url(),
        }
    }
}

/// Alert delivery configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AlertsSection {
    #[serde(default = "default_haptics_enabled")]
    pub haptics: bool,
}

fn default_haptics_enabled() -> bool {
    true
}

impl Default for AlertsSection {
    fn default() -> Self {
        Self {
            haptics: default_haptics_enabled(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("herald").join("config.toml")),
            Some(PathBuf::from("/etc/herald/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Backend overrides
        if let Ok(url) = std::env::var("HERALD_BACKEND_URL") {
            self.backend.base_url = url;
        }

        // Session overrides
        if let Ok(token) = std::env::var("HERALD_TOKEN") {
            self.session.token = token;
        }
        if let Ok(user_id) = std::env::var("HERALD_USER_ID") {
            self.session.user_id = user_id;
        }

        // Sync overrides
        if let Ok(interval) = std::env::var("HERALD_SYNC_INTERVAL_SECS") {
            if let Ok(secs) = interval.parse() {
                self.sync.interval_secs = secs;
            }
        }

        // Push overrides
        if let Ok(url) = std::env::var("HERALD_PUSH_URL") {
            self.push.url = url;
        }
        if let Ok(enabled) = std::env::var("HERALD_PUSH_ENABLED") {
            if let Ok(b) = enabled.parse() {
                self.push.enabled = b;
            }
        }

        // Logging overrides
        if let Ok(level) = std::env::var("HERALD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("HERALD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendSection::default(),
            session: SessionSection::default(),
            sync: SyncSection::default(),
            push: PushSection::default(),
            alerts: AlertsSection::default(),
            logging: LoggingSection::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Herald Configuration
#
# Environment variables override these settings:
# - HERALD_BACKEND_URL
# - HERALD_TOKEN
# - HERALD_USER_ID
# - HERALD_SYNC_INTERVAL_SECS
# - HERALD_PUSH_URL
# - HERALD_PUSH_ENABLED
# - HERALD_LOG_LEVEL
# - HERALD_LOG_FORMAT

[backend]
# Notification service base URL
base_url = "http://localhost:8082/api"

# Request timeout (ms)
request_timeout_ms = 5000

[session]
# Bearer token for the notification service
token = ""

# User identity for the per-user push channel
user_id = ""

[sync]
# Polling period (seconds)
interval_secs = 10

[push]
# Enable the real-time push channel (polling continues either way)
enabled = true

# Push transport WebSocket URL
url = "ws://localhost:6001/ws"

[alerts]
# Enable best-effort device vibration
haptics = true

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.sync.interval_secs, 10);
        assert!(config.push.enabled);
        assert_eq!(config.logging.level, "info");
        assert!(!config.session.is_valid());
    }

    #[test]
    fn test_session_validity() {
        let session = SessionSection {
            token: "tok".into(),
            user_id: "42".into(),
        };
        assert!(session.is_valid());

        let no_user = SessionSection {
            token: "tok".into(),
            user_id: String::new(),
        };
        assert!(!no_user.is_valid());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[backend]
base_url = "https://example.com/api"

[session]
token = "secret"
user_id = "7"

[sync]
interval_secs = 3
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.backend.base_url, "https://example.com/api");
        assert_eq!(config.sync.interval_secs, 3);
        assert!(config.session.is_valid());
        // Untouched sections fall back to defaults
        assert_eq!(config.push.url, "ws://localhost:6001/ws");
    }

    #[test]
    fn test_load_missing_file_errors() {
        let err = Config::load(Path::new("/nonexistent/herald.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_toml_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not [valid toml").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_generated_default_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.sync.interval_secs, 10);
        assert!(config.alerts.haptics);
    }
}

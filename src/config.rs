//! Configuration module
//!
//! Reads the service configuration from a TOML file
//! (default: `~/.config/mentorhub/config.toml`, overridable via
//! `MENTORHUB_CONFIG`). Missing file falls back to defaults.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,
    /// REST API port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Database URL (e.g., "sqlite://./mentorhub.db?mode=rwc")
    pub url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://./mentorhub.db?mode=rwc".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    /// Seed credentials for the first admin account
    pub default_admin_email: String,
    pub default_admin_password: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_hours: 24,
            default_admin_email: "admin@mentorhub.local".to_string(),
            default_admin_password: "admin123".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Default config file location: `~/.config/mentorhub/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mentorhub")
        .join("config.toml")
}

// ── Static properties accessor ──────────────────────────────────

/// Flat key-value properties loaded once per process.
///
/// Keys whose values are TOML strings, integers or booleans are kept
/// (flattened to strings); everything else is ignored. A failed load is
/// reported to the caller; lookups against an uninitialized or empty set
/// simply return `None`.
#[derive(Debug, Default)]
pub struct Properties {
    values: HashMap<String, String>,
}

impl Properties {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table: toml::Table = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut values = HashMap::new();
        for (key, value) in table {
            match value {
                toml::Value::String(s) => {
                    values.insert(key, s);
                }
                toml::Value::Integer(i) => {
                    values.insert(key, i.to_string());
                }
                toml::Value::Boolean(b) => {
                    values.insert(key, b.to_string());
                }
                _ => {}
            }
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

static APP_PROPERTIES: OnceLock<Properties> = OnceLock::new();

/// Install the process-wide property set. First call wins.
pub fn init_app_properties(props: Properties) {
    let _ = APP_PROPERTIES.set(props);
}

/// Look up a property by key. `None` when the key is absent or the
/// property set was never loaded.
pub fn app_property(key: &str) -> Option<&'static str> {
    APP_PROPERTIES.get().and_then(|p| p.get(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_properties_load_and_get() {
        let mut file = tempfile_path("props.toml");
        writeln!(file.1, "mail_sender = \"noreply@mentorhub.local\"").unwrap();
        writeln!(file.1, "retention_days = 30").unwrap();
        let props = Properties::load(&file.0).unwrap();
        assert_eq!(props.get("mail_sender"), Some("noreply@mentorhub.local"));
        assert_eq!(props.get("retention_days"), Some("30"));
        assert_eq!(props.get("missing"), None);
        std::fs::remove_file(&file.0).ok();
    }

    #[test]
    fn test_properties_missing_file_is_explicit_error() {
        let err = Properties::load(Path::new("/nonexistent/props.toml"));
        assert!(matches!(err, Err(ConfigError::Io { .. })));
    }

    fn tempfile_path(name: &str) -> (PathBuf, std::fs::File) {
        let path = std::env::temp_dir().join(format!("mentorhub-test-{}-{}", std::process::id(), name));
        let file = std::fs::File::create(&path).unwrap();
        (path, file)
    }
}

//! Configuration module
//!
//! `AppConfig` is read from a TOML file, then environment variables are
//! layered on top. Every section has defaults, so a missing file or a
//! partial one is fine. Only the JWT secret has no default.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::infrastructure::crypto::JwtConfig;
use crate::infrastructure::database::DatabaseConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("JWT secret is not configured (set security.jwt_secret or JWT_SECRET)")]
    MissingJwtSecret,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests after a shutdown signal
    pub shutdown_timeout: u64,
    /// Maximum request body size in megabytes
    pub body_limit_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
            body_limit_mb: 10,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn body_limit_bytes(&self) -> usize {
        self.body_limit_mb * 1024 * 1024
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secret = if self.jwt_secret.is_empty() {
            "<unset>"
        } else {
            "<redacted>"
        };
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &secret)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load from a TOML file. A file that does not exist yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `JWT_SECRET`, `DATABASE_URL`, `HOST`, `PORT` and `LOG_LEVEL`
    /// from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secret) = lookup("JWT_SECRET") {
            self.security.jwt_secret = secret;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("Ignoring invalid PORT value: {}", port),
            }
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingJwtSecret);
        }
        Ok(())
    }

    pub fn jwt_config(&self) -> Result<JwtConfig, ConfigError> {
        JwtConfig::new(self.security.jwt_secret.clone()).map_err(|_| ConfigError::MissingJwtSecret)
    }
}

/// `~/.config/notes-service/config.toml`, or `./notes-service/config.toml`
/// when the platform has no config directory.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("notes-service")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.address(), "0.0.0.0:8080");
        assert_eq!(cfg.server.shutdown_timeout, 30);
        assert_eq!(cfg.server.body_limit_bytes(), 10 * 1024 * 1024);
        assert_eq!(cfg.database.url, "sqlite://./notes.db?mode=rwc");
        assert_eq!(cfg.logging.level, "info");
        assert!(!cfg.logging.json);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [server]
            port = 3000

            [security]
            jwt_secret = "from-file"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.database.max_connections, 10);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            AppConfig::from_toml("[server\nport = "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = AppConfig::load(Path::new("/definitely/not/here/config.toml")).unwrap();
        assert_eq!(cfg.server.port, 8080);
    }

    #[test]
    fn environment_overrides_file() {
        let env: HashMap<&str, &str> = [
            ("JWT_SECRET", "from-env"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("PORT", "9090"),
            ("LOG_LEVEL", "debug"),
        ]
        .into_iter()
        .collect();

        let mut cfg = AppConfig::from_toml("[security]\njwt_secret = \"from-file\"").unwrap();
        cfg.apply_env_from(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.security.jwt_secret, "from-env");
        assert_eq!(cfg.database.url, "sqlite::memory:");
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn invalid_port_is_ignored() {
        let mut cfg = AppConfig::default();
        cfg.apply_env_from(|k| (k == "PORT").then(|| "eighty".to_string()));
        assert_eq!(cfg.server.port, 8080);
    }

    #[test]
    fn missing_or_blank_secret_fails_validation() {
        let mut cfg = AppConfig::default();
        assert!(matches!(cfg.validate(), Err(ConfigError::MissingJwtSecret)));
        assert!(matches!(cfg.jwt_config(), Err(ConfigError::MissingJwtSecret)));

        cfg.security.jwt_secret = "   ".into();
        assert!(matches!(cfg.validate(), Err(ConfigError::MissingJwtSecret)));

        cfg.security.jwt_secret = "s3cret".into();
        assert!(cfg.jwt_config().is_ok());
    }

    #[test]
    fn debug_redacts_secret() {
        let mut cfg = AppConfig::default();
        cfg.security.jwt_secret = "super-secret-value".into();
        let printed = format!("{:?}", cfg);
        assert!(!printed.contains("super-secret-value"));
        assert!(printed.contains("<redacted>"));
    }
}

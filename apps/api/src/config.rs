//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. A `.env` file in the working directory is read first when
//! present.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use confeitaria_db::DbConfig;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub db_path: PathBuf,

    /// Maximum pooled connections
    pub db_max_connections: u32,

    /// Send the session cookie with `Secure` (behind HTTPS)
    pub secure_cookies: bool,

    /// Session inactivity expiry in seconds (default: 7 days)
    pub session_ttl_secs: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            db_path: PathBuf::from("./confeitaria.db"),
            db_max_connections: 5,
            secure_cookies: false,
            session_ttl_secs: 7 * 24 * 60 * 60,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = ServerConfig::default();

        let config = ServerConfig {
            host: env::var("CONFEITARIA_HOST").unwrap_or(defaults.host),
            port: parse_var("CONFEITARIA_PORT", defaults.port)?,
            db_path: env::var("CONFEITARIA_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            db_max_connections: parse_var(
                "CONFEITARIA_DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
            )?,
            secure_cookies: parse_var("CONFEITARIA_SECURE_COOKIES", defaults.secure_cookies)?,
            session_ttl_secs: parse_var("CONFEITARIA_SESSION_TTL_SECS", defaults.session_ttl_secs)?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "CONFEITARIA_DB_MAX_CONNECTIONS".to_string(),
            ));
        }
        if config.session_ttl_secs <= 0 {
            return Err(ConfigError::InvalidValue(
                "CONFEITARIA_SESSION_TTL_SECS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Socket address to listen on.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("CONFEITARIA_HOST".to_string()))
    }

    /// Pool settings for the configured database file.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.db_path.clone()).max_connections(self.db_max_connections)
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        Err(_) => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.bind_addr().unwrap().to_string(), "0.0.0.0:3000");
        assert!(!config.secure_cookies);
    }

    #[test]
    fn test_parse_var_falls_back_when_unset() {
        let port: u16 = parse_var("CONFEITARIA_TEST_UNSET_VARIABLE", 8080).unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_bad_host_rejected() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..ServerConfig::default()
        };
        assert!(matches!(config.bind_addr(), Err(ConfigError::InvalidValue(_))));
    }
}

//! Runtime configuration read from the environment (after `.env` is loaded)

use std::env;
use std::net::SocketAddr;

use thiserror::Error;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_USERNAME: &str = "admin";
const DEFAULT_PASSWORD: &str = "admin";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} is not a valid socket address: {value}")]
    InvalidAddress { name: &'static str, value: String },

    #[error("{name} must be true or false, got {value}")]
    InvalidFlag { name: &'static str, value: String },
}

/// Credentials of the single dashboard user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string; `None` selects the in-memory store
    pub database_url: Option<String>,
    pub bind_address: SocketAddr,
    pub credentials: Credentials,
    /// Reject `/operacoes` requests that carry no valid session
    pub require_auth: bool,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let bind_value =
            lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address = bind_value
            .parse()
            .map_err(|_| ConfigError::InvalidAddress {
                name: "BIND_ADDRESS",
                value: bind_value.clone(),
            })?;

        let credentials = Credentials {
            username: lookup("AUTH_USERNAME").unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            password: lookup("AUTH_PASSWORD").unwrap_or_else(|| DEFAULT_PASSWORD.to_string()),
        };

        Ok(Self {
            database_url,
            bind_address,
            credentials,
            require_auth: parse_flag("REQUIRE_AUTH", lookup("REQUIRE_AUTH"), false)?,
            run_migrations: parse_flag("RUN_MIGRATIONS", lookup("RUN_MIGRATIONS"), true)?,
        })
    }
}

fn parse_flag(
    name: &'static str,
    value: Option<String>,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };

    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_url, None);
        assert_eq!(config.bind_address.port(), 3000);
        assert_eq!(config.credentials, Credentials::default());
        assert!(!config.require_auth);
        assert!(config.run_migrations);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "postgresql://hub@localhost/hub"),
            ("BIND_ADDRESS", "127.0.0.1:8080"),
            ("AUTH_USERNAME", "ops"),
            ("AUTH_PASSWORD", "secret"),
            ("REQUIRE_AUTH", "true"),
            ("RUN_MIGRATIONS", "0"),
        ])
        .unwrap();

        assert_eq!(config.database_url.as_deref(), Some("postgresql://hub@localhost/hub"));
        assert_eq!(config.bind_address.to_string(), "127.0.0.1:8080");
        assert_eq!(config.credentials.username, "ops");
        assert!(config.require_auth);
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_blank_database_url_means_in_memory() {
        let config = config_from(&[("DATABASE_URL", "  ")]).unwrap();
        assert_eq!(config.database_url, None);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config_from(&[("BIND_ADDRESS", "localhost")]),
            Err(ConfigError::InvalidAddress { .. })
        ));
        assert!(matches!(
            config_from(&[("REQUIRE_AUTH", "maybe")]),
            Err(ConfigError::InvalidFlag { name: "REQUIRE_AUTH", .. })
        ));
    }
}

use std::env;

use thiserror::Error;

/// Number of records fetched by a full inventory load.
pub const DEFAULT_LOAD_LIMIT: usize = 200;

const DEFAULT_ADDRESS: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
    #[error("invalid value `{value}` for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Connection settings for the remote catalog API.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL every catalog path is appended to.
    pub base_url: String,
    /// Upper bound of records fetched by a full load.
    pub load_limit: usize,
}

impl CatalogConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            load_limit: DEFAULT_LOAD_LIMIT,
        }
    }
}

/// Settings required to start the web server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Cookie signing secret; a random key is generated when absent.
    pub secret: Option<String>,
    pub catalog: CatalogConfig,
}

impl ServerConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("CATALOG_API_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing("CATALOG_API_URL"))?;

        let load_limit = match lookup("CATALOG_LOAD_LIMIT") {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => limit,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "CATALOG_LOAD_LIMIT",
                        value,
                    });
                }
            },
            None => DEFAULT_LOAD_LIMIT,
        };

        let port = match lookup("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let address = lookup("ADDRESS").unwrap_or_else(|| DEFAULT_ADDRESS.to_string());
        let secret = lookup("SECRET_KEY").filter(|value| !value.is_empty());

        Ok(Self {
            address,
            port,
            secret,
            catalog: CatalogConfig {
                base_url: base_url.trim().to_string(),
                load_limit,
            },
        })
    }
}

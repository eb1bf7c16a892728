//! Configuration loading and representation.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file:
//!
//! | Variable                   | Default  | Meaning                              |
//! |----------------------------|----------|--------------------------------------|
//! | `STOREFRONT_BACKEND`       | `memory` | `memory` or `postgres`               |
//! | `DATABASE_URL`             | (none)   | required when backend is `postgres`  |
//! | `DATABASE_MAX_CONNECTIONS` | `5`      | pool size for the Postgres backend   |
//! | `STOREFRONT_LOG_FORMAT`    | `json`   | `json` or `pretty`                   |

use core::str::FromStr;

use thiserror::Error;

use storefront_observability::LogFormat;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Which storage the services are wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    InMemory,
    Postgres,
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "in-memory" | "in_memory" => Ok(Backend::InMemory),
            "postgres" | "postgresql" => Ok(Backend::Postgres),
            other => Err(ConfigError::Invalid {
                var: "STOREFRONT_BACKEND",
                reason: format!("unknown backend '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub backend: Backend,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: Backend::InMemory,
            database_url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            log_format: LogFormat::Json,
        }
    }
}

impl AppConfig {
    /// Load from the environment, reading `.env` first if one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup("STOREFRONT_BACKEND") {
            Some(raw) => raw.parse::<Backend>()?,
            None => Backend::default(),
        };

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if backend == Backend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => {
                let n = raw.trim().parse::<u32>().map_err(|e| ConfigError::Invalid {
                    var: "DATABASE_MAX_CONNECTIONS",
                    reason: e.to_string(),
                })?;
                if n == 0 {
                    return Err(ConfigError::Invalid {
                        var: "DATABASE_MAX_CONNECTIONS",
                        reason: "must be at least 1".to_string(),
                    });
                }
                n
            }
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let log_format = match lookup("STOREFRONT_LOG_FORMAT") {
            Some(raw) => raw.parse::<LogFormat>().map_err(|e| ConfigError::Invalid {
                var: "STOREFRONT_LOG_FORMAT",
                reason: e.to_string(),
            })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            backend,
            database_url,
            max_connections,
            log_format,
        })
    }
}

//! Database configuration
//!
//! Pool sizing and timeouts for the PostgreSQL/PostGIS connection.

use std::env;
use std::time::Duration;

use super::{parse_or, ConfigError};

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let max_connections: u32 = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 20)?;
        let min_connections: u32 = parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", 1)?;
        if min_connections > max_connections {
            return Err(ConfigError::Invalid {
                key: "DATABASE_MIN_CONNECTIONS",
                value: min_connections.to_string(),
            });
        }

        Ok(Self {
            url,
            max_connections,
            min_connections,
            connect_timeout: Duration::from_secs(parse_or(
                &lookup,
                "DATABASE_CONNECT_TIMEOUT_SECS",
                30,
            )?),
            idle_timeout: Duration::from_secs(parse_or(
                &lookup,
                "DATABASE_IDLE_TIMEOUT_SECS",
                300,
            )?),
            max_lifetime: Duration::from_secs(parse_or(
                &lookup,
                "DATABASE_MAX_LIFETIME_SECS",
                3600,
            )?),
        })
    }
}

//! Environment configuration
//!
//! Server address, CORS and request defaults.

use axum::http::HeaderValue;
use std::env;
use std::time::Duration;

use super::{parse_or, ConfigError};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    /// Empty means any origin is allowed
    pub cors_origins: Vec<String>,
    /// Radius used by `GET /routes/nearby` when the caller gives none
    pub default_nearby_distance_m: f64,
    /// Deadline attached to each store call made by the HTTP layer
    pub query_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origins: Vec::new(),
            default_nearby_distance_m: 10_000.0,
            query_timeout: Duration::from_secs(30),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let default_nearby_distance_m = parse_or(
            &lookup,
            "DEFAULT_NEARBY_DISTANCE_M",
            defaults.default_nearby_distance_m,
        )?;
        if !default_nearby_distance_m.is_finite() || default_nearby_distance_m < 0.0 {
            return Err(ConfigError::Invalid {
                key: "DEFAULT_NEARBY_DISTANCE_M",
                value: default_nearby_distance_m.to_string(),
            });
        }

        Ok(Self {
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            cors_origins: lookup("CORS_ORIGINS")
                .map(|origins| parse_origins(&origins))
                .transpose()?
                .unwrap_or_default(),
            default_nearby_distance_m,
            query_timeout: Duration::from_secs(parse_or(
                &lookup,
                "QUERY_TIMEOUT_SECS",
                defaults.query_timeout.as_secs(),
            )?),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Comma-separated origins, each of which must be a valid header value
fn parse_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| match HeaderValue::from_str(origin) {
            Ok(_) => Ok(origin.to_string()),
            Err(_) => Err(ConfigError::Invalid {
                key: "CORS_ORIGINS",
                value: origin.to_string(),
            }),
        })
        .collect()
}

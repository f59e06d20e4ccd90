//! Route model
//!
//! Persisted shape of the `routes` table. `path` is always the normalized
//! text form produced by the geometry codec.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Route {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// `LINESTRING(lng lat, ...)` in EPSG:4326
    pub path: String,
    pub created_at: DateTime<Utc>,
}

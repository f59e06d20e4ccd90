use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Recommended stop along a route (viewpoint, shop, landmark...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RecommendedStop {
    pub id: i64,
    pub route_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub stop_type: String,
    pub description: String,
    /// `POINT(lng lat)` in EPSG:4326
    pub location: String,
    pub created_at: DateTime<Utc>,
}

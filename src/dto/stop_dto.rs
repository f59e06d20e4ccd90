use serde::Deserialize;
use validator::Validate;

/// Input for creating a stop. The id is assigned by the store.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewStop {
    #[validate(range(min = 1))]
    pub route_id: i64,

    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub stop_type: String,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,

    /// `POINT(lng lat)`
    pub location: String,
}

/// Replaces every mutable field of a stop. The owning route is fixed at
/// creation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StopChanges {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub stop_type: String,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,

    pub location: String,
}

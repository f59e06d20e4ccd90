use serde::Deserialize;
use validator::Validate;

/// Input for creating a route. The id is chosen by the caller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewRoute {
    #[validate(range(min = 1))]
    pub id: i64,

    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,

    /// `LINESTRING(lng lat, ...)`
    pub path: String,
}

/// Replaces every mutable field of a route
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RouteChanges {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,

    pub path: String,
}

/// Query string of `GET /routes/nearby`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NearbyQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,

    /// Metres; the configured default applies when absent
    #[validate(range(min = 0.0))]
    pub distance: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_route_validation() {
        let route = NewRoute {
            id: 1,
            name: "Coastal drive".to_string(),
            description: String::new(),
            path: "LINESTRING(-122.4 37.7, -122.3 37.8)".to_string(),
        };
        assert!(route.validate().is_ok());

        let nameless = NewRoute {
            name: String::new(),
            ..route.clone()
        };
        assert!(nameless.validate().is_err());

        let zero_id = NewRoute { id: 0, ..route };
        assert!(zero_id.validate().is_err());
    }

    #[test]
    fn test_nearby_query_ranges() {
        let query = NearbyQuery {
            lat: 37.7,
            lng: -122.4,
            distance: None,
        };
        assert!(query.validate().is_ok());

        let query = NearbyQuery {
            lat: 91.0,
            lng: -122.4,
            distance: Some(100.0),
        };
        assert!(query.validate().is_err());

        let query = NearbyQuery {
            lat: 0.0,
            lng: 0.0,
            distance: Some(-1.0),
        };
        assert!(query.validate().is_err());
    }
}

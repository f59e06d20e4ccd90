//! Scenarios every store backend must pass. Each one expects empty tables.
#![allow(dead_code)]

use std::sync::Arc;

use travel_routes::dto::{NewRoute, NewStop, RouteChanges, StopChanges};
use travel_routes::{RequestContext, RouteStore, StopStore, StoreError};

pub struct Stores {
    pub routes: Arc<dyn RouteStore>,
    pub stops: Arc<dyn StopStore>,
}

pub fn ctx() -> RequestContext {
    RequestContext::background()
}

pub fn new_route(id: i64, path: &str) -> NewRoute {
    NewRoute {
        id,
        name: format!("Route {}", id),
        description: format!("Description of route {}", id),
        path: path.to_string(),
    }
}

pub fn new_stop(route_id: i64, name: &str, location: &str) -> NewStop {
    NewStop {
        route_id,
        name: name.to_string(),
        stop_type: "viewpoint".to_string(),
        description: String::new(),
        location: location.to_string(),
    }
}

// 0.0045 and 0.045 degrees of latitude are ~500 m and ~5000 m
pub const ON_ORIGIN: &str = "LINESTRING(-0.01 0, 0.01 0)";
pub const NEAR_ORIGIN: &str = "LINESTRING(-0.01 0.0045, 0.01 0.0045)";
pub const FAR_FROM_ORIGIN: &str = "LINESTRING(-0.01 0.045, 0.01 0.045)";

pub async fn create_then_lookup(s: &Stores) {
    let input = new_route(1, "LINESTRING(-122.4 37.7, -122.3 37.8)");
    let created = s.routes.create(&ctx(), &input).await.unwrap();

    let found = s.routes.get_by_id(&ctx(), 1).await.unwrap().expect("route 1");
    assert_eq!(found.id, input.id);
    assert_eq!(found.name, input.name);
    assert_eq!(found.description, input.description);
    assert_eq!(found.path, input.path);
    assert_eq!(found.created_at, created.created_at);
}

pub async fn path_is_normalized(s: &Stores) {
    let input = new_route(2, "linestring( -122.40  37.70 ,-122.3 37.8 )");
    let created = s.routes.create(&ctx(), &input).await.unwrap();
    assert_eq!(created.path, "LINESTRING(-122.4 37.7, -122.3 37.8)");
}

pub async fn nearby_ordering(s: &Stores) {
    // inserted out of distance order on purpose
    for (id, path) in [(3, FAR_FROM_ORIGIN), (2, NEAR_ORIGIN), (1, ON_ORIGIN)] {
        s.routes.create(&ctx(), &new_route(id, path)).await.unwrap();
    }

    let nearby = s.routes.get_nearby(&ctx(), 0.0, 0.0, 1000.0).await.unwrap();
    let ids: Vec<i64> = nearby.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2]);

    let all = s.routes.get_nearby(&ctx(), 0.0, 0.0, 10_000.0).await.unwrap();
    let ids: Vec<i64> = all.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    // restartable: asking again gives the same sequence
    let again = s.routes.get_nearby(&ctx(), 0.0, 0.0, 10_000.0).await.unwrap();
    assert_eq!(all, again);
}

pub async fn nearby_ties_by_id(s: &Stores) {
    s.routes.create(&ctx(), &new_route(9, ON_ORIGIN)).await.unwrap();
    s.routes.create(&ctx(), &new_route(4, ON_ORIGIN)).await.unwrap();

    let nearby = s.routes.get_nearby(&ctx(), 0.0, 0.0, 100.0).await.unwrap();
    let ids: Vec<i64> = nearby.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![4, 9]);
}

pub async fn nearby_empty_is_not_an_error(s: &Stores) {
    let nearby = s.routes.get_nearby(&ctx(), 45.0, 45.0, 1000.0).await.unwrap();
    assert!(nearby.is_empty());

    s.routes.create(&ctx(), &new_route(1, FAR_FROM_ORIGIN)).await.unwrap();
    let nearby = s.routes.get_nearby(&ctx(), 0.0, 0.0, 1000.0).await.unwrap();
    assert!(nearby.is_empty());
}

pub async fn nearby_rejects_bad_query(s: &Stores) {
    let err = s.routes.get_nearby(&ctx(), 0.0, 0.0, -1.0).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidGeometry(_)));

    let err = s.routes.get_nearby(&ctx(), 100.0, 0.0, 10.0).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidGeometry(_)));
}

pub async fn duplicate_route_id(s: &Stores) {
    s.routes.create(&ctx(), &new_route(1, ON_ORIGIN)).await.unwrap();
    let err = s
        .routes
        .create(&ctx(), &new_route(1, NEAR_ORIGIN))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::ConstraintViolation { .. }), "{:?}", err);

    // the first insert is untouched
    let route = s.routes.get_by_id(&ctx(), 1).await.unwrap().unwrap();
    assert_eq!(route.path, ON_ORIGIN);
}

pub async fn invalid_geometry_rejected(s: &Stores) {
    let err = s
        .routes
        .create(&ctx(), &new_route(1, "LINESTRING(1 2"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidGeometry(_)));

    // a point is not a path
    let err = s
        .routes
        .create(&ctx(), &new_route(1, "POINT(1 2)"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidGeometry(_)));
    assert!(s.routes.get_by_id(&ctx(), 1).await.unwrap().is_none());

    s.routes.create(&ctx(), &new_route(1, ON_ORIGIN)).await.unwrap();
    let err = s
        .stops
        .create(&ctx(), &new_stop(1, "Bad", "LINESTRING(0 0, 1 1)"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidGeometry(_)));
}

pub async fn not_found_distinction(s: &Stores) {
    assert_eq!(s.routes.get_by_id(&ctx(), 404).await.unwrap(), None);
    assert_eq!(s.stops.get_by_id(&ctx(), 404).await.unwrap(), None);
}

pub async fn update_replaces_fields(s: &Stores) {
    let created = s.routes.create(&ctx(), &new_route(1, ON_ORIGIN)).await.unwrap();
    let changes = RouteChanges {
        name: "Renamed".to_string(),
        description: "New description".to_string(),
        path: NEAR_ORIGIN.to_string(),
    };

    let updated = s.routes.update(&ctx(), 1, &changes).await.unwrap().unwrap();
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.description, "New description");
    assert_eq!(updated.path, NEAR_ORIGIN);
    assert_eq!(updated.created_at, created.created_at);

    let found = s.routes.get_by_id(&ctx(), 1).await.unwrap().unwrap();
    assert_eq!(found, updated);
}

pub async fn update_missing_matches_nothing(s: &Stores) {
    let changes = RouteChanges {
        name: "Ghost".to_string(),
        description: String::new(),
        path: ON_ORIGIN.to_string(),
    };
    assert_eq!(s.routes.update(&ctx(), 77, &changes).await.unwrap(), None);
    assert_eq!(s.routes.get_by_id(&ctx(), 77).await.unwrap(), None);

    let changes = StopChanges {
        name: "Ghost".to_string(),
        stop_type: "shop".to_string(),
        description: String::new(),
        location: "POINT(0 0)".to_string(),
    };
    assert_eq!(s.stops.update(&ctx(), 77, &changes).await.unwrap(), None);
}

pub async fn idempotent_delete(s: &Stores) {
    s.routes.create(&ctx(), &new_route(1, ON_ORIGIN)).await.unwrap();
    assert!(s.routes.delete(&ctx(), 1).await.unwrap());
    assert!(!s.routes.delete(&ctx(), 1).await.unwrap());
    assert_eq!(s.routes.get_by_id(&ctx(), 1).await.unwrap(), None);

    s.routes.create(&ctx(), &new_route(2, ON_ORIGIN)).await.unwrap();
    let stop = s
        .stops
        .create(&ctx(), &new_stop(2, "Lookout", "POINT(0 0)"))
        .await
        .unwrap();
    assert!(s.stops.delete(&ctx(), stop.id).await.unwrap());
    assert!(!s.stops.delete(&ctx(), stop.id).await.unwrap());
}

pub async fn scoped_retrieval(s: &Stores) {
    for id in [1, 2, 3] {
        s.routes.create(&ctx(), &new_route(id, ON_ORIGIN)).await.unwrap();
    }
    let placements = [(1, "a"), (2, "b"), (1, "c"), (3, "d"), (2, "e"), (1, "f")];
    for (route_id, name) in placements {
        s.stops
            .create(&ctx(), &new_stop(route_id, name, "POINT(0 0)"))
            .await
            .unwrap();
    }

    let stops = s.stops.get_by_route_id(&ctx(), 1).await.unwrap();
    assert!(stops.iter().all(|stop| stop.route_id == 1));
    let names: Vec<&str> = stops.iter().map(|stop| stop.name.as_str()).collect();
    assert_eq!(names, vec!["a", "c", "f"]);

    // ids ascending
    assert!(stops.windows(2).all(|pair| pair[0].id < pair[1].id));

    assert!(s.stops.get_by_route_id(&ctx(), 99).await.unwrap().is_empty());
}

pub async fn stop_requires_route(s: &Stores) {
    let err = s
        .stops
        .create(&ctx(), &new_stop(42, "Orphan", "POINT(0 0)"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::ConstraintViolation { .. }), "{:?}", err);
}

pub async fn stop_update_replaces_fields(s: &Stores) {
    s.routes.create(&ctx(), &new_route(1, ON_ORIGIN)).await.unwrap();
    let stop = s
        .stops
        .create(&ctx(), &new_stop(1, "Lookout", "POINT(0 0)"))
        .await
        .unwrap();

    let changes = StopChanges {
        name: "Corner shop".to_string(),
        stop_type: "shop".to_string(),
        description: "Snacks".to_string(),
        location: "POINT(0.001 0.002)".to_string(),
    };
    let updated = s.stops.update(&ctx(), stop.id, &changes).await.unwrap().unwrap();
    assert_eq!(updated.route_id, 1);
    assert_eq!(updated.name, "Corner shop");
    assert_eq!(updated.stop_type, "shop");
    assert_eq!(updated.description, "Snacks");
    assert_eq!(updated.location, "POINT(0.001 0.002)");
    assert_eq!(updated.created_at, stop.created_at);
}

pub async fn delete_route_removes_its_stops(s: &Stores) {
    s.routes.create(&ctx(), &new_route(1, ON_ORIGIN)).await.unwrap();
    s.routes.create(&ctx(), &new_route(2, ON_ORIGIN)).await.unwrap();
    s.stops
        .create(&ctx(), &new_stop(1, "Gone", "POINT(0 0)"))
        .await
        .unwrap();
    let kept = s
        .stops
        .create(&ctx(), &new_stop(2, "Kept", "POINT(0 0)"))
        .await
        .unwrap();

    s.routes.delete(&ctx(), 1).await.unwrap();
    assert!(s.stops.get_by_route_id(&ctx(), 1).await.unwrap().is_empty());
    assert_eq!(s.stops.get_by_id(&ctx(), kept.id).await.unwrap(), Some(kept));
}

pub async fn example_scenario(s: &Stores) {
    let route = NewRoute {
        id: 1,
        name: "Bay loop".to_string(),
        description: String::new(),
        path: "LINESTRING(-122.4 37.7, -122.3 37.8)".to_string(),
    };
    s.routes.create(&ctx(), &route).await.unwrap();
    s.stops
        .create(&ctx(), &new_stop(1, "Midpoint", "POINT(-122.35 37.75)"))
        .await
        .unwrap();

    let stops = s.stops.get_by_route_id(&ctx(), 1).await.unwrap();
    assert_eq!(stops.len(), 1);
    assert_eq!(stops[0].location, "POINT(-122.35 37.75)");
}

//! Data access layer
//!
//! `RouteStore` and `StopStore` are the contracts the HTTP layer calls into.
//! Two backends implement them: PostGIS over a shared `PgPool`, and an
//! in-memory database used by tests and local runs.

pub mod memory_store;
pub mod route_repository;
pub mod stop_repository;

pub use memory_store::InMemoryStore;
pub use route_repository::RouteRepository;
pub use stop_repository::StopRepository;

use async_trait::async_trait;
use geo::Point;

use crate::dto::{NewRoute, NewStop, RouteChanges, StopChanges};
use crate::geometry::{GeometryCodec, GeometryKind, InvalidGeometry, Srid, StoredGeometry};
use crate::models::{RecommendedStop, Route};
use crate::utils::context::RequestContext;
use crate::utils::errors::StoreError;

#[async_trait]
pub trait RouteStore: Send + Sync {
    /// Insert a route under its caller-chosen id.
    /// A duplicate id is a `ConstraintViolation`.
    async fn create(&self, ctx: &RequestContext, route: &NewRoute) -> Result<Route, StoreError>;

    async fn get_by_id(&self, ctx: &RequestContext, id: i64) -> Result<Option<Route>, StoreError>;

    /// Routes whose path passes within `distance_meters` of `(lng, lat)`,
    /// nearest first, ties by id.
    async fn get_nearby(
        &self,
        ctx: &RequestContext,
        lat: f64,
        lng: f64,
        distance_meters: f64,
    ) -> Result<Vec<Route>, StoreError>;

    /// Replace name, description and path. `None` when no route has `id`.
    async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        changes: &RouteChanges,
    ) -> Result<Option<Route>, StoreError>;

    /// `true` when a row was removed. Deleting a missing id is not an error.
    async fn delete(&self, ctx: &RequestContext, id: i64) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait StopStore: Send + Sync {
    /// Insert a stop; the store assigns its id. The route must exist.
    async fn create(
        &self,
        ctx: &RequestContext,
        stop: &NewStop,
    ) -> Result<RecommendedStop, StoreError>;

    async fn get_by_id(
        &self,
        ctx: &RequestContext,
        id: i64,
    ) -> Result<Option<RecommendedStop>, StoreError>;

    /// Every stop of `route_id`, by id ascending
    async fn get_by_route_id(
        &self,
        ctx: &RequestContext,
        route_id: i64,
    ) -> Result<Vec<RecommendedStop>, StoreError>;

    async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        changes: &StopChanges,
    ) -> Result<Option<RecommendedStop>, StoreError>;

    async fn delete(&self, ctx: &RequestContext, id: i64) -> Result<bool, StoreError>;
}

/// Liveness of the backing store
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn health(&self, ctx: &RequestContext) -> Result<(), StoreError>;
}

pub(crate) fn encode_path(text: &str) -> Result<StoredGeometry, StoreError> {
    let geometry = GeometryCodec::encode(text, Srid::WGS84)?;
    Ok(geometry.expect_kind(GeometryKind::LineString)?)
}

pub(crate) fn encode_location(text: &str) -> Result<StoredGeometry, StoreError> {
    let geometry = GeometryCodec::encode(text, Srid::WGS84)?;
    Ok(geometry.expect_kind(GeometryKind::Point)?)
}

/// Validate a nearby query and build its WGS84 origin
pub(crate) fn nearby_origin(
    lat: f64,
    lng: f64,
    distance_meters: f64,
) -> Result<Point<f64>, StoreError> {
    if !distance_meters.is_finite() || distance_meters < 0.0 {
        return Err(InvalidGeometry::new(format!(
            "search distance {} must be a finite, non-negative number of metres",
            distance_meters
        ))
        .into());
    }
    Ok(GeometryCodec::query_point(lng, lat)?)
}

/// Re-normalize geometry text read back from the database. A row that
/// cannot be decoded is a fault of the store, not of the caller.
pub(crate) fn decode_stored(
    operation: &'static str,
    entity: String,
    text: &str,
) -> Result<String, StoreError> {
    GeometryCodec::normalize(text).map_err(|e| StoreError::fault(operation, entity, e))
}

/// Translate a sqlx failure into the store taxonomy
pub(crate) fn map_sqlx_error(
    operation: &'static str,
    entity: String,
    err: sqlx::Error,
) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        // unique_violation, foreign_key_violation, not_null_violation
        if let Some("23505" | "23503" | "23502") = db.code().as_deref() {
            return StoreError::constraint(operation, entity, db.message());
        }
    }
    StoreError::fault(operation, entity, err)
}

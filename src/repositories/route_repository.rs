use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};

use super::{decode_stored, encode_path, map_sqlx_error, nearby_origin, HealthCheck, RouteStore};
use crate::dto::{NewRoute, RouteChanges};
use crate::geometry::{GeometryCodec, Srid};
use crate::models::Route;
use crate::utils::context::RequestContext;
use crate::utils::errors::StoreError;

const ROUTE_COLUMNS: &str = "id, name, description, ST_AsText(path) AS path, created_at";

/// PostGIS-backed route store. One instance owns the shared pool for the
/// lifetime of the process; every method is a single statement.
#[derive(Clone)]
pub struct RouteRepository {
    pool: PgPool,
}

impl RouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn normalize(operation: &'static str, mut route: Route) -> Result<Route, StoreError> {
        route.path = decode_stored(operation, format!("route {}", route.id), &route.path)?;
        Ok(route)
    }
}

#[async_trait]
impl RouteStore for RouteRepository {
    async fn create(&self, ctx: &RequestContext, route: &NewRoute) -> Result<Route, StoreError> {
        const OP: &str = "create_route";
        let path = encode_path(&route.path)?;
        debug!("🗺️ Creating route {}", route.id);

        let query = format!(
            r#"
            INSERT INTO routes (id, name, description, path, created_at)
            VALUES ($1, $2, $3, ST_GeomFromText($4, $5), NOW())
            RETURNING {}
            "#,
            ROUTE_COLUMNS
        );

        let created = ctx
            .run(OP, async {
                sqlx::query_as::<_, Route>(&query)
                    .bind(route.id)
                    .bind(&route.name)
                    .bind(&route.description)
                    .bind(GeometryCodec::decode(&path))
                    .bind(path.srid().code())
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| map_sqlx_error(OP, format!("route {}", route.id), e))
            })
            .await?;

        info!("✅ Route {} created", created.id);
        Self::normalize(OP, created)
    }

    async fn get_by_id(&self, ctx: &RequestContext, id: i64) -> Result<Option<Route>, StoreError> {
        const OP: &str = "get_route";
        debug!("🔍 Fetching route {}", id);

        let query = format!("SELECT {} FROM routes WHERE id = $1", ROUTE_COLUMNS);
        let row = ctx
            .run(OP, async {
                sqlx::query_as::<_, Route>(&query)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| map_sqlx_error(OP, format!("route {}", id), e))
            })
            .await?;

        row.map(|route| Self::normalize(OP, route)).transpose()
    }

    async fn get_nearby(
        &self,
        ctx: &RequestContext,
        lat: f64,
        lng: f64,
        distance_meters: f64,
    ) -> Result<Vec<Route>, StoreError> {
        const OP: &str = "nearby_routes";
        let origin = nearby_origin(lat, lng, distance_meters)?;
        debug!("📍 Routes within {}m of ({}, {})", distance_meters, lng, lat);

        // geography casts make both the threshold and the ordering metres
        let query = format!(
            r#"
            SELECT {}
            FROM routes
            WHERE ST_DWithin(
                path::geography,
                ST_SetSRID(ST_MakePoint($1, $2), $4)::geography,
                $3
            )
            ORDER BY ST_Distance(
                path::geography,
                ST_SetSRID(ST_MakePoint($1, $2), $4)::geography
            ) ASC, id ASC
            "#,
            ROUTE_COLUMNS
        );

        let rows = ctx
            .run(OP, async {
                sqlx::query_as::<_, Route>(&query)
                    .bind(origin.x())
                    .bind(origin.y())
                    .bind(distance_meters)
                    .bind(Srid::WGS84.code())
                    .fetch_all(&self.pool)
                    .await
                    .map_err(|e| {
                        map_sqlx_error(OP, format!("routes near ({} {})", lng, lat), e)
                    })
            })
            .await?;

        debug!("📍 {} routes found", rows.len());
        rows.into_iter()
            .map(|route| Self::normalize(OP, route))
            .collect()
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        changes: &RouteChanges,
    ) -> Result<Option<Route>, StoreError> {
        const OP: &str = "update_route";
        let path = encode_path(&changes.path)?;

        let query = format!(
            r#"
            UPDATE routes
            SET name = $2, description = $3, path = ST_GeomFromText($4, $5)
            WHERE id = $1
            RETURNING {}
            "#,
            ROUTE_COLUMNS
        );

        let updated = ctx
            .run(OP, async {
                sqlx::query_as::<_, Route>(&query)
                    .bind(id)
                    .bind(&changes.name)
                    .bind(&changes.description)
                    .bind(GeometryCodec::decode(&path))
                    .bind(path.srid().code())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| map_sqlx_error(OP, format!("route {}", id), e))
            })
            .await?;

        match &updated {
            Some(_) => info!("✏️ Route {} updated", id),
            None => debug!("✏️ Route {} not found, nothing updated", id),
        }
        updated.map(|route| Self::normalize(OP, route)).transpose()
    }

    async fn delete(&self, ctx: &RequestContext, id: i64) -> Result<bool, StoreError> {
        const OP: &str = "delete_route";

        let result = ctx
            .run(OP, async {
                sqlx::query("DELETE FROM routes WHERE id = $1")
                    .bind(id)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| map_sqlx_error(OP, format!("route {}", id), e))
            })
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("🗑️ Route {} deleted", id);
        }
        Ok(deleted)
    }
}

#[async_trait]
impl HealthCheck for RouteRepository {
    async fn health(&self, ctx: &RequestContext) -> Result<(), StoreError> {
        ctx.run("health", async {
            sqlx::query("SELECT 1")
                .execute(&self.pool)
                .await
                .map(|_| ())
                .map_err(|e| map_sqlx_error("health", "database".to_string(), e))
        })
        .await
    }
}

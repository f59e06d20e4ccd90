use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};

use super::{decode_stored, encode_location, map_sqlx_error, StopStore};
use crate::dto::{NewStop, StopChanges};
use crate::geometry::GeometryCodec;
use crate::models::RecommendedStop;
use crate::utils::context::RequestContext;
use crate::utils::errors::StoreError;

const STOP_COLUMNS: &str =
    r#"id, route_id, name, "type", description, ST_AsText(location) AS location, created_at"#;

/// PostGIS-backed store for `recommended_stops`
#[derive(Clone)]
pub struct StopRepository {
    pool: PgPool,
}

impl StopRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn normalize(
        operation: &'static str,
        mut stop: RecommendedStop,
    ) -> Result<RecommendedStop, StoreError> {
        stop.location = decode_stored(operation, format!("stop {}", stop.id), &stop.location)?;
        Ok(stop)
    }
}

#[async_trait]
impl StopStore for StopRepository {
    async fn create(
        &self,
        ctx: &RequestContext,
        stop: &NewStop,
    ) -> Result<RecommendedStop, StoreError> {
        const OP: &str = "create_stop";
        let location = encode_location(&stop.location)?;
        debug!("📌 Creating stop '{}' on route {}", stop.name, stop.route_id);

        let query = format!(
            r#"
            INSERT INTO recommended_stops (route_id, name, "type", description, location, created_at)
            VALUES ($1, $2, $3, $4, ST_GeomFromText($5, $6), NOW())
            RETURNING {}
            "#,
            STOP_COLUMNS
        );

        let created = ctx
            .run(OP, async {
                sqlx::query_as::<_, RecommendedStop>(&query)
                    .bind(stop.route_id)
                    .bind(&stop.name)
                    .bind(&stop.stop_type)
                    .bind(&stop.description)
                    .bind(GeometryCodec::decode(&location))
                    .bind(location.srid().code())
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| {
                        map_sqlx_error(OP, format!("stop on route {}", stop.route_id), e)
                    })
            })
            .await?;

        info!("✅ Stop {} created on route {}", created.id, created.route_id);
        Self::normalize(OP, created)
    }

    async fn get_by_id(
        &self,
        ctx: &RequestContext,
        id: i64,
    ) -> Result<Option<RecommendedStop>, StoreError> {
        const OP: &str = "get_stop";

        let query = format!("SELECT {} FROM recommended_stops WHERE id = $1", STOP_COLUMNS);
        let row = ctx
            .run(OP, async {
                sqlx::query_as::<_, RecommendedStop>(&query)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| map_sqlx_error(OP, format!("stop {}", id), e))
            })
            .await?;

        row.map(|stop| Self::normalize(OP, stop)).transpose()
    }

    async fn get_by_route_id(
        &self,
        ctx: &RequestContext,
        route_id: i64,
    ) -> Result<Vec<RecommendedStop>, StoreError> {
        const OP: &str = "stops_by_route";
        debug!("📌 Listing stops of route {}", route_id);

        let query = format!(
            "SELECT {} FROM recommended_stops WHERE route_id = $1 ORDER BY id ASC",
            STOP_COLUMNS
        );
        let rows = ctx
            .run(OP, async {
                sqlx::query_as::<_, RecommendedStop>(&query)
                    .bind(route_id)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(|e| map_sqlx_error(OP, format!("stops of route {}", route_id), e))
            })
            .await?;

        rows.into_iter()
            .map(|stop| Self::normalize(OP, stop))
            .collect()
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        changes: &StopChanges,
    ) -> Result<Option<RecommendedStop>, StoreError> {
        const OP: &str = "update_stop";
        let location = encode_location(&changes.location)?;

        let query = format!(
            r#"
            UPDATE recommended_stops
            SET name = $2, "type" = $3, description = $4, location = ST_GeomFromText($5, $6)
            WHERE id = $1
            RETURNING {}
            "#,
            STOP_COLUMNS
        );

        let updated = ctx
            .run(OP, async {
                sqlx::query_as::<_, RecommendedStop>(&query)
                    .bind(id)
                    .bind(&changes.name)
                    .bind(&changes.stop_type)
                    .bind(&changes.description)
                    .bind(GeometryCodec::decode(&location))
                    .bind(location.srid().code())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| map_sqlx_error(OP, format!("stop {}", id), e))
            })
            .await?;

        if updated.is_some() {
            info!("✏️ Stop {} updated", id);
        }
        updated.map(|stop| Self::normalize(OP, stop)).transpose()
    }

    async fn delete(&self, ctx: &RequestContext, id: i64) -> Result<bool, StoreError> {
        const OP: &str = "delete_stop";

        let result = ctx
            .run(OP, async {
                sqlx::query("DELETE FROM recommended_stops WHERE id = $1")
                    .bind(id)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| map_sqlx_error(OP, format!("stop {}", id), e))
            })
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("🗑️ Stop {} deleted", id);
        }
        Ok(deleted)
    }
}

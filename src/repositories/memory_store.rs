//! In-memory store
//!
//! Both tables live behind one `RwLock`, so a write is applied atomically
//! and every read sees a consistent snapshot. Writes are visible to the next
//! read immediately. Distances are haversine metres to the closest point of
//! the geometry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{encode_location, encode_path, nearby_origin, HealthCheck, RouteStore, StopStore};
use crate::dto::{NewRoute, NewStop, RouteChanges, StopChanges};
use crate::geometry::{distance, GeometryCodec, StoredGeometry};
use crate::models::{RecommendedStop, Route};
use crate::utils::context::RequestContext;
use crate::utils::errors::StoreError;

/// Candidates scanned between cooperative yields in `get_nearby`
const SCAN_BATCH: usize = 64;

#[derive(Debug, Clone)]
struct RouteRecord {
    name: String,
    description: String,
    path: StoredGeometry,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct StopRecord {
    route_id: i64,
    name: String,
    stop_type: String,
    description: String,
    location: StoredGeometry,
    created_at: DateTime<Utc>,
}

#[derive(Debug)]
struct Tables {
    routes: BTreeMap<i64, RouteRecord>,
    stops: BTreeMap<i64, StopRecord>,
    next_stop_id: i64,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            routes: BTreeMap::new(),
            stops: BTreeMap::new(),
            next_stop_id: 1,
        }
    }
}

/// Cloning shares the same tables
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn route_view(id: i64, record: &RouteRecord) -> Route {
    Route {
        id,
        name: record.name.clone(),
        description: record.description.clone(),
        path: GeometryCodec::decode(&record.path),
        created_at: record.created_at,
    }
}

fn stop_view(id: i64, record: &StopRecord) -> RecommendedStop {
    RecommendedStop {
        id,
        route_id: record.route_id,
        name: record.name.clone(),
        stop_type: record.stop_type.clone(),
        description: record.description.clone(),
        location: GeometryCodec::decode(&record.location),
        created_at: record.created_at,
    }
}

#[async_trait]
impl RouteStore for InMemoryStore {
    async fn create(&self, ctx: &RequestContext, route: &NewRoute) -> Result<Route, StoreError> {
        const OP: &str = "create_route";
        let path = encode_path(&route.path)?;

        ctx.run(OP, async {
            let mut tables = self.tables.write().await;
            if tables.routes.contains_key(&route.id) {
                return Err(StoreError::constraint(
                    OP,
                    format!("route {}", route.id),
                    "a route with this id already exists",
                ));
            }

            let record = RouteRecord {
                name: route.name.clone(),
                description: route.description.clone(),
                path,
                created_at: Utc::now(),
            };
            let created = route_view(route.id, &record);
            tables.routes.insert(route.id, record);
            info!("✅ Route {} created", route.id);
            Ok(created)
        })
        .await
    }

    async fn get_by_id(&self, ctx: &RequestContext, id: i64) -> Result<Option<Route>, StoreError> {
        ctx.run("get_route", async {
            let tables = self.tables.read().await;
            Ok(tables.routes.get(&id).map(|record| route_view(id, record)))
        })
        .await
    }

    async fn get_nearby(
        &self,
        ctx: &RequestContext,
        lat: f64,
        lng: f64,
        distance_meters: f64,
    ) -> Result<Vec<Route>, StoreError> {
        const OP: &str = "nearby_routes";
        let from = nearby_origin(lat, lng, distance_meters)?;
        debug!("📍 Routes within {}m of ({}, {})", distance_meters, lng, lat);

        ctx.run(OP, async {
            let snapshot: Vec<(i64, RouteRecord)> = {
                let tables = self.tables.read().await;
                tables
                    .routes
                    .iter()
                    .map(|(id, record)| (*id, record.clone()))
                    .collect()
            };

            let mut hits: Vec<(f64, i64, RouteRecord)> = Vec::new();
            for (scanned, (id, record)) in snapshot.into_iter().enumerate() {
                if scanned > 0 && scanned % SCAN_BATCH == 0 {
                    tokio::task::yield_now().await;
                }
                let meters = distance::distance_meters(&record.path, &from);
                if meters <= distance_meters {
                    hits.push((meters, id, record));
                }
            }

            hits.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
            debug!("📍 {} routes found", hits.len());
            Ok(hits
                .iter()
                .map(|(_, id, record)| route_view(*id, record))
                .collect())
        })
        .await
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        changes: &RouteChanges,
    ) -> Result<Option<Route>, StoreError> {
        let path = encode_path(&changes.path)?;

        ctx.run("update_route", async {
            let mut tables = self.tables.write().await;
            let Some(record) = tables.routes.get_mut(&id) else {
                debug!("✏️ Route {} not found, nothing updated", id);
                return Ok(None);
            };

            record.name = changes.name.clone();
            record.description = changes.description.clone();
            record.path = path;
            info!("✏️ Route {} updated", id);
            Ok(Some(route_view(id, record)))
        })
        .await
    }

    async fn delete(&self, ctx: &RequestContext, id: i64) -> Result<bool, StoreError> {
        ctx.run("delete_route", async {
            let mut tables = self.tables.write().await;
            if tables.routes.remove(&id).is_none() {
                return Ok(false);
            }

            // same policy as the ON DELETE CASCADE foreign key
            let before = tables.stops.len();
            tables.stops.retain(|_, stop| stop.route_id != id);
            info!(
                "🗑️ Route {} deleted with {} stops",
                id,
                before - tables.stops.len()
            );
            Ok(true)
        })
        .await
    }
}

#[async_trait]
impl StopStore for InMemoryStore {
    async fn create(
        &self,
        ctx: &RequestContext,
        stop: &NewStop,
    ) -> Result<RecommendedStop, StoreError> {
        const OP: &str = "create_stop";
        let location = encode_location(&stop.location)?;

        ctx.run(OP, async {
            let mut tables = self.tables.write().await;
            if !tables.routes.contains_key(&stop.route_id) {
                return Err(StoreError::constraint(
                    OP,
                    format!("stop on route {}", stop.route_id),
                    format!("route {} does not exist", stop.route_id),
                ));
            }

            let id = tables.next_stop_id;
            tables.next_stop_id += 1;

            let record = StopRecord {
                route_id: stop.route_id,
                name: stop.name.clone(),
                stop_type: stop.stop_type.clone(),
                description: stop.description.clone(),
                location,
                created_at: Utc::now(),
            };
            let created = stop_view(id, &record);
            tables.stops.insert(id, record);
            info!("✅ Stop {} created on route {}", id, stop.route_id);
            Ok(created)
        })
        .await
    }

    async fn get_by_id(
        &self,
        ctx: &RequestContext,
        id: i64,
    ) -> Result<Option<RecommendedStop>, StoreError> {
        ctx.run("get_stop", async {
            let tables = self.tables.read().await;
            Ok(tables.stops.get(&id).map(|record| stop_view(id, record)))
        })
        .await
    }

    async fn get_by_route_id(
        &self,
        ctx: &RequestContext,
        route_id: i64,
    ) -> Result<Vec<RecommendedStop>, StoreError> {
        ctx.run("stops_by_route", async {
            let tables = self.tables.read().await;
            Ok(tables
                .stops
                .iter()
                .filter(|(_, record)| record.route_id == route_id)
                .map(|(id, record)| stop_view(*id, record))
                .collect())
        })
        .await
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        changes: &StopChanges,
    ) -> Result<Option<RecommendedStop>, StoreError> {
        let location = encode_location(&changes.location)?;

        ctx.run("update_stop", async {
            let mut tables = self.tables.write().await;
            let Some(record) = tables.stops.get_mut(&id) else {
                return Ok(None);
            };

            record.name = changes.name.clone();
            record.stop_type = changes.stop_type.clone();
            record.description = changes.description.clone();
            record.location = location;
            info!("✏️ Stop {} updated", id);
            Ok(Some(stop_view(id, record)))
        })
        .await
    }

    async fn delete(&self, ctx: &RequestContext, id: i64) -> Result<bool, StoreError> {
        ctx.run("delete_stop", async {
            let mut tables = self.tables.write().await;
            let deleted = tables.stops.remove(&id).is_some();
            if deleted {
                info!("🗑️ Stop {} deleted", id);
            }
            Ok(deleted)
        })
        .await
    }
}

#[async_trait]
impl HealthCheck for InMemoryStore {
    async fn health(&self, ctx: &RequestContext) -> Result<(), StoreError> {
        ctx.check("health")
    }
}

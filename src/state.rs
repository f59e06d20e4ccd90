//! Shared application state
//!
//! One long-lived set of stores per process, handed to every handler by the
//! axum router.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::repositories::{
    HealthCheck, InMemoryStore, RouteRepository, RouteStore, StopRepository, StopStore,
};
use crate::utils::context::RequestContext;

#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<dyn RouteStore>,
    pub stops: Arc<dyn StopStore>,
    pub health: Arc<dyn HealthCheck>,
    pub config: AppConfig,
}

impl AppState {
    /// Stores backed by PostGIS through `pool`
    pub fn postgres(pool: PgPool, config: AppConfig) -> Self {
        let routes = Arc::new(RouteRepository::new(pool.clone()));
        Self {
            routes: routes.clone(),
            stops: Arc::new(StopRepository::new(pool)),
            health: routes,
            config,
        }
    }

    /// Both stores over one shared in-memory database
    pub fn in_memory(config: AppConfig) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            routes: store.clone(),
            stops: store.clone(),
            health: store,
            config,
        }
    }

    /// Context for a single store call, bounded by the configured timeout
    pub fn request_context(&self) -> RequestContext {
        RequestContext::with_timeout(self.config.query_timeout)
    }
}

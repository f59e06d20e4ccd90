//! Travel routes backend
//!
//! Routes with a path geometry, recommended stops along them, and a
//! proximity search, persisted in PostGIS (or in memory).

pub mod config;
pub mod database;
pub mod dto;
pub mod geometry;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod utils;

pub use geometry::{GeometryCodec, InvalidGeometry, Srid};
pub use repositories::{InMemoryStore, RouteStore, StopStore};
pub use utils::context::RequestContext;
pub use utils::errors::StoreError;

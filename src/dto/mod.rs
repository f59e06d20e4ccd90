//! Input schemas
//!
//! What callers may supply when creating or updating entities. Kept apart
//! from the persisted models so server-assigned fields cannot be forged.

pub mod route_dto;
pub mod stop_dto;

pub use route_dto::{NearbyQuery, NewRoute, RouteChanges};
pub use stop_dto::{NewStop, StopChanges};

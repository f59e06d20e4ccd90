//! Data models
//!
//! Entity shapes as they are read back from the stores. Server-assigned
//! fields (`id` for stops, `created_at`) only ever come from here, never
//! from request input.

pub mod route;
pub mod stop;

pub use route::Route;
pub use stop::RecommendedStop;

//! Database module
//!
//! Connection handling for PostgreSQL with PostGIS.

pub mod connection;

pub use connection::create_pool;

//! Geometry handling
//!
//! Text exchange format, reference-system tagging and geodesic distance.

pub mod codec;
pub mod distance;

pub use codec::{GeometryCodec, GeometryKind, InvalidGeometry, Srid, StoredGeometry};

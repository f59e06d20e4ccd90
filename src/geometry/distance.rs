//! Geodesic distance over WGS84 geometries
//!
//! Used by the in-memory store to answer nearby queries in metres. The
//! PostGIS store delegates the same question to `geography` casts.

use geo::{Closest, HaversineClosestPoint, HaversineDistance, Line, LineString, Point};

use super::codec::{Shape, StoredGeometry};

/// Distance in metres from `from` to the closest point of `geometry`
pub fn distance_meters(geometry: &StoredGeometry, from: &Point<f64>) -> f64 {
    match geometry.shape() {
        Shape::Point(point) => point.haversine_distance(from),
        Shape::LineString(line) => line_distance(line.haversine_closest_point(from), line, from),
    }
}

/// Resolve the closest point geo found for a whole line. When it could not
/// settle on one, every segment is measured on its own and the nearest wins.
fn line_distance(closest: Closest<f64>, line: &LineString<f64>, from: &Point<f64>) -> f64 {
    match closest {
        Closest::Intersection(point) | Closest::SinglePoint(point) => {
            point.haversine_distance(from)
        }
        Closest::Indeterminate => line
            .lines()
            .map(|segment| segment_distance(&segment, from))
            .fold(f64::INFINITY, f64::min),
    }
}

fn segment_distance(segment: &Line<f64>, from: &Point<f64>) -> f64 {
    let start = Point::from(segment.start).haversine_distance(from);
    let end = Point::from(segment.end).haversine_distance(from);
    let vertex = start.min(end);

    match segment.haversine_closest_point(from) {
        Closest::Intersection(point) | Closest::SinglePoint(point) => {
            point.haversine_distance(from).min(vertex)
        }
        Closest::Indeterminate => vertex,
    }
}

//! Geometry codec
//!
//! Translates between the text exchange form (`POINT(lng lat)`,
//! `LINESTRING(lng lat, ...)`) and the store-side representation. Every
//! geometry leaving this module is tagged with a reference system.

use geo::{Coord, LineString, Point};
use std::fmt;
use thiserror::Error;

/// Spatial reference system identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Srid(pub i32);

impl Srid {
    /// WGS84 geodetic lon/lat, the only system the stores persist
    pub const WGS84: Srid = Srid(4326);

    pub fn code(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Srid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

/// Malformed or unsupported text geometry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid geometry: {reason}")]
pub struct InvalidGeometry {
    pub reason: String,
}

impl InvalidGeometry {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    LineString,
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryKind::Point => f.write_str("POINT"),
            GeometryKind::LineString => f.write_str("LINESTRING"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Shape {
    Point(Point<f64>),
    LineString(LineString<f64>),
}

/// Geometry in store form. Opaque outside the crate; callers only ever see
/// the text produced by [`GeometryCodec::decode`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredGeometry {
    srid: Srid,
    shape: Shape,
}

impl StoredGeometry {
    pub fn srid(&self) -> Srid {
        self.srid
    }

    pub fn kind(&self) -> GeometryKind {
        match self.shape {
            Shape::Point(_) => GeometryKind::Point,
            Shape::LineString(_) => GeometryKind::LineString,
        }
    }

    pub(crate) fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Reject anything that is not of the expected kind
    pub fn expect_kind(self, kind: GeometryKind) -> Result<Self, InvalidGeometry> {
        if self.kind() == kind {
            Ok(self)
        } else {
            Err(InvalidGeometry::new(format!(
                "expected {} but got {}",
                kind,
                self.kind()
            )))
        }
    }
}

/// Shared encode/decode discipline used by both entity stores
pub struct GeometryCodec;

impl GeometryCodec {
    /// Parse exchange text and tag it with `srid`.
    ///
    /// An EWKT `SRID=n;` prefix is accepted when it names the same system.
    pub fn encode(text: &str, srid: Srid) -> Result<StoredGeometry, InvalidGeometry> {
        let (declared, body) = split_srid_prefix(text.trim())?;
        if let Some(declared) = declared {
            if declared != srid {
                return Err(InvalidGeometry::new(format!(
                    "geometry declares {} but {} was requested",
                    declared, srid
                )));
            }
        }

        let shape = parse_shape(body)?;
        Ok(StoredGeometry { srid, shape })
    }

    /// Render a stored geometry back to exchange text.
    pub fn decode(geometry: &StoredGeometry) -> String {
        match &geometry.shape {
            Shape::Point(point) => format!("POINT({})", format_coord(point.0)),
            Shape::LineString(line) => {
                let coords: Vec<String> = line.coords().map(|c| format_coord(*c)).collect();
                format!("LINESTRING({})", coords.join(", "))
            }
        }
    }

    /// Canonical text form of `text`: `decode(encode(text))`.
    pub fn normalize(text: &str) -> Result<String, InvalidGeometry> {
        Self::encode(text, Srid::WGS84).map(|g| Self::decode(&g))
    }

    /// Build a point geometry, validating the ranges the same way parsed text is.
    pub fn point(lng: f64, lat: f64, srid: Srid) -> Result<StoredGeometry, InvalidGeometry> {
        Ok(StoredGeometry {
            srid,
            shape: Shape::Point(Self::query_point(lng, lat)?),
        })
    }

    /// Untagged WGS84 point for distance queries
    pub fn query_point(lng: f64, lat: f64) -> Result<Point<f64>, InvalidGeometry> {
        checked_coord(lng, lat).map(Point)
    }
}

fn split_srid_prefix(text: &str) -> Result<(Option<Srid>, &str), InvalidGeometry> {
    let has_prefix = text
        .get(..5)
        .map(|head| head.eq_ignore_ascii_case("SRID="))
        .unwrap_or(false);
    if !has_prefix {
        return Ok((None, text));
    }

    let rest = &text[5..];
    let (code, body) = rest
        .split_once(';')
        .ok_or_else(|| InvalidGeometry::new("SRID prefix must be terminated by ';'"))?;
    let code: i32 = code
        .trim()
        .parse()
        .map_err(|_| InvalidGeometry::new(format!("invalid SRID '{}'", code.trim())))?;
    Ok((Some(Srid(code)), body.trim()))
}

fn parse_shape(text: &str) -> Result<Shape, InvalidGeometry> {
    if text.is_empty() {
        return Err(InvalidGeometry::new("geometry text is empty"));
    }

    let keyword_len = text
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(text.len());
    let keyword = text[..keyword_len].to_ascii_uppercase();
    let rest = text[keyword_len..].trim_start();

    let kind = match keyword.as_str() {
        "POINT" => GeometryKind::Point,
        "LINESTRING" => GeometryKind::LineString,
        "" => return Err(InvalidGeometry::new("missing geometry type")),
        other => {
            return Err(InvalidGeometry::new(format!(
                "unsupported geometry type '{}'",
                other
            )))
        }
    };

    if rest.eq_ignore_ascii_case("EMPTY") {
        return Err(InvalidGeometry::new(format!("{} EMPTY is not supported", kind)));
    }

    let body = rest
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .ok_or_else(|| {
            InvalidGeometry::new(format!("expected '(' ... ')' after {}", kind))
        })?;
    if body.contains(['(', ')']) {
        return Err(InvalidGeometry::new("unbalanced or nested parentheses"));
    }

    let coords = body
        .split(',')
        .map(parse_coord)
        .collect::<Result<Vec<_>, _>>()?;

    match kind {
        GeometryKind::Point => match coords.as_slice() {
            [coord] => Ok(Shape::Point(Point(*coord))),
            _ => Err(InvalidGeometry::new("POINT takes exactly one position")),
        },
        GeometryKind::LineString => {
            if coords.len() < 2 {
                return Err(InvalidGeometry::new(
                    "LINESTRING needs at least two positions",
                ));
            }
            Ok(Shape::LineString(LineString::new(coords)))
        }
    }
}

fn parse_coord(position: &str) -> Result<Coord<f64>, InvalidGeometry> {
    let ordinates: Vec<&str> = position.split_whitespace().collect();
    match ordinates.as_slice() {
        [x, y] => checked_coord(parse_ordinate(x)?, parse_ordinate(y)?),
        [] => Err(InvalidGeometry::new("empty position")),
        [_, _, ..] => Err(InvalidGeometry::new(
            "only 2D positions (lng lat) are supported",
        )),
        [_] => Err(InvalidGeometry::new(format!(
            "position '{}' needs both lng and lat",
            position.trim()
        ))),
    }
}

fn parse_ordinate(token: &str) -> Result<f64, InvalidGeometry> {
    let value: f64 = token
        .parse()
        .map_err(|_| InvalidGeometry::new(format!("'{}' is not a number", token)))?;
    if !value.is_finite() {
        return Err(InvalidGeometry::new(format!("'{}' is not finite", token)));
    }
    Ok(value)
}

fn checked_coord(lng: f64, lat: f64) -> Result<Coord<f64>, InvalidGeometry> {
    if !lng.is_finite() || !lat.is_finite() {
        return Err(InvalidGeometry::new("coordinates must be finite"));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(InvalidGeometry::new(format!(
            "longitude {} outside [-180, 180]",
            lng
        )));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(InvalidGeometry::new(format!(
            "latitude {} outside [-90, 90]",
            lat
        )));
    }
    Ok(Coord { x: lng, y: lat })
}

fn format_coord(coord: Coord<f64>) -> String {
    // adding 0.0 folds -0 into 0
    format!("{} {}", coord.x + 0.0, coord.y + 0.0)
}

//! Coordinate reference systems of fetched datasets.
//!
//! RFC 7946 GeoJSON is always WGS84, but exports from desktop GIS still
//! carry the legacy `crs` member, most often naming Web Mercator. Leaflet
//! draws GeoJSON in WGS84 only, so every dataset is brought there before
//! composition.

use serde_json::Value as JsonValue;
use std::{f64::consts::PI, fmt};

/// WGS84 / Web Mercator sphere radius in meters.
const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude limit of the Web Mercator projection.
const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// A dataset's coordinate reference system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Crs {
    /// Longitude/latitude degrees (EPSG:4326, OGC CRS84).
    Wgs84,
    /// Spherical mercator meters (EPSG:3857).
    WebMercator,
    /// Anything else, by its declared name.
    Other(String),
}

impl Crs {
    /// Parse a CRS name such as `urn:ogc:def:crs:EPSG::3857` or `EPSG:4326`.
    pub fn from_name(name: &str) -> Self {
        let upper = name.trim().to_ascii_uppercase();
        if upper.ends_with("CRS84") {
            return Self::Wgs84;
        }
        let code = upper
            .rsplit(|c: char| c == ':' || c == '/')
            .next()
            .unwrap_or_default();
        match code {
            "4326" => Self::Wgs84,
            "3857" | "900913" | "102100" | "102113" => Self::WebMercator,
            _ => Self::Other(name.trim().to_owned()),
        }
    }

    /// Read the legacy `crs` member of a GeoJSON object.
    ///
    /// `{"type": "name", "properties": {"name": "..."}}`; anything absent or
    /// unrecognizable means the RFC 7946 default.
    pub fn from_member(member: Option<&JsonValue>) -> Self {
        member
            .and_then(|crs| crs.get("properties"))
            .and_then(|props| props.get("name"))
            .and_then(JsonValue::as_str)
            .map_or(Self::Wgs84, Self::from_name)
    }

    /// Coordinate transform from `self` to `target`, if one is known.
    pub fn transform_to(&self, target: &Crs) -> Option<fn(f64, f64) -> (f64, f64)> {
        match (self, target) {
            (a, b) if a == b => Some(identity),
            (Self::WebMercator, Self::Wgs84) => Some(mercator_to_wgs84),
            (Self::Wgs84, Self::WebMercator) => Some(wgs84_to_mercator),
            _ => None,
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wgs84 => f.write_str("EPSG:4326"),
            Self::WebMercator => f.write_str("EPSG:3857"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

const fn identity(x: f64, y: f64) -> (f64, f64) {
    (x, y)
}

/// Web Mercator meters → (lon, lat) degrees.
fn mercator_to_wgs84(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
    (lon, lat)
}

/// (lon, lat) degrees → Web Mercator meters.
fn wgs84_to_mercator(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
    let x = lon.to_radians() * EARTH_RADIUS;
    let y = (PI / 4.0 + lat.to_radians() / 2.0).tan().ln() * EARTH_RADIUS;
    (x, y)
}

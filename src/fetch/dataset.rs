//! In-memory geometry tables built from GeoJSON payloads.

use super::{FetchError, crs::Crs};
use chrono::{DateTime, NaiveDateTime};
use geojson::{Feature, GeoJson, Value};
use serde_json::Value as JsonValue;
use std::fmt;

/// Zip local-file header; shapefiles and geopackages are usually shipped zipped.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Timestamp layout used for properties shown in tooltips.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Geographic bounding box in dataset coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.4}, {:.4})..({:.4}, {:.4})",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

/// Features of one dataset, one row per source feature.
#[derive(Debug, Clone)]
pub struct GeometryDataset {
    name: String,
    source: String,
    crs: Crs,
    features: Vec<Feature>,
}

impl GeometryDataset {
    /// Parse a GeoJSON payload.
    ///
    /// A FeatureCollection yields one row per feature, a Feature one row,
    /// a bare geometry one row, and a bare GeometryCollection one row per
    /// member geometry.
    pub fn from_bytes(name: &str, source: &str, bytes: &[u8]) -> Result<Self, FetchError> {
        let bytes = strip_bom(bytes);
        let first = bytes.iter().find(|b| !b.is_ascii_whitespace());

        match first {
            None => return Err(FetchError::malformed(name, "empty payload")),
            Some(b'{') => {}
            Some(_) if bytes.starts_with(ZIP_MAGIC) => {
                return Err(FetchError::unsupported(name, "zip archive"));
            }
            Some(_) => return Err(FetchError::unsupported(name, "payload is not a JSON object")),
        }

        let value: JsonValue = serde_json::from_slice(bytes)
            .map_err(|e| FetchError::malformed(name, e.to_string()))?;
        let crs = Crs::from_member(value.get("crs"));
        let geojson =
            GeoJson::from_json_value(value).map_err(|e| FetchError::malformed(name, e.to_string()))?;

        Ok(Self::from_geojson(name, source, crs, geojson))
    }

    /// Build a dataset from already parsed GeoJSON.
    pub fn from_geojson(name: &str, source: &str, crs: Crs, geojson: GeoJson) -> Self {
        let mut features = match geojson {
            GeoJson::FeatureCollection(collection) => collection.features,
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::Geometry(geometry) => match geometry.value {
                Value::GeometryCollection(members) => {
                    members.into_iter().map(Feature::from).collect()
                }
                _ => vec![Feature::from(geometry)],
            },
        };
        features.iter_mut().for_each(normalize_timestamps);

        Self {
            name: name.to_owned(),
            source: source.to_owned(),
            crs,
            features,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub const fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Reproject every coordinate into `target`.
    ///
    /// Stale `bbox` members are dropped.
    pub fn to_crs(mut self, target: &Crs) -> Result<Self, FetchError> {
        if &self.crs == target {
            return Ok(self);
        }
        let transform =
            self.crs
                .transform_to(target)
                .ok_or_else(|| FetchError::UnsupportedCrs {
                    name: self.name.clone(),
                    crs: self.crs.clone(),
                    target: target.clone(),
                })?;

        for feature in &mut self.features {
            feature.bbox = None;
            if let Some(geometry) = feature.geometry.as_mut() {
                geometry.bbox = None;
                map_positions(&mut geometry.value, transform);
            }
        }
        self.crs = target.clone();
        Ok(self)
    }

    /// Bounding box over all geometries, `None` if nothing has coordinates.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        let mut extend = |position: &[f64]| {
            let [x, y, ..] = position else { return };
            let b = bounds.get_or_insert(Bounds {
                min_x: *x,
                min_y: *y,
                max_x: *x,
                max_y: *y,
            });
            b.min_x = b.min_x.min(*x);
            b.min_y = b.min_y.min(*y);
            b.max_x = b.max_x.max(*x);
            b.max_y = b.max_y.max(*y);
        };
        for geometry in self.features.iter().filter_map(|f| f.geometry.as_ref()) {
            visit_positions(&geometry.value, &mut extend);
        }
        bounds
    }

    /// Numeric values of `property`, skipping features without one.
    pub fn numeric_values<'a>(&'a self, property: &'a str) -> impl Iterator<Item = f64> + 'a {
        self.features
            .iter()
            .filter_map(move |f| numeric_property(f, property))
    }

    /// Largest numeric value of `property`, ignoring features without one.
    pub fn max_numeric(&self, property: &str) -> Option<f64> {
        self.numeric_values(property).reduce(f64::max)
    }
}

/// Numeric value of a feature property; numeric strings count.
pub fn numeric_property(feature: &Feature, property: &str) -> Option<f64> {
    let value = match feature.property(property)? {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

/// Display form of a feature property for tooltips and panels.
pub fn display_property(feature: &Feature, property: &str) -> String {
    match feature.property(property) {
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Number(n)) => match n.as_i64() {
            Some(i) => group_thousands(i),
            None => n.to_string(),
        },
        Some(JsonValue::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// `1234567` → `1,234,567`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

// ============================================================================
// Helper Functions
// ============================================================================

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)
}

/// Rewrite datetime-like string properties as `YYYY-MM-DD HH:MM:SS`.
fn normalize_timestamps(feature: &mut Feature) {
    let Some(properties) = feature.properties.as_mut() else {
        return;
    };
    for value in properties.values_mut() {
        if let JsonValue::String(s) = value
            && let Some(normalized) = normalize_timestamp(s)
        {
            *s = normalized;
        }
    }
}

fn normalize_timestamp(s: &str) -> Option<String> {
    // cheap shape check before parsing: YYYY-MM-DDTHH:MM:SS...
    let bytes = s.as_bytes();
    if bytes.len() < 19 || bytes[4] != b'-' || bytes[10] != b'T' {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.format(TIMESTAMP_FORMAT).to_string());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
}

fn map_position(position: &mut [f64], transform: fn(f64, f64) -> (f64, f64)) {
    if let [x, y, ..] = position {
        (*x, *y) = transform(*x, *y);
    }
}

fn map_positions(value: &mut Value, transform: fn(f64, f64) -> (f64, f64)) {
    match value {
        Value::Point(position) => map_position(position, transform),
        Value::MultiPoint(positions) | Value::LineString(positions) => positions
            .iter_mut()
            .for_each(|p| map_position(p, transform)),
        Value::MultiLineString(lines) | Value::Polygon(lines) => lines
            .iter_mut()
            .flatten()
            .for_each(|p| map_position(p, transform)),
        Value::MultiPolygon(polygons) => polygons
            .iter_mut()
            .flatten()
            .flatten()
            .for_each(|p| map_position(p, transform)),
        Value::GeometryCollection(geometries) => geometries.iter_mut().for_each(|g| {
            g.bbox = None;
            map_positions(&mut g.value, transform);
        }),
    }
}

fn visit_positions(value: &Value, visit: &mut impl FnMut(&[f64])) {
    match value {
        Value::Point(position) => visit(position.as_slice()),
        Value::MultiPoint(positions) | Value::LineString(positions) => {
            positions.iter().for_each(|p| visit(p.as_slice()));
        }
        Value::MultiLineString(lines) | Value::Polygon(lines) => {
            lines.iter().flatten().for_each(|p| visit(p.as_slice()));
        }
        Value::MultiPolygon(polygons) => {
            polygons.iter().flatten().flatten().for_each(|p| visit(p.as_slice()));
        }
        Value::GeometryCollection(geometries) => {
            geometries.iter().for_each(|g| visit_positions(&g.value, visit));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEAM_LINES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"segment": "A"},
             "geometry": {"type": "LineString", "coordinates": [[-75.17, 39.95], [-75.16, 39.96]]}},
            {"type": "Feature", "properties": {"segment": "B"},
             "geometry": {"type": "LineString", "coordinates": [[-75.16, 39.96], [-75.15, 39.94]]}},
            {"type": "Feature", "properties": {"segment": "C"}, "geometry": null}
        ]
    }"#;

    fn parse(text: &str) -> Result<GeometryDataset, FetchError> {
        GeometryDataset::from_bytes("test", "http://data/test.geojson", text.as_bytes())
    }

    #[test]
    fn test_row_count_matches_feature_count() {
        let dataset = parse(STEAM_LINES).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.name(), "test");
        assert_eq!(dataset.source(), "http://data/test.geojson");
        assert_eq!(dataset.crs(), &Crs::Wgs84);
    }

    #[test]
    fn test_empty_collection() {
        let dataset = parse(r#"{"type": "FeatureCollection", "features": []}"#).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.bounds(), None);
    }

    #[test]
    fn test_single_feature() {
        let dataset = parse(
            r#"{"type": "Feature", "properties": null,
                "geometry": {"type": "Point", "coordinates": [-75.1, 39.9]}}"#,
        )
        .unwrap();
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_geometry_collection_explodes() {
        let dataset = parse(
            r#"{"type": "GeometryCollection", "geometries": [
                {"type": "Point", "coordinates": [0, 0]},
                {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_bom_and_whitespace_accepted() {
        let text = format!("\u{feff}\n  {STEAM_LINES}");
        assert_eq!(parse(&text).unwrap().len(), 3);
    }

    #[test]
    fn test_empty_payload_is_malformed() {
        assert!(matches!(parse("   "), Err(FetchError::Malformed { .. })));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        assert!(matches!(
            parse(r#"{"type": "FeatureCollection", "#),
            Err(FetchError::Malformed { .. })
        ));
    }

    #[test]
    fn test_invalid_geojson_is_malformed() {
        assert!(matches!(
            parse(r#"{"type": "Sphere", "radius": 1}"#),
            Err(FetchError::Malformed { .. })
        ));
    }

    #[test]
    fn test_zip_is_unsupported() {
        let result = GeometryDataset::from_bytes("shp", "u", b"PK\x03\x04rest-of-archive");
        match result {
            Err(FetchError::UnsupportedFormat { detail, .. }) => assert_eq!(detail, "zip archive"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_html_error_page_is_unsupported() {
        assert!(matches!(
            parse("<html><body>Access Denied</body></html>"),
            Err(FetchError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_bounds() {
        let bounds = parse(STEAM_LINES).unwrap().bounds().unwrap();

        assert_eq!(bounds.min_x, -75.17);
        assert_eq!(bounds.max_x, -75.15);
        assert_eq!(bounds.min_y, 39.94);
        assert_eq!(bounds.max_y, 39.96);
        assert_eq!(
            bounds.to_string(),
            "(-75.1700, 39.9400)..(-75.1500, 39.9600)"
        );
    }

    #[test]
    fn test_legacy_crs_detected_and_reprojected() {
        let text = r#"{
            "type": "FeatureCollection",
            "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::3857"}},
            "features": [
                {"type": "Feature", "properties": {},
                 "bbox": [-8367351.8, 4859056.6, -8367351.8, 4859056.6],
                 "geometry": {"type": "Polygon", "coordinates": [[
                    [-8367351.8, 4859056.6], [-8366351.8, 4859056.6],
                    [-8366351.8, 4860056.6], [-8367351.8, 4859056.6]
                 ]]}}
            ]
        }"#;
        let dataset = parse(text).unwrap();
        assert_eq!(dataset.crs(), &Crs::WebMercator);

        let dataset = dataset.to_crs(&Crs::Wgs84).unwrap();
        assert_eq!(dataset.crs(), &Crs::Wgs84);
        assert!(dataset.features()[0].bbox.is_none());

        let bounds = dataset.bounds().unwrap();
        assert!((bounds.min_x - -75.1652).abs() < 1e-3);
        assert!((bounds.min_y - 39.9526).abs() < 1e-3);
    }

    #[test]
    fn test_unsupported_crs() {
        let text = r#"{
            "type": "FeatureCollection",
            "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::2272"}},
            "features": []
        }"#;
        let result = parse(text).unwrap().to_crs(&Crs::Wgs84);
        assert!(matches!(result, Err(FetchError::UnsupportedCrs { .. })));
    }

    #[test]
    fn test_to_same_crs_is_noop() {
        let dataset = parse(STEAM_LINES).unwrap().to_crs(&Crs::Wgs84).unwrap();
        assert_eq!(dataset.bounds().unwrap().min_x, -75.17);
    }

    #[test]
    fn test_timestamps_normalized() {
        let dataset = parse(
            r#"{"type": "Feature",
                "properties": {
                    "release": "2021-03-04T05:06:07Z",
                    "local": "2021-03-04T05:06:07.250",
                    "day": "2021-03-04",
                    "name": "Center City"
                },
                "geometry": null}"#,
        )
        .unwrap();
        let feature = &dataset.features()[0];

        assert_eq!(display_property(feature, "release"), "2021-03-04 05:06:07");
        assert_eq!(display_property(feature, "local"), "2021-03-04 05:06:07");
        assert_eq!(display_property(feature, "day"), "2021-03-04");
        assert_eq!(display_property(feature, "name"), "Center City");
    }

    #[test]
    fn test_numeric_property() {
        let dataset = parse(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": {"n": 5}, "geometry": null},
                {"type": "Feature", "properties": {"n": "12"}, "geometry": null},
                {"type": "Feature", "properties": {"n": "many"}, "geometry": null},
                {"type": "Feature", "properties": {}, "geometry": null}
            ]}"#,
        )
        .unwrap();
        let features = dataset.features();

        assert_eq!(numeric_property(&features[0], "n"), Some(5.0));
        assert_eq!(numeric_property(&features[1], "n"), Some(12.0));
        assert_eq!(numeric_property(&features[2], "n"), None);
        assert_eq!(numeric_property(&features[3], "n"), None);
        assert_eq!(dataset.max_numeric("n"), Some(12.0));
        assert_eq!(dataset.max_numeric("missing"), None);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
        assert_eq!(group_thousands(-4500), "-4,500");
    }

    #[test]
    fn test_display_property_numbers() {
        let dataset = parse(
            r#"{"type": "Feature",
                "properties": {"count": 12500, "ratio": 0.5, "none": null},
                "geometry": null}"#,
        )
        .unwrap();
        let feature = &dataset.features()[0];

        assert_eq!(display_property(feature, "count"), "12,500");
        assert_eq!(display_property(feature, "ratio"), "0.5");
        assert_eq!(display_property(feature, "none"), "");
        assert_eq!(display_property(feature, "missing"), "");
    }
}

//! Dataset download and parsing.
//!
//! # Flow
//!
//! ```text
//! fetch_dataset(url)
//!     │
//!     ├── HttpClient::get ──► raw bytes
//!     ├── GeometryDataset::from_bytes ──► features + detected CRS
//!     └── GeometryDataset::to_crs(WGS84) ──► ready for composition
//! ```
//!
//! No retry, no cache: every page render downloads every dataset again.

mod crs;
mod dataset;
mod http;

pub use crs::Crs;
pub use dataset::{GeometryDataset, display_property, group_thousands, numeric_property};
pub use http::{HttpClient, HttpError, ReqwestClient};

#[cfg(test)]
pub use http::mock::MockHttpClient;

use crate::log;
use std::time::Instant;
use thiserror::Error;

/// Why a dataset could not be loaded. Fatal to the page render.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to download dataset `{name}`")]
    Http {
        name: String,
        #[source]
        source: HttpError,
    },

    #[error("dataset `{name}` is not GeoJSON ({detail})")]
    UnsupportedFormat { name: String, detail: String },

    #[error("dataset `{name}` is malformed: {detail}")]
    Malformed { name: String, detail: String },

    #[error("dataset `{name}` uses {crs}, which cannot be reprojected to {target}")]
    UnsupportedCrs { name: String, crs: Crs, target: Crs },
}

impl FetchError {
    fn malformed(name: &str, detail: impl Into<String>) -> Self {
        Self::Malformed {
            name: name.to_owned(),
            detail: detail.into(),
        }
    }

    fn unsupported(name: &str, detail: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            name: name.to_owned(),
            detail: detail.into(),
        }
    }
}

/// Download `url` and parse it as the dataset `name`, reprojected to WGS84.
pub fn fetch_dataset(
    client: &dyn HttpClient,
    name: &str,
    url: &str,
) -> Result<GeometryDataset, FetchError> {
    let started = Instant::now();
    let bytes = client.get(url).map_err(|source| FetchError::Http {
        name: name.to_owned(),
        source,
    })?;

    let dataset = GeometryDataset::from_bytes(name, url, &bytes)?;
    let source_crs = dataset.crs().clone();
    let dataset = dataset.to_crs(&Crs::Wgs84)?;

    let extent = dataset
        .bounds()
        .map(|bounds| format!(" within {bounds}"))
        .unwrap_or_default();
    log!(
        "fetch";
        "{name}: {} features{extent}, {} KB, {source_crs} in {:.2?}",
        dataset.len(),
        bytes.len() / 1024,
        started.elapsed()
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://data.example/steamloop.geojson";

    #[test]
    fn test_fetch_dataset_success() {
        let client = MockHttpClient::new().with(
            URL,
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [-75.1, 39.9]}},
                {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [-75.2, 39.8]}}
            ]}"#,
        );

        let dataset = fetch_dataset(&client, "steam", URL).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.source(), URL);
        assert_eq!(client.request_count(), 1);
    }

    #[test]
    fn test_fetch_dataset_reprojects_mercator() {
        let client = MockHttpClient::new().with(
            URL,
            r#"{"type": "FeatureCollection",
                "crs": {"type": "name", "properties": {"name": "EPSG:3857"}},
                "features": [
                    {"type": "Feature", "properties": {},
                     "geometry": {"type": "Point", "coordinates": [-8367351.8, 4859056.6]}}
                ]}"#,
        );

        let dataset = fetch_dataset(&client, "steam", URL).unwrap();

        assert_eq!(dataset.crs(), &Crs::Wgs84);
        let bounds = dataset.bounds().unwrap();
        assert!((bounds.min_x - -75.1652).abs() < 1e-3);
    }

    #[test]
    fn test_fetch_dataset_http_error() {
        let client = MockHttpClient::new().with_status(URL, 403);

        let err = fetch_dataset(&client, "steam", URL).unwrap_err();

        match &err {
            FetchError::Http { name, source } => {
                assert_eq!(name, "steam");
                assert_eq!(source.status(), Some(403));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(err.to_string().contains("steam"));
    }

    #[test]
    fn test_fetch_dataset_malformed() {
        let client = MockHttpClient::new().with(URL, "{not json");
        assert!(matches!(
            fetch_dataset(&client, "steam", URL),
            Err(FetchError::Malformed { .. })
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = FetchError::UnsupportedCrs {
            name: "bldg".into(),
            crs: Crs::Other("EPSG:2272".into()),
            target: Crs::Wgs84,
        };
        assert_eq!(
            err.to_string(),
            "dataset `bldg` uses EPSG:2272, which cannot be reprojected to EPSG:4326"
        );
    }
}

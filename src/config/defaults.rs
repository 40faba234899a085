//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.
//! Together they reproduce the Philadelphia steam loop dashboard, so a
//! project with only a `secrets.toml` renders the full map.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [base] Section Defaults
// ============================================================================

pub mod base {
    pub fn title() -> String {
        "Philadelphia Steam Loop Map".into()
    }

    pub fn author() -> String {
        "Keon Monroe".into()
    }

    pub fn language() -> String {
        "en".into()
    }
}

// ============================================================================
// [map] Section Defaults
// ============================================================================

pub mod map {
    /// City Hall, Philadelphia.
    pub fn center() -> [f64; 2] {
        [39.9526, -75.1652]
    }

    pub fn zoom() -> u8 {
        13
    }

    pub fn token_key() -> String {
        "mapbox.api_key".into()
    }

    pub mod tiles {
        pub fn url() -> String {
            "https://api.mapbox.com/v4/mapbox.satellite/{z}/{x}/{y}@2x.png?access_token={token}"
                .into()
        }

        pub fn name() -> String {
            "Mapbox Satellite View".into()
        }

        pub fn attribution() -> String {
            "Mapbox".into()
        }

        pub fn max_zoom() -> u8 {
            19
        }
    }
}

// ============================================================================
// [fetch] Section Defaults
// ============================================================================

pub mod fetch {
    /// Some data hosts reject requests without a browser-like User-Agent.
    pub fn user_agent() -> String {
        "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0".into()
    }

    pub fn timeout_secs() -> Option<u64> {
        None
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        8501
    }
}

// ============================================================================
// [render] Section Defaults
// ============================================================================

pub mod render {
    use std::path::PathBuf;

    pub fn output() -> PathBuf {
        "steamloop.html".into()
    }
}

// ============================================================================
// [secrets] Section Defaults
// ============================================================================

pub mod secrets {
    use std::path::PathBuf;

    pub fn path() -> PathBuf {
        "secrets.toml".into()
    }
}

// ============================================================================
// [page] Section Defaults
// ============================================================================

pub mod page {
    pub fn building_layer() -> Option<String> {
        Some("buildings".into())
    }

    pub fn neighborhood_layer() -> Option<String> {
        Some("neighborhoods".into())
    }

    pub fn name_property() -> String {
        "listname".into()
    }

    pub fn buffer_meters() -> f64 {
        1000.0
    }

    pub fn illustration_key() -> Option<String> {
        Some("aws.cogeneration_png".into())
    }

    pub fn expanded() -> Vec<String> {
        ["legend", "buildings", "chp", "disclaimer"]
            .map(String::from)
            .to_vec()
    }
}

// ============================================================================
// Layer Style Defaults
// ============================================================================

pub mod style {
    /// Leaflet's default path color.
    pub fn color() -> String {
        "#3388ff".into()
    }

    pub fn weight() -> f64 {
        3.0
    }

    pub fn opacity() -> f64 {
        1.0
    }

    pub fn fill_opacity() -> f64 {
        0.2
    }

    pub fn zero_color() -> String {
        "#000000".into()
    }
}

// ============================================================================
// [[layers]] and [[markers]] Defaults
// ============================================================================

pub mod layers {
    use crate::config::{ChoroplethConfig, LayerConfig, TooltipConfig};
    use crate::map::{Palette, PathStyle};

    /// Overlays in draw order: neighborhoods at the bottom, buildings on top.
    pub fn all() -> Vec<LayerConfig> {
        vec![neighborhoods(), steam_loop(), buildings()]
    }

    fn neighborhoods() -> LayerConfig {
        LayerConfig {
            id: "neighborhoods".into(),
            name: "Philadelphia Neighborhoods".into(),
            source: "aws.phl_nbrhoods_geojson".into(),
            style: PathStyle {
                weight: 1.0,
                fill_opacity: 0.5,
                ..PathStyle::default()
            },
            choropleth: Some(ChoroplethConfig {
                property: "Join_Count".into(),
                palette: Palette::OrRd,
                zero_color: super::style::zero_color(),
                caption: Some("Buildings near the steam loop".into()),
                high_label: Some("Philadelphia Neighborhoods (High # of Buildings)".into()),
                low_label: Some("Philadelphia Neighborhoods (Low # of Buildings)".into()),
            }),
            tooltip: Some(TooltipConfig {
                fields: vec!["listname".into(), "Join_Count".into()],
                aliases: vec!["Neighborhood:".into(), "Building Count:".into()],
            }),
            legend: None,
        }
    }

    fn steam_loop() -> LayerConfig {
        LayerConfig {
            id: "steam_loop".into(),
            name: "Philadelphia Steam Loop".into(),
            source: "aws.steamloop_geojson".into(),
            style: PathStyle {
                color: "#4A90E2".into(),
                fill_color: Some("#C0C0C0".into()),
                weight: 5.0,
                opacity: 1.0,
                fill_opacity: 0.5,
            },
            choropleth: None,
            tooltip: None,
            legend: Some("Philadelphia Steam Loop".into()),
        }
    }

    fn buildings() -> LayerConfig {
        LayerConfig {
            id: "buildings".into(),
            name: "Building Footprints (1000 m from steam loop)".into(),
            source: "aws.phl_bldg_geojson".into(),
            style: PathStyle {
                color: "transparent".into(),
                fill_color: Some("#008000".into()),
                weight: 1.0,
                opacity: 1.0,
                fill_opacity: 0.0,
            },
            choropleth: None,
            tooltip: None,
            legend: Some("Building Footprints".into()),
        }
    }
}

pub mod markers {
    use crate::config::MarkerConfig;

    pub fn all() -> Vec<MarkerConfig> {
        vec![
            MarkerConfig {
                // 2600 Christian St
                name: "Grays Ferry Vicinity Energy cogeneration plant".into(),
                lat: 39.942_345_6,
                lon: -75.188_478_8,
                image: Some("aws.grays_ferry_jpg".into()),
            },
            MarkerConfig {
                // 908 Sansom St
                name: "Edison Plant".into(),
                lat: 39.949_610,
                lon: -75.157_476,
                image: Some("aws.edison_plant_jpg".into()),
            },
        ]
    }

    pub fn icon_url() -> String {
        "http://icons.iconarchive.com/icons/paomedia/small-n-flat/1024/map-marker-icon.png".into()
    }
}

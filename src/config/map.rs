//! `[map]` section configuration.
//!
//! Viewport, basemap tiles and map controls.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[map]` section in steamloop.toml.
///
/// # Example
/// ```toml
/// [map]
/// center = [39.9526, -75.1652]
/// zoom = 13
///
/// [map.tiles]
/// url = "https://api.mapbox.com/v4/mapbox.satellite/{z}/{x}/{y}@2x.png?access_token={token}"
/// verify = true
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct MapConfig {
    /// Initial map center as `[lat, lon]`.
    #[serde(default = "defaults::map::center")]
    #[educe(Default = defaults::map::center())]
    pub center: [f64; 2],

    /// Initial zoom level (0-22).
    #[serde(default = "defaults::map::zoom")]
    #[educe(Default = defaults::map::zoom())]
    pub zoom: u8,

    /// Show a scale bar in the bottom-left corner.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub control_scale: bool,

    /// Start the layer control collapsed.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub collapse_layer_control: bool,

    /// Secret key holding the tile access token.
    #[serde(default = "defaults::map::token_key")]
    #[educe(Default = defaults::map::token_key())]
    pub token_key: String,

    /// Icon used for every marker.
    #[serde(default = "defaults::markers::icon_url")]
    #[educe(Default = defaults::markers::icon_url())]
    pub marker_icon: String,

    /// Basemap tile settings.
    #[serde(default)]
    pub tiles: TilesConfig,
}

/// `[map.tiles]` - basemap tile provider.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct TilesConfig {
    /// XYZ URL template; `{token}` is replaced by the access token.
    #[serde(default = "defaults::map::tiles::url")]
    #[educe(Default = defaults::map::tiles::url())]
    pub url: String,

    /// Name shown in the layer control.
    #[serde(default = "defaults::map::tiles::name")]
    #[educe(Default = defaults::map::tiles::name())]
    pub name: String,

    /// Attribution text shown in the map corner.
    #[serde(default = "defaults::map::tiles::attribution")]
    #[educe(Default = defaults::map::tiles::attribution())]
    pub attribution: String,

    #[serde(default = "defaults::map::tiles::max_zoom")]
    #[educe(Default = defaults::map::tiles::max_zoom())]
    pub max_zoom: u8,

    /// Request one tile with the token before rendering, so a rejected
    /// token shows up as a notice instead of silently blank tiles.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub verify: bool,
}

impl MapConfig {
    pub const fn lat(&self) -> f64 {
        self.center[0]
    }

    pub const fn lon(&self) -> f64 {
        self.center[1]
    }
}

#[cfg(test)]
mod tests {
    use super::super::AppConfig;

    #[test]
    fn test_map_config_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();

        assert_eq!(config.map.center, [39.9526, -75.1652]);
        assert_eq!(config.map.zoom, 13);
        assert!(config.map.control_scale);
        assert!(config.map.collapse_layer_control);
        assert_eq!(config.map.token_key, "mapbox.api_key");
        assert!(config.map.tiles.url.contains("{token}"));
        assert!(!config.map.tiles.verify);
    }

    #[test]
    fn test_map_config_override() {
        let config = r#"
            [map]
            center = [40.0, -75.0]
            zoom = 10
            control_scale = false

            [map.tiles]
            url = "https://tile.openstreetmap.org/{z}/{x}/{y}.png"
            name = "OSM"
            verify = true
        "#;
        let config: AppConfig = toml::from_str(config).unwrap();

        assert_eq!(config.map.lat(), 40.0);
        assert_eq!(config.map.lon(), -75.0);
        assert_eq!(config.map.zoom, 10);
        assert!(!config.map.control_scale);
        assert_eq!(config.map.tiles.name, "OSM");
        assert!(config.map.tiles.verify);
        // untouched fields keep defaults
        assert_eq!(config.map.tiles.attribution, "Mapbox");
    }

    #[test]
    fn test_unknown_tiles_field_rejection() {
        let config = r#"
            [map.tiles]
            subdomains = "abc"
        "#;
        let result: Result<AppConfig, _> = toml::from_str(config);
        assert!(result.is_err());
    }
}

//! `[[layers]]` and `[[markers]]` configuration.
//!
//! Layers are drawn in the order they are listed: the last entry is on top.

use super::defaults;
use crate::map::{Palette, PathStyle};
use educe::Educe;
use serde::{Deserialize, Serialize};

/// One `[[layers]]` entry - an overlay built from a remote GeoJSON dataset.
///
/// # Example
/// ```toml
/// [[layers]]
/// id = "steam_loop"
/// name = "Philadelphia Steam Loop"
/// source = "aws.steamloop_geojson"   # secret key holding the dataset URL
/// legend = "Philadelphia Steam Loop"
///
/// [layers.style]
/// color = "#4A90E2"
/// weight = 5.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerConfig {
    /// Stable identifier, referenced by `[page]`.
    pub id: String,

    /// Display name in the layer control.
    pub name: String,

    /// Secret key whose value is the dataset URL.
    pub source: String,

    #[serde(default)]
    pub style: PathStyle,

    /// Color features by a numeric property instead of a fixed color.
    #[serde(default)]
    pub choropleth: Option<ChoroplethConfig>,

    #[serde(default)]
    pub tooltip: Option<TooltipConfig>,

    /// Legend label for uniform layers.
    #[serde(default)]
    pub legend: Option<String>,
}

/// `[layers.choropleth]` - linear colormap over a numeric property.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ChoroplethConfig {
    /// Numeric feature property driving the color.
    pub property: String,

    #[serde(default)]
    pub palette: Palette,

    /// Color for features whose value is zero or missing.
    #[serde(default = "defaults::style::zero_color")]
    #[educe(Default = defaults::style::zero_color())]
    pub zero_color: String,

    /// Caption of the colormap bar drawn on the map.
    #[serde(default)]
    pub caption: Option<String>,

    /// Legend label for the top of the scale.
    #[serde(default)]
    pub high_label: Option<String>,

    /// Legend label for the bottom of the scale.
    #[serde(default)]
    pub low_label: Option<String>,
}

/// `[layers.tooltip]` - hover tooltip listing feature properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TooltipConfig {
    pub fields: Vec<String>,

    /// Labels shown before each field; same length as `fields`.
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// One `[[markers]]` entry - a point of interest with an image popup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkerConfig {
    pub name: String,
    pub lat: f64,
    pub lon: f64,

    /// Secret key whose value is the popup image URL.
    #[serde(default)]
    pub image: Option<String>,
}

impl TooltipConfig {
    /// Pairs of `(field, label)`; a missing alias falls back to the field name.
    pub fn labelled_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().enumerate().map(|(i, field)| {
            let label = self.aliases.get(i).map_or(field.as_str(), String::as_str);
            (field.as_str(), label)
        })
    }
}

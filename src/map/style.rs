//! Leaflet path styles.

use crate::config::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};

/// Stroke color that hides outlines entirely.
pub const TRANSPARENT: &str = "transparent";

/// `[layers.style]` - how a vector overlay is painted.
///
/// Mirrors Leaflet's `PathOptions`. An unset `fill_color` fills with the
/// stroke color, as Leaflet does.
#[derive(Debug, Clone, PartialEq, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct PathStyle {
    /// Stroke color.
    #[serde(default = "defaults::style::color")]
    #[educe(Default = defaults::style::color())]
    pub color: String,

    #[serde(default)]
    pub fill_color: Option<String>,

    /// Stroke width in pixels.
    #[serde(default = "defaults::style::weight")]
    #[educe(Default = defaults::style::weight())]
    pub weight: f64,

    #[serde(default = "defaults::style::opacity")]
    #[educe(Default = defaults::style::opacity())]
    pub opacity: f64,

    #[serde(default = "defaults::style::fill_opacity")]
    #[educe(Default = defaults::style::fill_opacity())]
    pub fill_opacity: f64,
}

impl PathStyle {
    /// Effective fill color.
    pub fn fill(&self) -> &str {
        self.fill_color.as_deref().unwrap_or(&self.color)
    }

    /// Color that represents this style in a legend: the stroke, or the fill
    /// when the stroke is invisible.
    pub fn swatch(&self) -> &str {
        if self.color.eq_ignore_ascii_case(TRANSPARENT) || self.opacity == 0.0 {
            self.fill()
        } else {
            &self.color
        }
    }

    /// Same style with stroke and fill both set to `color`.
    pub fn painted(&self, color: &str) -> Self {
        Self {
            color: color.to_owned(),
            fill_color: Some(color.to_owned()),
            ..self.clone()
        }
    }

    /// Leaflet path options object.
    pub fn to_leaflet(&self) -> JsonValue {
        json!({
            "color": self.color,
            "fillColor": self.fill(),
            "weight": self.weight,
            "opacity": self.opacity,
            "fillOpacity": self.fill_opacity,
        })
    }
}

//! Figures for the statistics panels.

use crate::fetch::{display_property, group_thousands, numeric_property};
use crate::map::{LayerStyle, StyledLayer};

/// Meters per statute mile.
const METERS_PER_MILE: f64 = 1609.34;

/// One neighborhood with buildings near the loop.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedNeighborhood {
    pub name: String,
    pub count: f64,
    pub color: String,
}

/// How many neighborhoods have nearby buildings, and which.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborhoodStats {
    pub with_buildings: usize,
    pub total: usize,
    /// Neighborhoods with a positive count, highest first.
    pub ranked: Vec<RankedNeighborhood>,
}

impl NeighborhoodStats {
    /// `None` unless `layer` is a choropleth.
    pub fn from_layer(layer: &StyledLayer, name_property: &str) -> Option<Self> {
        let LayerStyle::Choropleth { property, .. } = &layer.style else {
            return None;
        };
        let colormap = layer.colormap.as_ref()?;
        let features = layer.dataset.features();

        let mut ranked: Vec<RankedNeighborhood> = features
            .iter()
            .filter_map(|feature| {
                let count = numeric_property(feature, property).filter(|c| *c > 0.0)?;
                Some(RankedNeighborhood {
                    name: display_property(feature, name_property),
                    count,
                    color: colormap.color_at(count),
                })
            })
            .collect();
        ranked.sort_by(|a, b| b.count.total_cmp(&a.count));

        Some(Self {
            with_buildings: ranked.len(),
            total: features.len(),
            ranked,
        })
    }
}

/// Building count within the buffer distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingStats {
    pub total: usize,
    pub buffer_meters: f64,
}

impl BuildingStats {
    pub fn from_layer(layer: &StyledLayer, buffer_meters: f64) -> Self {
        Self {
            total: layer.dataset.len(),
            buffer_meters,
        }
    }

    pub fn buffer_miles(&self) -> f64 {
        self.buffer_meters / METERS_PER_MILE
    }
}

/// `42` stays `42`, `12500` becomes `12,500`, fractions keep two decimals.
pub fn format_count(count: f64) -> String {
    if count.fract() == 0.0 && count.abs() < i64::MAX as f64 {
        group_thousands(count as i64)
    } else {
        format!("{count:.2}")
    }
}

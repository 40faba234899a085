//! Layer composition: a dataset plus the instructions to draw it.

use super::{LinearColormap, PathStyle, RenderError, colormap::Palette, legend::LegendEntry};
use crate::config::{LayerConfig, TooltipConfig};
use crate::fetch::{GeometryDataset, display_property, numeric_property};
use crate::utils::html::escape_html;
use geojson::{FeatureCollection, GeoJson};
use serde_json::{Map, Value as JsonValue};

/// Per-feature property carrying the resolved Leaflet style.
pub const STYLE_PROPERTY: &str = "__style";

/// Per-feature property carrying the rendered tooltip HTML.
pub const TOOLTIP_PROPERTY: &str = "__tooltip";

/// How a layer chooses feature colors.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerStyle {
    Uniform(PathStyle),
    Choropleth {
        property: String,
        palette: Palette,
        zero_color: String,
        base: PathStyle,
    },
}

/// A dataset paired with everything needed to draw it.
#[derive(Debug, Clone)]
pub struct StyledLayer {
    pub id: String,
    pub name: String,
    pub dataset: GeometryDataset,
    pub style: LayerStyle,
    /// Resolved style of each feature, parallel to `dataset.features()`.
    pub feature_styles: Vec<PathStyle>,
    pub tooltip: Option<TooltipConfig>,
    pub legend: Vec<LegendEntry>,
    pub colormap: Option<LinearColormap>,
}

/// Pair `dataset` with the style, tooltip and legend of `config`.
pub fn compose_layer(
    dataset: GeometryDataset,
    config: &LayerConfig,
) -> Result<StyledLayer, RenderError> {
    let Some(choropleth) = &config.choropleth else {
        let style = config.style.clone();
        let legend = config
            .legend
            .iter()
            .map(|label| LegendEntry::new(style.swatch(), label))
            .collect();

        return Ok(StyledLayer {
            id: config.id.clone(),
            name: config.name.clone(),
            feature_styles: vec![style.clone(); dataset.len()],
            dataset,
            style: LayerStyle::Uniform(style),
            tooltip: config.tooltip.clone(),
            legend,
            colormap: None,
        });
    };

    let property = &choropleth.property;
    let missing = || RenderError::MissingProperty {
        layer: config.id.clone(),
        property: property.clone(),
    };
    let vmax = dataset.max_numeric(property).ok_or_else(missing)?;
    let colormap = choropleth
        .palette
        .scale(0.0, vmax)
        .with_caption(choropleth.caption.clone());

    let feature_styles = dataset
        .features()
        .iter()
        .map(|feature| match numeric_property(feature, property) {
            Some(value) if value > 0.0 => config.style.painted(&colormap.color_at(value)),
            _ => config.style.painted(&choropleth.zero_color),
        })
        .collect();

    let lowest_positive = dataset
        .numeric_values(property)
        .filter(|v| *v > 0.0)
        .reduce(f64::min);
    let mut legend = Vec::new();
    // all-zero data paints every feature with zero_color
    if let Some(label) = &choropleth.high_label
        && vmax > 0.0
    {
        legend.push(LegendEntry::new(&colormap.color_at(vmax), label));
    }
    if let (Some(label), Some(low)) = (&choropleth.low_label, lowest_positive) {
        legend.push(LegendEntry::new(&colormap.color_at(low), label));
    }

    Ok(StyledLayer {
        id: config.id.clone(),
        name: config.name.clone(),
        dataset,
        style: LayerStyle::Choropleth {
            property: property.clone(),
            palette: choropleth.palette,
            zero_color: choropleth.zero_color.clone(),
            base: config.style.clone(),
        },
        feature_styles,
        tooltip: config.tooltip.clone(),
        legend,
        colormap: Some(colormap),
    })
}

impl StyledLayer {
    /// FeatureCollection with each feature's style and tooltip attached as
    /// properties, ready for `L.geoJson`.
    pub fn to_geojson(&self) -> JsonValue {
        let features = self
            .dataset
            .features()
            .iter()
            .zip(&self.feature_styles)
            .map(|(feature, style)| {
                let mut feature = feature.clone();
                let properties = feature.properties.get_or_insert_with(Map::new);
                properties.insert(STYLE_PROPERTY.into(), style.to_leaflet());
                if let Some(tooltip) = &self.tooltip {
                    let html = tooltip_html(tooltip, &feature);
                    feature.set_property(TOOLTIP_PROPERTY, html);
                }
                feature
            })
            .collect();

        let collection = FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        };
        GeoJson::FeatureCollection(collection).to_json_value()
    }
}

/// Two-column table of labelled properties.
fn tooltip_html(tooltip: &TooltipConfig, feature: &geojson::Feature) -> String {
    let rows: String = tooltip
        .labelled_fields()
        .map(|(field, label)| {
            format!(
                "<tr><th>{}</th><td>{}</td></tr>",
                escape_html(label),
                escape_html(&display_property(feature, field))
            )
        })
        .collect();
    format!("<table>{rows}</table>")
}

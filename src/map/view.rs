//! Map composition and the Leaflet script that draws it.
//!
//! # Script layout
//!
//! ```text
//! L.map(container)            viewport
//! L.tileLayer(...)            basemap (omitted when blank)
//! L.geoJson(layer_0) ...      overlays, in draw order
//! L.control.layers(...)       basemap + overlays, same order
//! L.control.scale()           optional
//! colormap_N                  one colorbar per choropleth layer
//! L.marker(...)               markers with popups
//! ```

use super::{LinearColormap, Marker, StyledLayer, TileLayer, marker::ICON_SIZE};
use crate::config::MapConfig;
use crate::fetch::HttpClient;
use crate::log;
use crate::utils::{error::error_chain, html::escape_html};
use serde_json::{Value as JsonValue, json};
use std::fmt::Write;

/// Initial map position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub lat: f64,
    pub lon: f64,
    pub zoom: u8,
}

impl Viewport {
    pub const fn from_config(map: &MapConfig) -> Self {
        Self {
            lat: map.lat(),
            lon: map.lon(),
            zoom: map.zoom,
        }
    }
}

/// Map controls besides zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub scale: bool,
    pub collapse_layers: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            scale: true,
            collapse_layers: true,
        }
    }
}

impl From<&MapConfig> for Controls {
    fn from(map: &MapConfig) -> Self {
        Self {
            scale: map.control_scale,
            collapse_layers: map.collapse_layer_control,
        }
    }
}

/// Fully composed map for one page view.
#[derive(Debug, Clone)]
pub struct MapView {
    pub viewport: Viewport,
    pub tiles: TileLayer,
    /// Set when the basemap was replaced by a blank one.
    pub notice: Option<String>,
    /// Overlays in draw order; the last one is on top.
    pub overlays: Vec<StyledLayer>,
    pub markers: Vec<Marker>,
    pub controls: Controls,
}

/// Compose the basemap, overlays and markers with the viewport and controls
/// of `map`.
///
/// Basemap failures never abort: the map falls back to a blank basemap and
/// carries a notice for the page.
pub fn render_map(
    map: &MapConfig,
    token: &str,
    layers: Vec<StyledLayer>,
    markers: Vec<Marker>,
    http: &dyn HttpClient,
) -> MapView {
    let basemap = TileLayer::from_config(&map.tiles, token).and_then(|layer| {
        if map.tiles.verify {
            layer.verify(http)?;
        }
        Ok(layer)
    });

    let (tiles, notice) = match basemap {
        Ok(layer) => (layer, None),
        Err(err) => {
            log!("warn"; "basemap disabled: {}", error_chain(&err, ": "));
            let notice = format!("Satellite basemap unavailable: {err}.");
            (TileLayer::blank(), Some(notice))
        }
    };

    MapView {
        viewport: Viewport::from_config(map),
        tiles,
        notice,
        overlays: layers,
        markers,
        controls: Controls::from(map),
    }
}

impl MapView {
    /// Leaflet script drawing this map into the element `container`.
    pub fn to_script(&self, container: &str) -> String {
        let mut js = String::new();
        let Viewport { lat, lon, zoom } = self.viewport;

        js.push_str("(function () {\n");
        let _ = writeln!(
            js,
            "var map = L.map({}, {{center: [{lat}, {lon}], zoom: {zoom}}});",
            js_string(container)
        );

        if !self.tiles.is_blank() {
            let options = json!({
                "attribution": self.tiles.attribution,
                "maxZoom": self.tiles.max_zoom,
            });
            let _ = writeln!(
                js,
                "var basemap = L.tileLayer({}, {}).addTo(map);",
                js_string(&self.tiles.url),
                js_value(&options)
            );
        }

        js.push_str("var overlays = {};\n");
        for (i, layer) in self.overlays.iter().enumerate() {
            let _ = writeln!(
                js,
                "var layer_{i} = L.geoJson({}, {{style: styleOf, onEachFeature: bindTooltip}}).addTo(map);",
                js_value(&layer.to_geojson())
            );
            let _ = writeln!(js, "overlays[{}] = layer_{i};", js_string(&layer.name));
        }

        let bases = if self.tiles.is_blank() {
            String::from("{}")
        } else {
            format!("{{{}: basemap}}", js_string(&self.tiles.name))
        };
        let _ = writeln!(
            js,
            "L.control.layers({bases}, overlays, {{collapsed: {}}}).addTo(map);",
            self.controls.collapse_layers
        );

        if self.controls.scale {
            js.push_str("L.control.scale().addTo(map);\n");
        }

        let colormaps = self.overlays.iter().filter_map(|l| l.colormap.as_ref());
        for (i, colormap) in colormaps.enumerate() {
            let _ = writeln!(
                js,
                "var colormap_{i} = L.control({{position: \"topright\"}});\n\
                 colormap_{i}.onAdd = function () {{ var div = L.DomUtil.create(\"div\", \"colormap\"); div.innerHTML = {}; return div; }};\n\
                 colormap_{i}.addTo(map);",
                js_string(&colorbar_html(colormap))
            );
        }

        for marker in &self.markers {
            let icon = json!({ "iconUrl": marker.icon_url, "iconSize": ICON_SIZE });
            let _ = writeln!(
                js,
                "L.marker([{}, {}], {{icon: L.icon({})}}).bindPopup({}).addTo(map);",
                marker.lat,
                marker.lon,
                js_value(&icon),
                js_string(&marker.popup_html())
            );
        }

        js.push_str(HELPERS);
        js.push_str("})();\n");
        js
    }
}

/// Function declarations hoisted within the wrapper closure.
const HELPERS: &str = r#"function styleOf(feature) {
  return feature.properties.__style;
}
function bindTooltip(feature, layer) {
  if (feature.properties.__tooltip) {
    layer.bindTooltip(feature.properties.__tooltip, {sticky: true});
  }
}
"#;

/// Caption, gradient bar and range labels of a colormap.
fn colorbar_html(colormap: &LinearColormap) -> String {
    let caption = colormap
        .caption
        .as_deref()
        .map(|c| format!(r#"<div class="caption">{}</div>"#, escape_html(c)))
        .unwrap_or_default();
    format!(
        r#"{caption}<div class="bar" style="background:{}"></div><div class="ticks"><span>{}</span><span>{}</span></div>"#,
        colormap.gradient_css(),
        colormap.vmin,
        colormap.vmax
    )
}

/// JSON text safe to embed inside a `<script>` element.
fn js_value(value: &JsonValue) -> String {
    value.to_string().replace("</", "<\\/")
}

fn js_string(s: &str) -> String {
    js_value(&JsonValue::from(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::fetch::{GeometryDataset, MockHttpClient};
    use crate::map::compose_layer;

    const TOKEN: &str = "pk.eyJ1IjoiZXhhbXBsZSJ9.c2lnbmF0dXJl";

    fn layer(id: &str) -> StyledLayer {
        let config = AppConfig::default();
        let mut layer_config = config.layer("steam_loop").cloned().unwrap();
        layer_config.id = id.into();
        layer_config.name = format!("Layer {id}");
        let text = r#"{"type": "Feature", "properties": {"label": "</script>"},
            "geometry": {"type": "Point", "coordinates": [-75.16, 39.95]}}"#;
        let dataset = GeometryDataset::from_bytes(id, "u", text.as_bytes()).unwrap();
        compose_layer(dataset, &layer_config).unwrap()
    }

    fn view(token: &str, http: &MockHttpClient) -> MapView {
        let layers = vec![layer("a"), layer("b"), layer("c")];
        render_map(&MapConfig::default(), token, layers, Vec::new(), http)
    }

    #[test]
    fn test_valid_token_keeps_basemap() {
        let http = MockHttpClient::new();
        let view = view(TOKEN, &http);

        assert!(view.notice.is_none());
        assert!(!view.tiles.is_blank());
        assert_eq!(view.overlays.len(), 3);
        assert_eq!(view.viewport.zoom, 13);
        assert_eq!(view.controls, Controls::default());
        // no request unless configured
        assert_eq!(http.request_count(), 0);
    }

    #[test]
    fn test_invalid_token_degrades_to_blank() {
        let view = view("not-a-token", &MockHttpClient::new());

        assert!(view.tiles.is_blank());
        assert!(view.notice.as_deref().unwrap().contains("not a valid Mapbox token"));
        assert_eq!(view.overlays.len(), 3);

        let script = view.to_script("map");
        assert!(!script.contains("L.tileLayer"));
        assert!(script.contains("L.control.layers({}, overlays"));
    }

    #[test]
    fn test_rejected_token_degrades_to_blank() {
        let mut map = MapConfig::default();
        map.tiles.verify = true;
        let tile_url = TileLayer::from_config(&map.tiles, TOKEN).unwrap().tile_url(0, 0, 0);
        let http = MockHttpClient::new().with_status(&tile_url, 401);

        let view = render_map(&map, TOKEN, vec![], vec![], &http);

        assert!(view.tiles.is_blank());
        assert!(view.notice.as_deref().unwrap().contains("HTTP 401"));
        assert_eq!(http.request_count(), 1);
    }

    #[test]
    fn test_script_draw_order() {
        let script = view(TOKEN, &MockHttpClient::new()).to_script("map");

        let a = script.find("var layer_0").unwrap();
        let b = script.find("var layer_1").unwrap();
        let c = script.find("var layer_2").unwrap();
        assert!(a < b && b < c);

        let names: Vec<_> = ["\"Layer a\"", "\"Layer b\"", "\"Layer c\""]
            .iter()
            .map(|name| script.find(name).unwrap())
            .collect();
        assert!(names[0] < names[1] && names[1] < names[2]);
    }

    #[test]
    fn test_script_controls() {
        let script = view(TOKEN, &MockHttpClient::new()).to_script("map");

        assert!(script.contains("L.map(\"map\", {center: [39.9526, -75.1652], zoom: 13})"));
        assert!(script.contains("{\"Mapbox Satellite View\": basemap}"));
        assert!(script.contains("{collapsed: true}"));
        assert!(script.contains("L.control.scale()"));

        let map = MapConfig {
            control_scale: false,
            collapse_layer_control: false,
            ..MapConfig::default()
        };
        let view = render_map(&map, TOKEN, vec![], vec![], &MockHttpClient::new());
        assert_eq!(
            view.controls,
            Controls {
                scale: false,
                collapse_layers: false,
            }
        );

        let script = view.to_script("map");
        assert!(script.contains("{collapsed: false}"));
        assert!(!script.contains("L.control.scale()"));
    }

    #[test]
    fn test_script_escapes_closing_tags() {
        let script = view(TOKEN, &MockHttpClient::new()).to_script("map");
        assert!(!script.contains("</script>"));
        assert!(script.contains("<\\/script>"));
    }

    #[test]
    fn test_script_markers() {
        let config = AppConfig::default();
        let markers = config
            .markers
            .iter()
            .map(|m| Marker::new(m, &config.map.marker_icon, Some("https://img/x.jpg".into())))
            .collect();
        let view = render_map(&config.map, TOKEN, vec![], markers, &MockHttpClient::new());
        let script = view.to_script("map");

        assert_eq!(script.matches("L.marker(").count(), 2);
        assert!(script.contains("\"iconSize\":[28,30]"));
        assert!(script.contains("Edison Plant"));
    }

    #[test]
    fn test_colorbar_html() {
        let colormap = crate::map::Palette::OrRd
            .scale(0.0, 42.0)
            .with_caption(Some("Buildings".into()));
        let html = colorbar_html(&colormap);

        assert!(html.starts_with(r#"<div class="caption">Buildings</div>"#));
        assert!(html.contains("<span>0</span><span>42</span>"));
    }
}

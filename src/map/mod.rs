//! Map composition.
//!
//! Turns fetched datasets into styled layers and composes them with the
//! basemap, markers and controls into a [`MapView`], which renders itself
//! as a Leaflet script.

mod colormap;
mod error;
mod layer;
mod legend;
mod marker;
mod style;
mod tiles;
mod view;

pub use colormap::{LinearColormap, Palette};
pub use error::RenderError;
pub use layer::{LayerStyle, StyledLayer, compose_layer};
pub use legend::Legend;
pub use marker::Marker;
pub use style::PathStyle;
pub use tiles::TileLayer;
pub use view::{MapView, render_map};

use regex::Regex;
use std::sync::LazyLock;

/// Highest zoom level Leaflet tile layers accept.
pub const MAX_ZOOM: u8 = 22;

/// `#rgb`, `#rrggbb` or `transparent`.
pub fn is_valid_color(color: &str) -> bool {
    static RE_HEX_COLOR: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap());
    color.eq_ignore_ascii_case(style::TRANSPARENT) || RE_HEX_COLOR.is_match(color)
}

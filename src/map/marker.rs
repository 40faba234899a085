//! Point markers with image popups.

use crate::config::MarkerConfig;
use crate::utils::html::escape_html;

/// Icon size in pixels, `[width, height]`.
pub const ICON_SIZE: [u32; 2] = [28, 30];

/// Popup image edge length in pixels.
pub const POPUP_IMAGE_SIZE: u32 = 120;

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub icon_url: String,
    pub image_url: Option<String>,
}

impl Marker {
    /// `image_url` is the already resolved secret named by `config.image`.
    pub fn new(config: &MarkerConfig, icon_url: &str, image_url: Option<String>) -> Self {
        Self {
            name: config.name.clone(),
            lat: config.lat,
            lon: config.lon,
            icon_url: icon_url.to_owned(),
            image_url,
        }
    }

    pub fn popup_html(&self) -> String {
        let name = escape_html(&self.name);
        match &self.image_url {
            Some(url) => format!(
                r#"<b>{name}</b><br><img src="{}" alt="{name}" width="{size}" height="{size}">"#,
                escape_html(url),
                size = POPUP_IMAGE_SIZE
            ),
            None => format!("<b>{name}</b>"),
        }
    }
}

//! Basemap tile layer.

use super::RenderError;
use crate::config::TilesConfig;
use crate::fetch::{HttpClient, HttpError};
use regex::Regex;
use std::sync::LazyLock;

/// Placeholder in the tile URL template replaced by the access token.
const TOKEN_PLACEHOLDER: &str = "{token}";

/// Raster tile basemap, possibly degraded to a blank background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayer {
    /// XYZ template with the token substituted. Empty for a blank basemap.
    pub url: String,
    pub name: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl TileLayer {
    /// Build the basemap from `tiles`, substituting `token` into the URL.
    ///
    /// Templates without `{token}` accept any token.
    pub fn from_config(tiles: &TilesConfig, token: &str) -> Result<Self, RenderError> {
        let url = if tiles.url.contains(TOKEN_PLACEHOLDER) {
            if !is_valid_token(token) {
                return Err(RenderError::InvalidAccessToken);
            }
            tiles.url.replace(TOKEN_PLACEHOLDER, token)
        } else {
            tiles.url.clone()
        };

        Ok(Self {
            url,
            name: tiles.name.clone(),
            attribution: tiles.attribution.clone(),
            max_zoom: tiles.max_zoom,
        })
    }

    /// Empty basemap used when the configured one is unusable.
    pub fn blank() -> Self {
        Self {
            url: String::new(),
            name: "Blank".into(),
            attribution: String::new(),
            max_zoom: super::MAX_ZOOM,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.url.is_empty()
    }

    /// Request the single zoom-0 tile to check that the provider accepts
    /// the token.
    pub fn verify(&self, http: &dyn HttpClient) -> Result<(), RenderError> {
        match http.get(&self.tile_url(0, 0, 0)) {
            Ok(_) => Ok(()),
            Err(HttpError::Status {
                status: status @ (401 | 403),
                ..
            }) => Err(RenderError::TokenRejected(status)),
            Err(err) => Err(RenderError::Probe(err)),
        }
    }

    /// Concrete URL of one tile.
    pub fn tile_url(&self, z: u8, x: u32, y: u32) -> String {
        self.url
            .replace("{s}", "a")
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
            .replace("{r}", "")
    }
}

/// Mapbox token shape: `pk.`/`sk.`/`tk.` then two base64url segments.
fn is_valid_token(token: &str) -> bool {
    static RE_MAPBOX_TOKEN: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^[pst]k\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+$").unwrap());
    RE_MAPBOX_TOKEN.is_match(token.trim())
}

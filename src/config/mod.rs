//! Dashboard configuration management for `steamloop.toml`.
//!
//! # Sections
//!
//! | Section       | Purpose                                          |
//! |---------------|--------------------------------------------------|
//! | `[base]`      | Page metadata (title, author)                    |
//! | `[map]`       | Viewport, basemap tiles, map controls            |
//! | `[fetch]`     | HTTP client for dataset downloads                |
//! | `[secrets]`   | Location of the secrets file                     |
//! | `[serve]`     | Dashboard server (interface, port)               |
//! | `[render]`    | Page output (file, minify)                       |
//! | `[page]`      | Which layers feed the statistics panels          |
//! | `[[layers]]`  | Overlays in draw order                           |
//! | `[[markers]]` | Points of interest with image popups             |
//!
//! Every section is optional; the defaults describe the Philadelphia
//! steam loop dashboard.
//!
//! # Example
//!
//! ```toml
//! [base]
//! title = "Philadelphia Steam Loop Map"
//!
//! [map]
//! center = [39.9526, -75.1652]
//! zoom = 13
//!
//! [serve]
//! port = 8501
//! ```

mod base;
pub mod defaults;
mod error;
mod layers;
mod map;
mod page;
mod serve;
mod sources;

pub use error::ConfigError;
pub use layers::{ChoroplethConfig, LayerConfig, MarkerConfig, TooltipConfig};
pub use map::{MapConfig, TilesConfig};
pub use page::PageConfig;

use base::BaseConfig;
use serve::{RenderConfig, ServeConfig};
use sources::{FetchConfig, SecretsConfig};

use crate::{
    cli::{Cli, Commands},
    map::{MAX_ZOOM, is_valid_color},
};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing steamloop.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Project root (set after loading)
    #[serde(skip)]
    pub root: PathBuf,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub base: BaseConfig,

    #[serde(default)]
    pub map: MapConfig,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub secrets: SecretsConfig,

    #[serde(default)]
    pub serve: ServeConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub page: PageConfig,

    /// Overlays in draw order (last is topmost)
    #[serde(default = "defaults::layers::all")]
    #[educe(Default = defaults::layers::all())]
    pub layers: Vec<LayerConfig>,

    #[serde(default = "defaults::markers::all")]
    #[educe(Default = defaults::markers::all())]
    pub markers: Vec<MarkerConfig>,
}

impl AppConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Load the config named by the CLI, falling back to defaults when the
    /// file does not exist, then apply CLI overrides.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.update_with_cli(cli);
        Ok(config)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = Self::normalize_path(cli.root.as_deref().unwrap_or(Path::new("./")));
        self.config_path = Self::normalize_path(&root.join(&cli.config));

        Self::update_option(&mut self.secrets.path, cli.secrets.as_ref());
        self.secrets.path = Self::resolve_with_root(&root, &self.secrets.path);

        if let Some(args) = cli.page_args() {
            Self::update_option(&mut self.render.minify, args.minify.as_ref());
            Self::update_option(&mut self.map.tiles.verify, args.verify_token.as_ref());
        }

        match &cli.command {
            Commands::Serve {
                interface, port, ..
            } => {
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
            }
            Commands::Render { output, .. } => {
                Self::update_option(&mut self.render.output, output.as_ref());
            }
            Commands::Init => {}
        }
        self.render.output = Self::normalize_path(&root.join(&self.render.output));

        self.root = root;
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Expand `~` and resolve relative paths against root.
    fn resolve_with_root(root: &Path, path: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
        let path = PathBuf::from(expanded);
        if path.is_relative() {
            Self::normalize_path(&root.join(path))
        } else {
            Self::normalize_path(&path)
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Find a layer by id.
    pub fn layer(&self, id: &str) -> Option<&LayerConfig> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    /// Validate configuration values that serde cannot check.
    pub fn validate(&self) -> Result<()> {
        let [lat, lon] = self.map.center;
        if !is_valid_position(lat, lon) {
            bail!(ConfigError::Validation(format!(
                "[map.center] = [{lat}, {lon}] is not a valid latitude/longitude"
            )));
        }
        if self.map.zoom > MAX_ZOOM || self.map.tiles.max_zoom > MAX_ZOOM {
            bail!(ConfigError::Validation(format!(
                "[map.zoom] and [map.tiles.max_zoom] must be at most {MAX_ZOOM}"
            )));
        }

        if self.layers.is_empty() {
            bail!(ConfigError::Validation(
                "at least one [[layers]] entry is required".into()
            ));
        }

        let mut seen = HashSet::new();
        for layer in &self.layers {
            if !seen.insert(layer.id.as_str()) {
                bail!(ConfigError::Validation(format!(
                    "duplicate layer id `{}`",
                    layer.id
                )));
            }
            Self::validate_layer(layer)?;
        }

        for (field, id) in [
            ("neighborhood_layer", &self.page.neighborhood_layer),
            ("building_layer", &self.page.building_layer),
        ] {
            if let Some(id) = id
                && self.layer(id).is_none()
            {
                bail!(ConfigError::Validation(format!(
                    "[page.{field}] `{id}` does not name a configured layer"
                )));
            }
        }

        for marker in &self.markers {
            if !is_valid_position(marker.lat, marker.lon) {
                bail!(ConfigError::Validation(format!(
                    "[[markers]] `{}` at [{}, {}] is not a valid latitude/longitude",
                    marker.name, marker.lat, marker.lon
                )));
            }
        }

        Ok(())
    }

    fn validate_layer(layer: &LayerConfig) -> Result<()> {
        let invalid = |reason: String| ConfigError::Layer {
            id: layer.id.clone(),
            reason,
        };
        let style = &layer.style;

        let colors = std::iter::once(&style.color)
            .chain(style.fill_color.as_ref())
            .chain(layer.choropleth.as_ref().map(|c| &c.zero_color));
        for color in colors {
            if !is_valid_color(color) {
                bail!(invalid(format!(
                    "`{color}` is not a #rgb, #rrggbb or `transparent` color"
                )));
            }
        }

        for (field, value) in [("opacity", style.opacity), ("fill_opacity", style.fill_opacity)] {
            if !(0.0..=1.0).contains(&value) {
                bail!(invalid(format!("style.{field} must be between 0 and 1")));
            }
        }
        if style.weight < 0.0 {
            bail!(invalid("style.weight must not be negative".into()));
        }

        if let Some(tooltip) = &layer.tooltip
            && !tooltip.aliases.is_empty()
            && tooltip.aliases.len() != tooltip.fields.len()
        {
            bail!(invalid("tooltip aliases must match fields one to one".into()));
        }

        Ok(())
    }
}

fn is_valid_position(lat: f64, lon: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

// ============================================================================
// Tests
// ============================================================================

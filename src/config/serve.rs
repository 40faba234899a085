//! `[serve]` and `[render]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[serve]` section in steamloop.toml - dashboard server settings.
///
/// # Example
/// ```toml
/// [serve]
/// interface = "0.0.0.0"  # Listen on all interfaces
/// port = 8501
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    #[serde(default = "defaults::serve::interface")]
    #[educe(Default = defaults::serve::interface())]
    pub interface: String,

    /// HTTP port number (default: 8501).
    #[serde(default = "defaults::serve::port")]
    #[educe(Default = defaults::serve::port())]
    pub port: u16,
}

/// `[render]` section - page output settings shared by `serve` and `render`.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    /// Output file of the `render` command (relative to root).
    #[serde(default = "defaults::render::output")]
    #[educe(Default = defaults::render::output())]
    pub output: PathBuf,

    /// Minify the generated html.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub minify: bool,
}

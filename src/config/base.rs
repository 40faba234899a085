//! `[base]` section configuration.
//!
//! Contains page metadata shown in the dashboard header and footer.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[base]` section in steamloop.toml - page metadata.
///
/// # Example
/// ```toml
/// [base]
/// title = "Philadelphia Steam Loop Map"
/// author = "Alice"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Page title, used for the browser tab and the page header.
    #[serde(default = "defaults::base::title")]
    #[educe(Default = defaults::base::title())]
    pub title: String,

    /// Short description for the meta tag.
    #[serde(default)]
    pub description: String,

    /// Credit line shown under the disclaimer. Omitted when empty.
    #[serde(default = "defaults::base::author")]
    #[educe(Default = defaults::base::author())]
    pub author: String,

    /// BCP 47 language code for the `<html lang>` attribute.
    #[serde(default = "defaults::base::language")]
    #[educe(Default = defaults::base::language())]
    pub language: String,
}

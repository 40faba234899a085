//! `[page]` section configuration.
//!
//! Links dashboard panels to the layers they summarize.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[page]` section in steamloop.toml.
///
/// # Example
/// ```toml
/// [page]
/// building_layer = "buildings"
/// neighborhood_layer = "neighborhoods"
/// buffer_meters = 1000.0
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct PageConfig {
    /// Layer id whose feature count feeds the building statistics panel.
    #[serde(default = "defaults::page::building_layer")]
    #[educe(Default = defaults::page::building_layer())]
    pub building_layer: Option<String>,

    /// Choropleth layer id feeding the neighborhood statistics panel.
    #[serde(default = "defaults::page::neighborhood_layer")]
    #[educe(Default = defaults::page::neighborhood_layer())]
    pub neighborhood_layer: Option<String>,

    /// Feature property naming each neighborhood.
    #[serde(default = "defaults::page::name_property")]
    #[educe(Default = defaults::page::name_property())]
    pub name_property: String,

    /// Distance from the steam loop used to select buildings.
    #[serde(default = "defaults::page::buffer_meters")]
    #[educe(Default = defaults::page::buffer_meters())]
    pub buffer_meters: f64,

    /// Optional secret key of the illustration in the CHP panel.
    #[serde(default = "defaults::page::illustration_key")]
    #[educe(Default = defaults::page::illustration_key())]
    pub illustration_key: Option<String>,

    /// Panels rendered open: `legend`, `neighborhoods`, `buildings`, `chp`,
    /// `sources`, `disclaimer`.
    #[serde(default = "defaults::page::expanded")]
    #[educe(Default = defaults::page::expanded())]
    pub expanded: Vec<String>,
}

impl PageConfig {
    pub fn is_expanded(&self, panel: &str) -> bool {
        self.expanded.iter().any(|p| p == panel)
    }
}

#[cfg(test)]
mod tests {
    use super::super::AppConfig;

    #[test]
    fn test_page_config_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();

        assert_eq!(config.page.building_layer.as_deref(), Some("buildings"));
        assert_eq!(config.page.neighborhood_layer.as_deref(), Some("neighborhoods"));
        assert_eq!(config.page.buffer_meters, 1000.0);
        assert_eq!(config.page.name_property, "listname");
        assert!(config.page.is_expanded("buildings"));
        assert!(!config.page.is_expanded("sources"));
        assert_eq!(
            config.page.illustration_key.as_deref(),
            Some("aws.cogeneration_png")
        );
    }

    #[test]
    fn test_page_config_buffer() {
        let config = r#"
            [page]
            buffer_meters = 500.0
            expanded = ["sources"]
        "#;
        let config: AppConfig = toml::from_str(config).unwrap();
        assert_eq!(config.page.buffer_meters, 500.0);
        assert!(config.page.is_expanded("sources"));
        assert!(!config.page.is_expanded("legend"));
    }
}

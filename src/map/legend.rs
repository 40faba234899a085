//! Legend panel shown beside the map.

use super::StyledLayer;
use crate::utils::html::escape_html;

/// One colored swatch with its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub color: String,
    pub label: String,
}

impl LegendEntry {
    pub fn new(color: &str, label: &str) -> Self {
        Self {
            color: color.to_owned(),
            label: label.to_owned(),
        }
    }
}

/// Legend entries of all layers, one per distinct swatch color.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    /// Merge layer entries in draw order. When two entries share a color,
    /// the first one wins.
    pub fn from_layers(layers: &[StyledLayer]) -> Self {
        let mut entries: Vec<LegendEntry> = Vec::new();
        for entry in layers.iter().flat_map(|layer| &layer.legend) {
            if !entries
                .iter()
                .any(|e| e.color.eq_ignore_ascii_case(&entry.color))
            {
                entries.push(entry.clone());
            }
        }
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn to_html(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    r#"<li><span class="swatch" style="background:{}"></span>{}</li>"#,
                    escape_html(&entry.color),
                    escape_html(&entry.label)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

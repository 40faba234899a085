//! Sequential color scales for choropleth layers.
//!
//! Palettes are the 7-class ColorBrewer sequential schemes. A
//! [`LinearColormap`] stretches a palette over `[vmin, vmax]` and
//! interpolates between neighbouring classes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// ColorBrewer sequential palette, light to dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    #[default]
    OrRd,
    YlOrRd,
    Blues,
    Greens,
}

impl Palette {
    pub const fn colors(self) -> [&'static str; 7] {
        match self {
            Self::OrRd => [
                "#fef0d9", "#fdd49e", "#fdbb84", "#fc8d59", "#ef6548", "#d7301f", "#990000",
            ],
            Self::YlOrRd => [
                "#ffffb2", "#fed976", "#feb24c", "#fd8d3c", "#fc4e2a", "#e31a1c", "#b10026",
            ],
            Self::Blues => [
                "#eff3ff", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#084594",
            ],
            Self::Greens => [
                "#edf8e9", "#c7e9c0", "#a1d99b", "#74c476", "#41ab5d", "#238b45", "#005a32",
            ],
        }
    }

    /// Stretch the palette over `[vmin, vmax]`.
    pub fn scale(self, vmin: f64, vmax: f64) -> LinearColormap {
        LinearColormap {
            stops: self.colors().iter().filter_map(|c| Rgb::parse(c)).collect(),
            vmin,
            vmax,
            caption: None,
        }
    }
}

/// 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#rrggbb` or `#rgb`.
    pub fn parse(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            6 => Some(Self(
                channel(digits.get(0..2)?)?,
                channel(digits.get(2..4)?)?,
                channel(digits.get(4..6)?)?,
            )),
            3 => {
                let short = |i: usize| channel(digits.get(i..=i)?).map(|v| v * 17);
                Some(Self(short(0)?, short(1)?, short(2)?))
            }
            _ => None,
        }
    }

    fn lerp(self, other: Self, t: f64) -> Self {
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Self(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Palette stretched linearly over a value range.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearColormap {
    stops: Vec<Rgb>,
    pub vmin: f64,
    pub vmax: f64,
    /// Caption of the colorbar drawn on the map.
    pub caption: Option<String>,
}

impl LinearColormap {
    pub fn with_caption(mut self, caption: Option<String>) -> Self {
        self.caption = caption;
        self
    }

    /// Color of `value`, clamped to the scale range.
    pub fn color_at(&self, value: f64) -> String {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return String::from("#000000");
        };
        let span = self.vmax - self.vmin;
        if span <= 0.0 || !value.is_finite() {
            return last.to_string();
        }

        let t = ((value - self.vmin) / span).clamp(0.0, 1.0);
        let position = t * (self.stops.len() - 1) as f64;
        let index = position.floor() as usize;
        let color = match self.stops.get(index + 1) {
            Some(next) => self.stops[index].lerp(*next, position - index as f64),
            None if index == 0 => *first,
            None => *last,
        };
        color.to_string()
    }

    /// CSS gradient across the palette, left to right.
    pub fn gradient_css(&self) -> String {
        let last = self.stops.len().saturating_sub(1).max(1) as f64;
        let stops: Vec<String> = self
            .stops
            .iter()
            .enumerate()
            .map(|(i, rgb)| format!("{rgb} {:.0}%", i as f64 / last * 100.0))
            .collect();
        format!("linear-gradient(to right, {})", stops.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            palette: Palette,
        }
        let w: Wrapper = toml::from_str("palette = \"orrd\"").unwrap();
        assert_eq!(w.palette, Palette::OrRd);
        let w: Wrapper = toml::from_str("palette = \"greens\"").unwrap();
        assert_eq!(w.palette, Palette::Greens);
        assert!(toml::from_str::<Wrapper>("palette = \"viridis\"").is_err());
    }

    #[test]
    fn test_rgb_parse() {
        assert_eq!(Rgb::parse("#fef0d9"), Some(Rgb(0xfe, 0xf0, 0xd9)));
        assert_eq!(Rgb::parse("#F00"), Some(Rgb(255, 0, 0)));
        assert_eq!(Rgb::parse("fef0d9"), None);
        assert_eq!(Rgb::parse("#12345"), None);
        assert_eq!(Rgb::parse("#zzzzzz"), None);
        assert_eq!(Rgb(0x99, 0, 0).to_string(), "#990000");
    }

    #[test]
    fn test_color_at_endpoints() {
        let cmap = Palette::OrRd.scale(0.0, 42.0);

        assert_eq!(cmap.color_at(0.0), "#fef0d9");
        assert_eq!(cmap.color_at(42.0), "#990000");
        // out of range clamps
        assert_eq!(cmap.color_at(-5.0), "#fef0d9");
        assert_eq!(cmap.color_at(100.0), "#990000");
    }

    #[test]
    fn test_color_at_hits_class_stops() {
        let cmap = Palette::OrRd.scale(0.0, 6.0);

        assert_eq!(cmap.color_at(3.0), "#fc8d59");
        assert_eq!(cmap.color_at(5.0), "#d7301f");
    }

    #[test]
    fn test_color_at_interpolates() {
        let cmap = Palette::Blues.scale(0.0, 6.0);
        // halfway between #eff3ff and #c6dbef
        assert_eq!(cmap.color_at(0.5), "#dbe7f7");
    }

    #[test]
    fn test_degenerate_range_uses_top_color() {
        let cmap = Palette::OrRd.scale(5.0, 5.0);
        assert_eq!(cmap.color_at(5.0), "#990000");
    }

    #[test]
    fn test_gradient_css() {
        let css = Palette::OrRd.scale(0.0, 1.0).gradient_css();

        assert!(css.starts_with("linear-gradient(to right, #fef0d9 0%"));
        assert!(css.ends_with("#990000 100%)"));
    }
}

//! Helpers shared by the map and page renderers.

pub mod error;
pub mod html;
pub mod minify;

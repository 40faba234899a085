//! Secrets file access (`secrets.toml`).
//!
//! Values are addressed by dotted keys: `mapbox.api_key` reads `api_key`
//! from the `[mapbox]` table.
//!
//! ```toml
//! [mapbox]
//! api_key = "pk.eyJ1Ijoi..."
//!
//! [aws]
//! steamloop_geojson = "https://bucket.s3.amazonaws.com/steamloop.geojson"
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use toml::{Table, Value};

/// Secret lookup failures. All of them abort the page render.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("missing secrets: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("failed to read secrets file `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("secrets file is not valid TOML")]
    Parse(#[from] toml::de::Error),
}

/// Parsed secrets file.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    table: Table,
}

impl Secrets {
    pub fn from_path(path: &Path) -> Result<Self, SecretError> {
        let content =
            fs::read_to_string(path).map_err(|err| SecretError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> Result<Self, SecretError> {
        Ok(Self {
            table: content.parse::<Table>()?,
        })
    }

    /// Value of a dotted key. Empty strings and non-string values count as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut value = self.table.get(first)?;
        for segment in segments {
            value = value.as_table()?.get(segment)?;
        }
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// Values of all `keys`, in order.
    ///
    /// Fails with every absent key listed, not just the first.
    pub fn require<S: AsRef<str>>(&self, keys: &[S]) -> Result<Vec<String>, SecretError> {
        let mut values = Vec::with_capacity(keys.len());
        let mut missing = Vec::new();

        for key in keys.iter().map(AsRef::as_ref) {
            match self.get(key) {
                Some(value) => values.push(value.to_owned()),
                None if !missing.iter().any(|m| m == key) => missing.push(key.to_owned()),
                None => {}
            }
        }

        if missing.is_empty() {
            Ok(values)
        } else {
            Err(SecretError::Missing(missing))
        }
    }
}

/// Template written by `steamloop init`.
pub const TEMPLATE: &str = r#"# Secrets for the steam loop dashboard. Keep this file out of version control.

[mapbox]
api_key = ""

[aws]
steamloop_geojson = ""
phl_bldg_geojson = ""
phl_nbrhoods_geojson = ""
edison_plant_jpg = ""
grays_ferry_jpg = ""
cogeneration_png = ""
"#;

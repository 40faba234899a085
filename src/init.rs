//! Project initialization.
//!
//! Writes a default `steamloop.toml` and a `secrets.toml` template to fill in.

use crate::{config::AppConfig, log, secrets};
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Write the default config and secrets template.
///
/// Fails without writing anything if either file already exists.
pub fn init_project(config: &AppConfig) -> Result<()> {
    let config_path = &config.config_path;
    let secrets_path = &config.secrets.path;

    for path in [config_path, secrets_path] {
        if path.exists() {
            bail!(
                "`{}` already exists. Remove it manually or init in a different path.",
                path.display()
            );
        }
    }

    let content = toml::to_string_pretty(&AppConfig::default())?;
    write_file(config_path, &content)?;
    log!("init"; "wrote {}", config_path.display());

    write_file(secrets_path, secrets::TEMPLATE)?;
    log!("secrets"; "wrote template {}, fill in the keys before rendering", secrets_path.display());

    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::Secrets;

    fn config_in(dir: &Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.config_path = dir.join("steamloop.toml");
        config.secrets.path = dir.join("secrets.toml");
        config
    }

    #[test]
    fn test_init_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        init_project(&config).unwrap();

        let written = AppConfig::from_path(&config.config_path).unwrap();
        assert_eq!(written.layers.len(), config.layers.len());
        assert_eq!(written.serve.port, 8501);
        assert!(written.validate().is_ok());

        let secrets = Secrets::from_path(&config.secrets.path).unwrap();
        assert!(secrets.get("mapbox.api_key").is_none());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        fs::write(&config.secrets.path, "[mapbox]\napi_key = \"keep\"\n").unwrap();

        assert!(init_project(&config).is_err());
        assert!(!config.config_path.exists());
        let secrets = fs::read_to_string(&config.secrets.path).unwrap();
        assert!(secrets.contains("keep"));
    }

    #[test]
    fn test_init_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir.path().join("nested/site"));

        init_project(&config).unwrap();
        assert!(config.config_path.is_file());
    }
}

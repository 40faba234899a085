//! Steamloop - a Leaflet map dashboard of the Philadelphia steam loop.

mod cli;
mod config;
mod fetch;
mod init;
mod logger;
mod map;
mod page;
mod pipeline;
mod secrets;
mod serve;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::AppConfig;
use init::init_project;
use serve::serve_dashboard;
use std::fs;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(&cli)?;

    if cli.is_init() {
        return init_project(&config);
    }
    config.validate()?;

    match &cli.command {
        Commands::Serve { .. } => serve_dashboard(&config),
        Commands::Render { .. } => render_once(&config),
        Commands::Init => Ok(()),
    }
}

/// Run the pipeline once and write the page to `[render].output`.
fn render_once(config: &AppConfig) -> Result<()> {
    let http = pipeline::http_client(config).context("Failed to build HTTP client")?;
    let page = pipeline::run(config, &http)?;

    let output = &config.render.output;
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(output, &page.html)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    log!("render"; "wrote {}", output.display());
    Ok(())
}

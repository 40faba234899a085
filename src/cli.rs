//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Steam loop map dashboard CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: steamloop.toml)
    #[arg(short = 'C', long, default_value = "steamloop.toml")]
    pub config: PathBuf,

    /// Secrets file path, overrides `[secrets].path`
    #[arg(short, long)]
    pub secrets: Option<PathBuf>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared page arguments for Serve and Render commands
#[derive(clap::Args, Debug, Clone)]
pub struct PageArgs {
    /// Minify the html page
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// Probe the tile provider with the access token before rendering
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub verify_token: Option<bool>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a default config and a secrets template
    Init,

    /// Serve the dashboard. Every page load re-fetches and re-renders the map
    Serve {
        #[command(flatten)]
        page_args: PageArgs,

        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Render the dashboard once and write it to an html file
    Render {
        #[command(flatten)]
        page_args: PageArgs,

        /// Output file path (relative to project root)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init)
    }

    /// Page arguments of the current command, if it renders a page.
    pub const fn page_args(&self) -> Option<&PageArgs> {
        match &self.command {
            Commands::Serve { page_args, .. } | Commands::Render { page_args, .. } => {
                Some(page_args)
            }
            Commands::Init => None,
        }
    }
}

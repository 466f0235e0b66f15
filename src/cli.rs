//! CLI definitions for menugrab.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// menugrab CLI.
#[derive(Parser)]
#[command(name = "menugrab")]
#[command(about = "Structured menu extraction from virtualized storefront pages")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Extract a store's full menu as JSON
    Extract {
        /// Store page URL
        url: String,

        /// Connect to an existing browser instead of provisioning a sandbox
        #[arg(long)]
        cdp_url: Option<String>,

        /// Write the menu to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sandbox API key (overrides the config file)
        #[arg(long, env = "MENUGRAB_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
}

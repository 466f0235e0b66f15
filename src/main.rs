//! menugrab - Structured menu extraction from virtualized storefront pages.
//!
//! Main entry point for the menugrab CLI.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use menugrab_cdp::CdpClient;
use menugrab_config::Config;
use menugrab_extractor::{CdpStorePage, MenuRecord, extract_menu};
use menugrab_sandbox::{SandboxClient, SandboxInstance};

mod cli;

use cli::{Cli, Commands};

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("menugrab=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    match cli.command {
        Commands::Extract {
            url,
            cdp_url,
            output,
            api_key,
        } => run_extract(config, url, cdp_url, output, api_key).await,
    }
}

/// Run one extraction end to end: acquire a browser, extract, release.
async fn run_extract(
    config: Config,
    url: String,
    cdp_url: Option<String>,
    output: Option<PathBuf>,
    api_key: Option<String>,
) -> anyhow::Result<()> {
    let (endpoint, sandbox) = match cdp_url {
        Some(endpoint) => (endpoint, None),
        None => {
            let Some(key) = api_key.or(config.sandbox.api_key.clone()) else {
                bail!(
                    "No sandbox API key configured. Set MENUGRAB_API_KEY, pass --api-key, \
                     or use --cdp-url to connect to an existing browser."
                );
            };
            let client = SandboxClient::new(&config.sandbox.base_url, key);
            let instance = client
                .provision()
                .await
                .context("Failed to provision browser sandbox")?;
            match instance.cdp_url().await {
                Ok(endpoint) => (endpoint, Some(instance)),
                Err(e) => {
                    release(&instance).await;
                    return Err(e).context("Failed to resolve sandbox CDP endpoint");
                }
            }
        }
    };

    let result = extract_via(&endpoint, &url, &config).await;

    // The instance is released on every exit path; a leaked browser keeps
    // billing until the sandbox's idle timeout fires.
    if let Some(instance) = &sandbox {
        release(instance).await;
    }

    let menu = result?;
    info!("Extracted {} menu items", menu.len());

    // Keyed output sorted by item name so runs diff cleanly.
    let sorted: BTreeMap<String, MenuRecord> = menu.into_iter().collect();
    let json = serde_json::to_string_pretty(&sorted)?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Menu written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

/// Connect to the browser, run the extraction, and close the page.
async fn extract_via(
    endpoint: &str,
    url: &str,
    config: &Config,
) -> anyhow::Result<std::collections::HashMap<String, MenuRecord>> {
    let client = CdpClient::connect(endpoint)
        .await
        .context("Failed to connect to browser")?;
    let page = CdpStorePage::new(client.new_page(None).await?);
    let target_id = page.target_id().to_string();

    let result = extract_menu(&page, url, &config.extract)
        .await
        .context("Menu extraction failed");

    if let Err(e) = client.close_page(&target_id).await {
        warn!("Failed to close page {}: {}", target_id, e);
    }

    result
}

async fn release(instance: &SandboxInstance) {
    if let Err(e) = instance.release().await {
        error!("Failed to release sandbox instance {}: {}", instance.id(), e);
    }
}

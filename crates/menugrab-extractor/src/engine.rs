//! Top-level extraction run.

use std::collections::HashMap;
use std::time::Duration;

use menugrab_config::ExtractSettings;
use tracing::{info, warn};

use crate::aggregate::Aggregator;
use crate::detail;
use crate::error::ExtractError;
use crate::page::StorePage;
use crate::record::MenuRecord;
use crate::stabilize::stabilize;
use crate::tile::{self, TileError};
use crate::walker::SectionWalker;

/// Extract the full menu from a storefront page.
///
/// Navigates, waits for the network to settle, stabilizes the virtualized
/// list, then walks every section and every tile, opening each item's detail
/// overlay for its option groups. Item-level failures degrade the affected
/// record; navigation and stabilization failures abort the run.
///
/// Re-running against unchanged page content yields an equal map.
pub async fn extract_menu(
    page: &dyn StorePage,
    url: &str,
    settings: &ExtractSettings,
) -> Result<HashMap<String, MenuRecord>, ExtractError> {
    info!(url, "starting menu extraction");

    if let Err(err) = page.navigate(url).await {
        return Err(ExtractError::Navigation {
            url: url.to_string(),
            reason: err.to_string(),
        });
    }

    // The idle wait is best-effort; stabilization below is what actually
    // guarantees the list is fully rendered.
    if let Err(err) = page
        .wait_network_idle(
            Duration::from_millis(settings.network_idle_quiet_ms),
            Duration::from_millis(settings.network_idle_timeout_ms),
        )
        .await
    {
        warn!(error = %err, "network never went idle, continuing");
    }

    stabilize(page, settings).await?;

    let mut walker = SectionWalker::open(page, settings).await?;
    if walker.is_empty() {
        warn!(url, "no menu sections found");
    }

    let mut agg = Aggregator::new();
    while let Some(section) = walker.advance().await? {
        for handle in section.tiles {
            let summary = match tile::read_tile(page, handle).await {
                Ok(summary) => summary,
                Err(TileError::MissingName) => {
                    warn!(section = section.index, "tile without a name, skipping");
                    continue;
                }
                Err(TileError::Unreadable(err)) => {
                    warn!(section = section.index, error = %err, "unreadable tile, skipping");
                    continue;
                }
            };
            let outcome = detail::extract_item(page, handle, summary, settings).await?;
            agg.absorb(section.index, outcome);
        }
    }

    let records = agg.into_records();
    info!(items = records.len(), "menu extraction complete");
    Ok(records)
}

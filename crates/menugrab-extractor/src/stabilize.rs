//! Stabilization poller for virtualized surfaces.

use menugrab_config::ExtractSettings;
use tracing::{debug, trace};

use crate::error::ExtractError;
use crate::page::StorePage;

/// Scroll the surface until its total scrollable extent stops growing.
///
/// Terminates when two consecutive extent measurements are equal, each taken
/// after a settle delay. A surface that keeps growing (infinite content, or a
/// feed masquerading as a menu) trips the round bound and fails with
/// [`ExtractError::StabilizationTimeout`] rather than looping forever.
///
/// On return, no further off-screen content remains unrendered as of the
/// last measurement.
pub async fn stabilize(
    page: &dyn StorePage,
    settings: &ExtractSettings,
) -> Result<(), ExtractError> {
    let mut last_extent = page.scroll_extent().await?;

    for round in 0..settings.max_scroll_rounds {
        page.scroll_by(settings.increment_px).await?;
        tokio::time::sleep(settings.settle_delay()).await;

        let extent = page.scroll_extent().await?;
        trace!(round, extent, last_extent, "stabilization probe");

        if extent == last_extent {
            debug!(rounds = round + 1, extent, "scroll extent stable");
            return Ok(());
        }
        last_extent = extent;
    }

    Err(ExtractError::StabilizationTimeout {
        rounds: settings.max_scroll_rounds,
    })
}

#[cfg(test)]
#[path = "stabilize_tests.rs"]
mod tests;

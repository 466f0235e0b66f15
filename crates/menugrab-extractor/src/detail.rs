//! Detail extractor: open an item's overlay, read its option groups, close
//! it, and fall back to tile-only data when the overlay never materializes.

use menugrab_config::ExtractSettings;
use tracing::{debug, warn};

use crate::page::{NodeHandle, PageError, StorePage};
use crate::record::OptionGroup;
use crate::selectors;
use crate::tile::{self, TileSummary};

/// Outcome of processing one tile.
#[derive(Debug)]
pub enum ItemOutcome {
    /// The overlay opened; option groups were read from it.
    Detailed {
        name: String,
        description: String,
        groups: Vec<OptionGroup>,
    },
    /// The overlay never opened; price comes from the tile instead.
    Fallback {
        name: String,
        description: String,
        price: String,
    },
}

/// Why an overlay failed to open. Always recoverable at the item level.
#[derive(Debug)]
enum PopupFailure {
    NeverAppeared,
    ClickRejected(PageError),
    LookupFailed(PageError),
}

enum PopupProbe {
    Open(NodeHandle),
    Failed(PopupFailure),
}

/// Drive one tile through the open-read-close sequence.
///
/// The page is left overlay-free on every `Ok` return, detailed or fallback.
/// Any failure before the overlay opens takes the fallback branch; only
/// errors after it is open (closing it again) escape as run-fatal.
pub async fn extract_item(
    page: &dyn StorePage,
    tile: NodeHandle,
    summary: TileSummary,
    settings: &ExtractSettings,
) -> Result<ItemOutcome, PageError> {
    match attempt_popup(page, tile, settings).await {
        PopupProbe::Open(popup) => {
            let groups = collect_groups(page, popup, &summary.name).await;
            // Escape must land even when group collection came up empty;
            // a lingering overlay would swallow every later click.
            page.press_key("Escape").await?;
            tokio::time::sleep(settings.settle_delay()).await;
            Ok(ItemOutcome::Detailed {
                name: summary.name,
                description: summary.description,
                groups,
            })
        }
        PopupProbe::Failed(failure) => {
            match &failure {
                PopupFailure::NeverAppeared => {
                    warn!(item = %summary.name, "overlay never appeared, using tile price")
                }
                PopupFailure::ClickRejected(err) => {
                    warn!(item = %summary.name, error = %err, "tile click rejected, using tile price")
                }
                PopupFailure::LookupFailed(err) => {
                    warn!(item = %summary.name, error = %err, "overlay lookup failed, using tile price")
                }
            }
            let price = tile::read_price(page, tile).await;
            Ok(ItemOutcome::Fallback {
                name: summary.name,
                description: summary.description,
                price,
            })
        }
    }
}

/// Click the tile and poll for the overlay within the configured window.
async fn attempt_popup(
    page: &dyn StorePage,
    tile: NodeHandle,
    settings: &ExtractSettings,
) -> PopupProbe {
    if let Err(err) = page.click(tile).await {
        // A rejected click (node detached, occluded) downgrades the item
        // rather than aborting the run.
        return PopupProbe::Failed(PopupFailure::ClickRejected(err));
    }

    let deadline = tokio::time::Instant::now() + settings.popup_wait();
    loop {
        // A lookup error counts as a pre-open failure and downgrades the
        // item, same as a rejected click.
        match page.query_one(selectors::POPUP_ROOT).await {
            Ok(Some(popup)) => return PopupProbe::Open(popup),
            Ok(None) => {}
            Err(err) => return PopupProbe::Failed(PopupFailure::LookupFailed(err)),
        }
        if tokio::time::Instant::now() >= deadline {
            return PopupProbe::Failed(PopupFailure::NeverAppeared);
        }
        tokio::time::sleep(settings.poll_interval()).await;
    }
}

/// Read every option group rendered in the open overlay.
///
/// A group that cannot be read (missing label, detached rows) is skipped
/// with a warning; its siblings still make it into the record.
async fn collect_groups(page: &dyn StorePage, popup: NodeHandle, item: &str) -> Vec<OptionGroup> {
    let containers = match page.query_all_in(popup, selectors::OPTION_GROUP).await {
        Ok(containers) => containers,
        Err(err) => {
            warn!(item, error = %err, "could not enumerate option groups");
            return Vec::new();
        }
    };

    let mut groups = Vec::with_capacity(containers.len());
    for container in containers {
        match read_group(page, container).await {
            Ok(Some(group)) => groups.push(group),
            Ok(None) => warn!(item, "option group without a label, skipping"),
            Err(err) => warn!(item, error = %err, "malformed option group, skipping"),
        }
    }
    debug!(item, groups = groups.len(), "collected option groups");
    groups
}

/// Read one group: label via its `aria-labelledby` target, options as the
/// first text line of each toggle row.
async fn read_group(
    page: &dyn StorePage,
    container: NodeHandle,
) -> Result<Option<OptionGroup>, PageError> {
    let Some(label_id) = page.attribute(container, "aria-labelledby").await? else {
        return Ok(None);
    };
    let Some(label_node) = page.query_one(&selectors::labelled_by(&label_id)).await? else {
        return Ok(None);
    };
    let label = first_line(&page.inner_text(label_node).await?);
    if label.is_empty() {
        return Ok(None);
    }

    let mut options = Vec::new();
    for row in page.query_all_in(container, selectors::OPTION_ROW).await? {
        let text = first_line(&page.inner_text(row).await?);
        if !text.is_empty() {
            options.push(text);
        }
    }

    Ok(Some(OptionGroup { label, options }))
}

/// Rendered rows carry price and calorie lines below the option name; only
/// the first line is the name.
fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or("").trim().to_string()
}

#[cfg(test)]
#[path = "detail_tests.rs"]
mod tests;

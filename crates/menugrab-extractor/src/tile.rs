//! Tile scraper: summary fields that are always present on an item tile.

use crate::page::{NodeHandle, PageError, StorePage};
use crate::selectors;

/// Summary fields read from a tile before any interaction.
#[derive(Debug, Clone)]
pub struct TileSummary {
    pub name: String,
    pub description: String,
}

/// Why a tile could not be scraped.
#[derive(Debug)]
pub enum TileError {
    /// The mandatory name field was absent or empty. The tile is skipped.
    MissingName,
    /// The tile's nodes could not be read at all (usually detached by
    /// virtualization between query and read). The tile is skipped.
    Unreadable(PageError),
}

/// Read `name` and `description` from a tile. No side effects on the page.
pub async fn read_tile(page: &dyn StorePage, tile: NodeHandle) -> Result<TileSummary, TileError> {
    let name = match page
        .query_one_in(tile, selectors::TILE_TITLE)
        .await
        .map_err(TileError::Unreadable)?
    {
        Some(title) => page
            .inner_text(title)
            .await
            .map_err(TileError::Unreadable)?
            .trim()
            .to_string(),
        None => return Err(TileError::MissingName),
    };

    if name.is_empty() {
        return Err(TileError::MissingName);
    }

    let description = match page
        .query_one_in(tile, selectors::TILE_SUBTITLE)
        .await
        .map_err(TileError::Unreadable)?
    {
        Some(subtitle) => page
            .inner_text(subtitle)
            .await
            .map_err(TileError::Unreadable)?
            .trim()
            .to_string(),
        None => String::new(),
    };

    Ok(TileSummary { name, description })
}

/// Read the tile's price in its raw markup form. Optional; used only on the
/// fallback path.
pub async fn read_price(page: &dyn StorePage, tile: NodeHandle) -> String {
    match page.query_one_in(tile, selectors::TILE_PRICE).await {
        Ok(Some(price)) => page.inner_html(price).await.unwrap_or_default(),
        _ => String::new(),
    }
}

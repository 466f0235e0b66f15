//! Section walker for virtualized menus.

use menugrab_config::ExtractSettings;
use tracing::debug;

use crate::page::{NodeHandle, PageError, StorePage};
use crate::selectors;

/// One section brought into the rendered viewport, with its tiles as
/// rendered *after* the settle delay.
pub struct SectionView {
    pub index: usize,
    pub tiles: Vec<NodeHandle>,
}

/// Walks top-level virtualized sections in DOM enumeration order.
///
/// Each section is scrolled into view before its tiles are read, because
/// virtualization unmounts and remounts tiles based on visibility. Tiles are
/// re-queried after the settle delay; handles captured before the scroll
/// would dangle. The walk is finite and not restartable: re-enumerating
/// after the DOM has mutated under scroll may legitimately yield a different
/// tile set.
pub struct SectionWalker<'a> {
    page: &'a dyn StorePage,
    sections: Vec<NodeHandle>,
    next: usize,
    settings: &'a ExtractSettings,
}

impl<'a> SectionWalker<'a> {
    /// Enumerate the sections currently in the document.
    pub async fn open(
        page: &'a dyn StorePage,
        settings: &'a ExtractSettings,
    ) -> Result<SectionWalker<'a>, PageError> {
        let sections = page.query_all(selectors::SECTION).await?;
        debug!(count = sections.len(), "enumerated menu sections");
        Ok(Self {
            page,
            sections,
            next: 0,
            settings,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Bring the next section into view and return its rendered tiles.
    pub async fn advance(&mut self) -> Result<Option<SectionView>, PageError> {
        let Some(&section) = self.sections.get(self.next) else {
            return Ok(None);
        };
        let index = self.next;
        self.next += 1;

        self.page.scroll_into_view(section).await?;
        tokio::time::sleep(self.settings.settle_delay()).await;

        // Re-query after the settle delay; virtualization may have replaced
        // the tile nodes that existed before the scroll.
        let tiles = self.page.query_all_in(section, selectors::ITEM_TILE).await?;
        debug!(section = index, tiles = tiles.len(), "section in view");

        Ok(Some(SectionView { index, tiles }))
    }
}

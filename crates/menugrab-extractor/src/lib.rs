//! Menu extraction engine.
//!
//! Targets one page archetype: a virtualized grid of collapsible sections
//! containing clickable item tiles, where each tile opens a detail overlay
//! exposing option lists. The engine drives a remote page through the
//! [`StorePage`] transport interface, one operation in flight at a time, and
//! folds every item into a single keyed collection of [`MenuRecord`]s.
//!
//! The run is structured as: stabilize the virtualized list (scroll until the
//! scrollable extent stops growing), walk sections in DOM order, read each
//! tile's summary fields, open its detail overlay for option groups (falling
//! back to tile-only data plus price when the overlay does not open), and
//! aggregate the outcomes.

mod aggregate;
mod cdp_page;
mod detail;
mod engine;
mod error;
mod page;
mod record;
mod selectors;
mod stabilize;
mod tile;
mod walker;

pub use cdp_page::CdpStorePage;
pub use menugrab_config::ExtractSettings;
pub use engine::extract_menu;
pub use error::ExtractError;
pub use page::{NodeHandle, PageError, StorePage};
pub use record::{MenuRecord, OptionGroup};

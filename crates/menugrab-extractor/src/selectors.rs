//! Selector contract for the storefront page archetype.
//!
//! Attribute-based locators only; class-name suffixes on these sites are
//! build hashes and churn between deploys, so the one class-prefix locator
//! uses a `^=` match.

/// Top-level virtualized section container.
pub const SECTION: &str = r#"[data-testid="VirtualGridContainer"]"#;

/// Item tile within a section.
pub const ITEM_TILE: &str = r#"[data-anchor-id="MenuItem"]"#;

/// Item name on a tile. Mandatory.
pub const TILE_TITLE: &str = r#"[data-telemetry-id="storeMenuItem.title"]"#;

/// Item description on a tile. Optional.
pub const TILE_SUBTITLE: &str = r#"[data-telemetry-id="storeMenuItem.subtitle"]"#;

/// Price on a tile, read only on the fallback path.
pub const TILE_PRICE: &str = r#"[data-anchor-id="StoreMenuItemPrice"]"#;

/// Root of the item detail overlay.
pub const POPUP_ROOT: &str = r#"[data-testid="itemBody"]"#;

/// Option-group container inside the overlay, located by its
/// accessibility-labelling attribute.
pub const OPTION_GROUP: &str = r#"[aria-labelledby^="optionList_"]"#;

/// One selectable option row inside a group.
pub const OPTION_ROW: &str = r#"[class^="styles__ToggleContainer"]"#;

/// Selector for the element an `aria-labelledby` attribute points at.
pub fn labelled_by(id: &str) -> String {
    format!(r#"[id="{}"]"#, id)
}

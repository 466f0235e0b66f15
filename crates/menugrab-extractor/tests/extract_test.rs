//! End-to-end engine tests against an in-memory storefront.
//!
//! `FakeStorefront` models the page archetype the engine targets: sections
//! whose tiles only render once the section has been scrolled into view, a
//! scrollable extent that grows as the page is scrolled, and a single modal
//! overlay that must be dismissed before the next tile can open one.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use menugrab_extractor::{
    ExtractError, ExtractSettings, NodeHandle, PageError, StorePage, extract_menu,
};

const SECTION: &str = r#"[data-testid="VirtualGridContainer"]"#;
const ITEM_TILE: &str = r#"[data-anchor-id="MenuItem"]"#;
const TILE_TITLE: &str = r#"[data-telemetry-id="storeMenuItem.title"]"#;
const TILE_SUBTITLE: &str = r#"[data-telemetry-id="storeMenuItem.subtitle"]"#;
const TILE_PRICE: &str = r#"[data-anchor-id="StoreMenuItemPrice"]"#;
const POPUP_ROOT: &str = r#"[data-testid="itemBody"]"#;
const OPTION_GROUP: &str = r#"[aria-labelledby^="optionList_"]"#;
const OPTION_ROW: &str = r#"[class^="styles__ToggleContainer"]"#;

#[derive(Clone)]
struct FakeGroup {
    label: String,
    options: Vec<String>,
    /// Row queries on a poisoned group fail, as they do when the node
    /// detaches mid-read on a live page.
    poisoned: bool,
}

fn group(label: &str, options: &[&str]) -> FakeGroup {
    FakeGroup {
        label: label.to_string(),
        options: options.iter().map(|s| s.to_string()).collect(),
        poisoned: false,
    }
}

fn poisoned_group(label: &str) -> FakeGroup {
    FakeGroup {
        label: label.to_string(),
        options: Vec::new(),
        poisoned: true,
    }
}

#[derive(Clone)]
struct FakeTile {
    name: Option<String>,
    description: String,
    price: String,
    /// `None` means clicking the tile never produces an overlay.
    overlay: Option<Vec<FakeGroup>>,
}

fn tile(name: &str, description: &str) -> FakeTile {
    FakeTile {
        name: Some(name.to_string()),
        description: description.to_string(),
        price: String::new(),
        overlay: None,
    }
}

impl FakeTile {
    fn priced(mut self, price: &str) -> Self {
        self.price = price.to_string();
        self
    }

    fn with_overlay(mut self, groups: Vec<FakeGroup>) -> Self {
        self.overlay = Some(groups);
        self
    }

    fn nameless(mut self) -> Self {
        self.name = None;
        self
    }
}

struct State {
    extent: f64,
    revealed: HashSet<usize>,
    /// (section, tile) of the currently open overlay.
    popup: Option<(usize, usize)>,
}

struct FakeStorefront {
    sections: Vec<Vec<FakeTile>>,
    target_extent: f64,
    state: Mutex<State>,
}

// Node id layout. One popup at a time, so group and row ids only need to be
// unique within the open overlay.
const POPUP_ID: i64 = 5;
const SECTION_BASE: i64 = 1_000;
const TILE_BASE: i64 = 10_000;
const GROUP_BASE: i64 = 20_000;
const LABEL_BASE: i64 = 30_000;
const ROW_BASE: i64 = 40_000;

impl FakeStorefront {
    fn new(sections: Vec<Vec<FakeTile>>) -> Self {
        Self {
            sections,
            target_extent: 3_000.0,
            state: Mutex::new(State {
                extent: 1_000.0,
                revealed: HashSet::new(),
                popup: None,
            }),
        }
    }

    fn section_ix(&self, node: NodeHandle) -> Option<usize> {
        if !(SECTION_BASE..TILE_BASE).contains(&node.0) {
            return None;
        }
        let ix = (node.0 - SECTION_BASE) as usize;
        (ix < self.sections.len()).then_some(ix)
    }

    fn tile_ix(&self, node: NodeHandle) -> Option<(usize, usize)> {
        if !(TILE_BASE..GROUP_BASE).contains(&node.0) {
            return None;
        }
        let offset = (node.0 - TILE_BASE) as usize;
        let (s, t) = (offset / 100, offset % 100);
        (s < self.sections.len() && t < self.sections[s].len()).then_some((s, t))
    }

    fn tile_at(&self, s: usize, t: usize) -> &FakeTile {
        &self.sections[s][t]
    }

    /// Groups of the tile whose overlay is currently open.
    fn open_groups(&self) -> Option<&[FakeGroup]> {
        let (s, t) = self.state.lock().unwrap().popup?;
        self.tile_at(s, t).overlay.as_deref()
    }
}

#[async_trait]
impl StorePage for FakeStorefront {
    async fn navigate(&self, url: &str) -> Result<(), PageError> {
        if url.contains("unreachable") {
            return Err(PageError::Navigation("net::ERR_NAME_NOT_RESOLVED".into()));
        }
        Ok(())
    }

    async fn wait_network_idle(&self, _: Duration, _: Duration) -> Result<(), PageError> {
        Ok(())
    }

    async fn scroll_by(&self, _delta_y: f64) -> Result<(), PageError> {
        let mut state = self.state.lock().unwrap();
        state.extent = (state.extent + 1_000.0).min(self.target_extent);
        Ok(())
    }

    async fn scroll_extent(&self) -> Result<f64, PageError> {
        Ok(self.state.lock().unwrap().extent)
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<NodeHandle>, PageError> {
        if selector == SECTION {
            return Ok((0..self.sections.len())
                .map(|s| NodeHandle(SECTION_BASE + s as i64))
                .collect());
        }
        Ok(Vec::new())
    }

    async fn query_one(&self, selector: &str) -> Result<Option<NodeHandle>, PageError> {
        if selector == POPUP_ROOT {
            let open = self.state.lock().unwrap().popup.is_some();
            return Ok(open.then_some(NodeHandle(POPUP_ID)));
        }
        // Label elements are addressed by the id their group points at.
        if let Some(rest) = selector.strip_prefix(r#"[id="optionList_"#) {
            let g: usize = rest
                .strip_suffix(r#""]"#)
                .and_then(|n| n.parse().ok())
                .ok_or_else(|| PageError::Transport(format!("bad selector: {selector}")))?;
            let exists = self.open_groups().is_some_and(|groups| g < groups.len());
            return Ok(exists.then_some(NodeHandle(LABEL_BASE + g as i64)));
        }
        Ok(None)
    }

    async fn query_all_in(
        &self,
        node: NodeHandle,
        selector: &str,
    ) -> Result<Vec<NodeHandle>, PageError> {
        if selector == ITEM_TILE {
            if let Some(s) = self.section_ix(node) {
                // Virtualization: tiles exist only after the section has been
                // scrolled into view.
                if !self.state.lock().unwrap().revealed.contains(&s) {
                    return Ok(Vec::new());
                }
                return Ok((0..self.sections[s].len())
                    .map(|t| NodeHandle(TILE_BASE + (s * 100 + t) as i64))
                    .collect());
            }
        }
        if node.0 == POPUP_ID && selector == OPTION_GROUP {
            let count = self.open_groups().map_or(0, |groups| groups.len());
            return Ok((0..count).map(|g| NodeHandle(GROUP_BASE + g as i64)).collect());
        }
        if selector == OPTION_ROW && (GROUP_BASE..LABEL_BASE).contains(&node.0) {
            let g = (node.0 - GROUP_BASE) as usize;
            let Some(groups) = self.open_groups() else {
                return Ok(Vec::new());
            };
            let group = &groups[g];
            if group.poisoned {
                return Err(PageError::Transport("node detached during read".into()));
            }
            return Ok((0..group.options.len())
                .map(|o| NodeHandle(ROW_BASE + (g * 100 + o) as i64))
                .collect());
        }
        Ok(Vec::new())
    }

    async fn query_one_in(
        &self,
        node: NodeHandle,
        selector: &str,
    ) -> Result<Option<NodeHandle>, PageError> {
        let Some((s, t)) = self.tile_ix(node) else {
            return Ok(None);
        };
        let tile = self.tile_at(s, t);
        let child = match selector {
            TILE_TITLE if tile.name.is_some() => Some(node.0 * 10 + 1),
            TILE_SUBTITLE => Some(node.0 * 10 + 2),
            TILE_PRICE if !tile.price.is_empty() => Some(node.0 * 10 + 3),
            _ => None,
        };
        Ok(child.map(NodeHandle))
    }

    async fn scroll_into_view(&self, node: NodeHandle) -> Result<(), PageError> {
        if let Some(s) = self.section_ix(node) {
            self.state.lock().unwrap().revealed.insert(s);
        }
        Ok(())
    }

    async fn inner_text(&self, node: NodeHandle) -> Result<String, PageError> {
        if (LABEL_BASE..ROW_BASE).contains(&node.0) {
            let g = (node.0 - LABEL_BASE) as usize;
            let groups = self
                .open_groups()
                .ok_or_else(|| PageError::Transport("no overlay open".into()))?;
            return Ok(format!("{}\nRequired", groups[g].label));
        }
        if (ROW_BASE..ROW_BASE + 10_000).contains(&node.0) {
            let offset = (node.0 - ROW_BASE) as usize;
            let (g, o) = (offset / 100, offset % 100);
            let groups = self
                .open_groups()
                .ok_or_else(|| PageError::Transport("no overlay open".into()))?;
            return Ok(format!("{}\n+$0.00\n120 cal", groups[g].options[o]));
        }
        let tile_node = NodeHandle(node.0 / 10);
        if let Some((s, t)) = self.tile_ix(tile_node) {
            let tile = self.tile_at(s, t);
            return match node.0 % 10 {
                1 => Ok(tile.name.clone().unwrap_or_default()),
                2 => Ok(tile.description.clone()),
                _ => Err(PageError::Transport("unknown child node".into())),
            };
        }
        Err(PageError::Transport(format!("unknown node {}", node.0)))
    }

    async fn inner_html(&self, node: NodeHandle) -> Result<String, PageError> {
        let tile_node = NodeHandle(node.0 / 10);
        if node.0 % 10 == 3 {
            if let Some((s, t)) = self.tile_ix(tile_node) {
                return Ok(self.tile_at(s, t).price.clone());
            }
        }
        Err(PageError::Transport(format!("unknown node {}", node.0)))
    }

    async fn attribute(&self, node: NodeHandle, name: &str) -> Result<Option<String>, PageError> {
        if name == "aria-labelledby" && (GROUP_BASE..LABEL_BASE).contains(&node.0) {
            let g = node.0 - GROUP_BASE;
            return Ok(Some(format!("optionList_{g}")));
        }
        Ok(None)
    }

    async fn click(&self, node: NodeHandle) -> Result<(), PageError> {
        let Some((s, t)) = self.tile_ix(node) else {
            return Ok(());
        };
        let mut state = self.state.lock().unwrap();
        // A modal overlay swallows clicks behind it; if a previous overlay
        // was never dismissed, this tile's overlay will not open.
        if state.popup.is_none() && self.tile_at(s, t).overlay.is_some() {
            state.popup = Some((s, t));
        }
        Ok(())
    }

    async fn press_key(&self, key: &str) -> Result<(), PageError> {
        if key == "Escape" {
            self.state.lock().unwrap().popup = None;
        }
        Ok(())
    }
}

fn fast_settings() -> ExtractSettings {
    ExtractSettings {
        settle_delay_ms: 0,
        popup_wait_ms: 10,
        poll_interval_ms: 1,
        ..ExtractSettings::default()
    }
}

const STORE_URL: &str = "https://food.example/store/panda-palace";

#[tokio::test]
async fn two_section_store_mixes_detail_and_fallback_records() {
    let store = FakeStorefront::new(vec![
        vec![
            tile("Orange Chicken", "Entrée")
                .with_overlay(vec![group("Size", &["Small", "Medium", "Large"])]),
        ],
        vec![tile("Soda", "").priced("$2.50")],
    ]);

    let menu = extract_menu(&store, STORE_URL, &fast_settings()).await.unwrap();

    assert_eq!(menu.len(), 2);

    let chicken = &menu["Orange Chicken"];
    assert_eq!(chicken.description, "Entrée");
    assert!(chicken.price.is_empty());
    let groups = chicken.option_groups.as_ref().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].label, "Size");
    assert_eq!(groups[0].options, vec!["Small", "Medium", "Large"]);

    let soda = &menu["Soda"];
    assert_eq!(soda.description, "");
    assert_eq!(soda.price, "$2.50");
    assert!(soda.option_groups.is_none());
}

#[tokio::test]
async fn every_item_across_virtualized_sections_is_captured() {
    let store = FakeStorefront::new(vec![
        vec![tile("A1", ""), tile("A2", "")],
        vec![tile("B1", ""), tile("B2", ""), tile("B3", "")],
        vec![tile("C1", ""), tile("C2", "")],
    ]);

    let menu = extract_menu(&store, STORE_URL, &fast_settings()).await.unwrap();

    let names: HashSet<&str> = menu.keys().map(String::as_str).collect();
    let expected: HashSet<&str> = ["A1", "A2", "B1", "B2", "B3", "C1", "C2"].into();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn group_and_option_order_follow_the_overlay() {
    let store = FakeStorefront::new(vec![vec![tile("Wings", "").with_overlay(vec![
        group("Size", &["6 pc", "12 pc", "24 pc"]),
        group("Add-ons", &["Ranch", "Blue Cheese", "Celery"]),
    ])]]);

    let menu = extract_menu(&store, STORE_URL, &fast_settings()).await.unwrap();

    let groups = menu["Wings"].option_groups.as_ref().unwrap();
    let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["Size", "Add-ons"]);
    assert_eq!(groups[0].options, vec!["6 pc", "12 pc", "24 pc"]);
    assert_eq!(groups[1].options, vec!["Ranch", "Blue Cheese", "Celery"]);
}

#[tokio::test]
async fn malformed_group_does_not_take_down_its_siblings() {
    let store = FakeStorefront::new(vec![vec![tile("Combo", "").with_overlay(vec![
        group("Size", &["Small", "Large"]),
        poisoned_group("Extras"),
        group("Drink", &["Coke", "Sprite"]),
    ])]]);

    let menu = extract_menu(&store, STORE_URL, &fast_settings()).await.unwrap();

    let groups = menu["Combo"].option_groups.as_ref().unwrap();
    let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["Size", "Drink"]);
}

#[tokio::test]
async fn duplicate_names_keep_the_later_occurrence() {
    let store = FakeStorefront::new(vec![
        vec![tile("Fried Rice", "").priced("$5")],
        vec![tile("Fried Rice", "").priced("$6")],
    ]);

    let menu = extract_menu(&store, STORE_URL, &fast_settings()).await.unwrap();

    assert_eq!(menu.len(), 1);
    assert_eq!(menu["Fried Rice"].price, "$6");
}

#[tokio::test]
async fn rescrape_of_an_unchanged_page_is_identical() {
    let store = FakeStorefront::new(vec![
        vec![tile("Orange Chicken", "Entrée")
            .with_overlay(vec![group("Size", &["Small", "Large"])])],
        vec![tile("Soda", "").priced("$2.50")],
    ]);

    let first = extract_menu(&store, STORE_URL, &fast_settings()).await.unwrap();
    let second = extract_menu(&store, STORE_URL, &fast_settings()).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn nameless_tiles_are_skipped() {
    let store = FakeStorefront::new(vec![vec![
        tile("Egg Roll", "").priced("$1.50"),
        tile("", "").nameless(),
    ]]);

    let menu = extract_menu(&store, STORE_URL, &fast_settings()).await.unwrap();

    assert_eq!(menu.len(), 1);
    assert!(menu.contains_key("Egg Roll"));
}

#[tokio::test]
async fn unreachable_store_fails_with_a_navigation_error() {
    let store = FakeStorefront::new(vec![]);

    let err = extract_menu(&store, "https://unreachable.example/", &fast_settings())
        .await
        .unwrap_err();

    match err {
        ExtractError::Navigation { url, .. } => {
            assert_eq!(url, "https://unreachable.example/");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

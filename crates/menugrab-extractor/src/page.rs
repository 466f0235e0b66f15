//! The transport interface the engine drives.
//!
//! Everything the extractor knows about a live page goes through this trait,
//! which keeps the engine testable against an in-memory page and keeps all
//! browser specifics in one adapter.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Opaque handle to a DOM node.
///
/// Handles are only valid until the next scroll or overlay transition;
/// virtualization may detach and recreate the node behind them. Callers
/// re-query rather than caching handles across such boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(pub i64);

/// Page transport errors.
#[derive(Debug, Error)]
pub enum PageError {
    /// The page never reached a loadable state.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// A bounded wait expired.
    #[error("wait timed out: {0}")]
    Timeout(String),

    /// Anything else from the underlying transport.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// One storefront page, driven one operation at a time.
///
/// Implementations must not be used concurrently: scroll position and overlay
/// state are shared mutable page state, and the engine relies on issuing
/// exactly one operation per suspension point.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorePage: Send + Sync {
    /// Navigate to the URL and wait for the document to load.
    async fn navigate(&self, url: &str) -> Result<(), PageError>;

    /// Wait until the page stops fetching resources, bounded by `timeout`.
    async fn wait_network_idle(&self, quiet: Duration, timeout: Duration) -> Result<(), PageError>;

    /// Scroll the main surface down by `delta_y` pixels.
    async fn scroll_by(&self, delta_y: f64) -> Result<(), PageError>;

    /// Total scrollable extent of the main surface.
    async fn scroll_extent(&self) -> Result<f64, PageError>;

    /// All nodes matching `selector`, in DOM order.
    async fn query_all(&self, selector: &str) -> Result<Vec<NodeHandle>, PageError>;

    /// First node matching `selector`, if any.
    async fn query_one(&self, selector: &str) -> Result<Option<NodeHandle>, PageError>;

    /// All nodes matching `selector` under `node`, in DOM order.
    async fn query_all_in(
        &self,
        node: NodeHandle,
        selector: &str,
    ) -> Result<Vec<NodeHandle>, PageError>;

    /// First node matching `selector` under `node`, if any.
    async fn query_one_in(
        &self,
        node: NodeHandle,
        selector: &str,
    ) -> Result<Option<NodeHandle>, PageError>;

    /// Bring a node into the rendered viewport.
    async fn scroll_into_view(&self, node: NodeHandle) -> Result<(), PageError>;

    /// Rendered text of a node.
    async fn inner_text(&self, node: NodeHandle) -> Result<String, PageError>;

    /// Markup content of a node.
    async fn inner_html(&self, node: NodeHandle) -> Result<String, PageError>;

    /// Attribute value of a node.
    async fn attribute(&self, node: NodeHandle, name: &str) -> Result<Option<String>, PageError>;

    /// Click the node.
    async fn click(&self, node: NodeHandle) -> Result<(), PageError>;

    /// Dispatch a key press to the page (e.g. "Escape").
    async fn press_key(&self, key: &str) -> Result<(), PageError>;
}

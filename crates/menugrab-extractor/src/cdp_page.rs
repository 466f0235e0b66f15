//! CDP-backed implementation of [`StorePage`].

use std::time::Duration;

use async_trait::async_trait;
use menugrab_cdp::{CdpError, PageSession};

use crate::page::{NodeHandle, PageError, StorePage};

/// Adapter from a CDP page session to the engine's transport interface.
pub struct CdpStorePage {
    session: PageSession,
}

impl CdpStorePage {
    pub fn new(session: PageSession) -> Self {
        Self { session }
    }

    /// Target ID of the underlying page, for closing it after the run.
    pub fn target_id(&self) -> &str {
        self.session.target_id()
    }
}

fn map_err(e: CdpError) -> PageError {
    match e {
        CdpError::NavigationFailed(msg) => PageError::Navigation(msg),
        CdpError::Timeout(msg) => PageError::Timeout(msg),
        other => PageError::Transport(other.to_string()),
    }
}

#[async_trait]
impl StorePage for CdpStorePage {
    async fn navigate(&self, url: &str) -> Result<(), PageError> {
        self.session.navigate(url).await.map_err(|e| match e {
            // Load-wait expiry means the page never became loadable
            CdpError::Timeout(msg) => PageError::Navigation(msg),
            other => map_err(other),
        })?;
        Ok(())
    }

    async fn wait_network_idle(&self, quiet: Duration, timeout: Duration) -> Result<(), PageError> {
        self.session
            .wait_network_idle(quiet.as_millis() as u64, timeout.as_millis() as u64)
            .await
            .map_err(map_err)
    }

    async fn scroll_by(&self, delta_y: f64) -> Result<(), PageError> {
        self.session.scroll_by(delta_y).await.map_err(map_err)
    }

    async fn scroll_extent(&self) -> Result<f64, PageError> {
        self.session.scroll_extent().await.map_err(map_err)
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<NodeHandle>, PageError> {
        let ids = self
            .session
            .query_selector_all(selector)
            .await
            .map_err(map_err)?;
        Ok(ids.into_iter().map(NodeHandle).collect())
    }

    async fn query_one(&self, selector: &str) -> Result<Option<NodeHandle>, PageError> {
        let id = self.session.query_selector(selector).await.map_err(map_err)?;
        Ok(id.map(NodeHandle))
    }

    async fn query_all_in(
        &self,
        node: NodeHandle,
        selector: &str,
    ) -> Result<Vec<NodeHandle>, PageError> {
        let ids = self
            .session
            .query_selector_all_within(node.0, selector)
            .await
            .map_err(map_err)?;
        Ok(ids.into_iter().map(NodeHandle).collect())
    }

    async fn query_one_in(
        &self,
        node: NodeHandle,
        selector: &str,
    ) -> Result<Option<NodeHandle>, PageError> {
        let id = self
            .session
            .query_selector_within(node.0, selector)
            .await
            .map_err(map_err)?;
        Ok(id.map(NodeHandle))
    }

    async fn scroll_into_view(&self, node: NodeHandle) -> Result<(), PageError> {
        self.session.scroll_into_view(node.0).await.map_err(map_err)
    }

    async fn inner_text(&self, node: NodeHandle) -> Result<String, PageError> {
        self.session.inner_text(node.0).await.map_err(map_err)
    }

    async fn inner_html(&self, node: NodeHandle) -> Result<String, PageError> {
        self.session.inner_html(node.0).await.map_err(map_err)
    }

    async fn attribute(&self, node: NodeHandle, name: &str) -> Result<Option<String>, PageError> {
        self.session.attribute(node.0, name).await.map_err(map_err)
    }

    async fn click(&self, node: NodeHandle) -> Result<(), PageError> {
        self.session.click_node(node.0).await.map_err(map_err)
    }

    async fn press_key(&self, key: &str) -> Result<(), PageError> {
        self.session.press_key(key).await.map_err(map_err)
    }
}

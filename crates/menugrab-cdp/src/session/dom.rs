//! DOM operations for a CDP page session.

use serde_json::json;

use crate::error::CdpError;
use crate::protocol::{BoxModel, RemoteObject};

use super::core::PageSession;

impl PageSession {
    /// Get document root node ID.
    pub async fn document_node(&self) -> Result<i64, CdpError> {
        let result = self
            .call("DOM.getDocument", Some(json!({"depth": 0})))
            .await?;

        result["root"]["nodeId"]
            .as_i64()
            .ok_or_else(|| CdpError::InvalidResponse("Missing document node".to_string()))
    }

    /// Query selector against the document.
    pub async fn query_selector(&self, selector: &str) -> Result<Option<i64>, CdpError> {
        let doc = self.document_node().await?;
        self.query_selector_within(doc, selector).await
    }

    /// Query selector all against the document.
    pub async fn query_selector_all(&self, selector: &str) -> Result<Vec<i64>, CdpError> {
        let doc = self.document_node().await?;
        self.query_selector_all_within(doc, selector).await
    }

    /// Query selector scoped to a node.
    ///
    /// Virtualized lists detach and recreate nodes under scroll; callers must
    /// re-query instead of holding on to node IDs across scrolls.
    pub async fn query_selector_within(
        &self,
        node_id: i64,
        selector: &str,
    ) -> Result<Option<i64>, CdpError> {
        let result = self
            .call(
                "DOM.querySelector",
                Some(json!({
                    "nodeId": node_id,
                    "selector": selector,
                })),
            )
            .await?;

        let found = result["nodeId"].as_i64().unwrap_or(0);
        if found == 0 { Ok(None) } else { Ok(Some(found)) }
    }

    /// Query selector all scoped to a node.
    pub async fn query_selector_all_within(
        &self,
        node_id: i64,
        selector: &str,
    ) -> Result<Vec<i64>, CdpError> {
        let result = self
            .call(
                "DOM.querySelectorAll",
                Some(json!({
                    "nodeId": node_id,
                    "selector": selector,
                })),
            )
            .await?;

        let node_ids: Vec<i64> = result["nodeIds"]
            .as_array()
            .map(|arr| arr.iter().filter_map(|v| v.as_i64()).collect())
            .unwrap_or_default();

        Ok(node_ids)
    }

    /// Get box model for node.
    pub async fn get_box_model(&self, node_id: i64) -> Result<Option<BoxModel>, CdpError> {
        let result = self
            .call("DOM.getBoxModel", Some(json!({"nodeId": node_id})))
            .await;

        match result {
            Ok(r) => {
                let model: BoxModel = serde_json::from_value(r["model"].clone())?;
                Ok(Some(model))
            }
            Err(CdpError::Protocol { code: -32000, .. }) => {
                // Node not visible or doesn't have layout
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve node to runtime object.
    pub async fn resolve_node(&self, node_id: i64) -> Result<RemoteObject, CdpError> {
        let result = self
            .call("DOM.resolveNode", Some(json!({"nodeId": node_id})))
            .await?;

        let obj: RemoteObject = serde_json::from_value(result["object"].clone())?;
        Ok(obj)
    }

    /// Scroll a node into the rendered viewport.
    pub async fn scroll_into_view(&self, node_id: i64) -> Result<(), CdpError> {
        let result = self
            .call(
                "DOM.scrollIntoViewIfNeeded",
                Some(json!({"nodeId": node_id})),
            )
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(CdpError::Protocol { code: -32000, .. }) => {
                // Older browsers lack the command; fall back to the DOM API
                let obj = self.resolve_node(node_id).await?;
                let object_id = obj
                    .object_id
                    .ok_or_else(|| CdpError::InvalidResponse("Missing objectId".to_string()))?;
                self.call_function_on(
                    &object_id,
                    "function() { this.scrollIntoView({block: 'center'}); }",
                    None,
                )
                .await?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Get node attributes as name/value pairs.
    pub async fn get_attributes(&self, node_id: i64) -> Result<Vec<String>, CdpError> {
        let result = self
            .call("DOM.getAttributes", Some(json!({"nodeId": node_id})))
            .await?;

        let attrs: Vec<String> = result["attributes"]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(attrs)
    }

    /// Read a single attribute value.
    pub async fn attribute(&self, node_id: i64, name: &str) -> Result<Option<String>, CdpError> {
        let pairs = self.get_attributes(node_id).await?;
        Ok(Self::attr_from_pairs(&pairs, name))
    }

    /// Rendered text of a node.
    pub async fn inner_text(&self, node_id: i64) -> Result<String, CdpError> {
        let obj = self.resolve_node(node_id).await?;
        let object_id = obj
            .object_id
            .ok_or_else(|| CdpError::InvalidResponse("Missing objectId".to_string()))?;

        let value = self
            .call_function_on(&object_id, "function() { return this.innerText; }", None)
            .await?;
        Ok(value.as_str().unwrap_or("").to_string())
    }

    /// Markup content of a node.
    pub async fn inner_html(&self, node_id: i64) -> Result<String, CdpError> {
        let obj = self.resolve_node(node_id).await?;
        let object_id = obj
            .object_id
            .ok_or_else(|| CdpError::InvalidResponse("Missing objectId".to_string()))?;

        let value = self
            .call_function_on(&object_id, "function() { return this.innerHTML; }", None)
            .await?;
        Ok(value.as_str().unwrap_or("").to_string())
    }

    /// Click the center of a node.
    pub async fn click_node(&self, node_id: i64) -> Result<(), CdpError> {
        let box_model = self
            .get_box_model(node_id)
            .await?
            .ok_or_else(|| CdpError::ElementNotFound(format!("node {} (not visible)", node_id)))?;

        let (x, y) = Self::quad_center(&box_model.content);
        self.click(x, y).await
    }

    /// Calculate center point of a quad.
    pub(super) fn quad_center(quad: &[f64]) -> (f64, f64) {
        if quad.len() >= 8 {
            let x = (quad[0] + quad[2] + quad[4] + quad[6]) / 4.0;
            let y = (quad[1] + quad[3] + quad[5] + quad[7]) / 4.0;
            (x, y)
        } else {
            (0.0, 0.0)
        }
    }

    /// Find an attribute value in a CDP name/value pair list.
    pub(super) fn attr_from_pairs(pairs: &[String], name: &str) -> Option<String> {
        pairs
            .chunks_exact(2)
            .find(|pair| pair[0] == name)
            .map(|pair| pair[1].clone())
    }
}

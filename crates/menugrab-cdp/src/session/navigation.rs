//! Navigation, waits, and viewport motion for a CDP page session.

use serde_json::json;
use tracing::debug;

use crate::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Navigate to URL and wait for the page to load.
    pub async fn navigate(&self, url: &str) -> Result<String, CdpError> {
        let result = self
            .call("Page.navigate", Some(json!({"url": url})))
            .await?;

        if let Some(error) = result.get("errorText") {
            return Err(CdpError::NavigationFailed(
                error.as_str().unwrap_or("Unknown error").to_string(),
            ));
        }

        let frame_id = result["frameId"].as_str().unwrap_or("main").to_string();

        self.wait_for_load().await?;

        debug!("Navigated to {}", url);
        Ok(frame_id)
    }

    /// Wait for page load.
    pub async fn wait_for_load(&self) -> Result<(), CdpError> {
        let start = std::time::Instant::now();
        let timeout = std::time::Duration::from_secs(30);

        loop {
            let result = self.evaluate("document.readyState").await?;

            if let Some(state) = result.as_str() {
                if state == "complete" || state == "interactive" {
                    return Ok(());
                }
            }

            if start.elapsed() > timeout {
                return Err(CdpError::Timeout("Page load timeout".to_string()));
            }

            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }
    }

    /// Wait until the page stops fetching resources.
    ///
    /// Polls the resource-timing entry count until it is unchanged for
    /// `quiet_ms`. A page that keeps polling analytics forever trips the
    /// `timeout_ms` bound instead of hanging the run.
    pub async fn wait_network_idle(&self, quiet_ms: u64, timeout_ms: u64) -> Result<(), CdpError> {
        let start = std::time::Instant::now();
        let timeout = std::time::Duration::from_millis(timeout_ms);
        let quiet = std::time::Duration::from_millis(quiet_ms);

        let mut last_count = -1i64;
        let mut quiet_since = std::time::Instant::now();

        loop {
            let count = self
                .evaluate("performance.getEntriesByType('resource').length")
                .await?
                .as_i64()
                .unwrap_or(0);

            if count == last_count {
                if quiet_since.elapsed() >= quiet {
                    debug!("Network idle after {} resources", count);
                    return Ok(());
                }
            } else {
                last_count = count;
                quiet_since = std::time::Instant::now();
            }

            if start.elapsed() > timeout {
                return Err(CdpError::Timeout(format!(
                    "Network idle not reached within {}ms",
                    timeout_ms
                )));
            }

            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }
    }

    /// Scroll the main surface by a vertical delta.
    pub async fn scroll_by(&self, delta_y: f64) -> Result<(), CdpError> {
        self.evaluate(&format!("window.scrollBy(0, {})", delta_y))
            .await?;
        Ok(())
    }

    /// Total scrollable extent of the main surface.
    pub async fn scroll_extent(&self) -> Result<f64, CdpError> {
        let result = self
            .evaluate(
                "Math.max(document.body.scrollHeight, document.documentElement.scrollHeight)",
            )
            .await?;
        result
            .as_f64()
            .ok_or_else(|| CdpError::InvalidResponse("Non-numeric scroll extent".to_string()))
    }
}

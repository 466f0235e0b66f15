//! Remote browser sandbox provisioning.
//!
//! The extraction run never launches a browser itself; it borrows one from a
//! sandbox service. This crate covers the three operations the core needs:
//! allocate an instance, ask it for its CDP endpoint, and release it.
//! Release is idempotent and must be invoked on every exit path.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Sandbox API errors.
#[derive(Debug, Error)]
pub enum SandboxError {
    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API rejected the request (bad credential, quota, unknown instance).
    #[error("Sandbox API error: {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("Invalid sandbox response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Deserialize)]
struct StartResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CdpUrlResponse {
    cdp_url: String,
}

/// Client for the browser-sandbox HTTP API.
pub struct SandboxClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SandboxClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Allocate a remote browser instance.
    pub async fn provision(&self) -> Result<SandboxInstance, SandboxError> {
        let url = format!("{}/v1/start", self.base_url);
        debug!("Provisioning browser sandbox via {}", url);

        let resp = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(&serde_json::json!({"instance_type": "browser"}))
            .send()
            .await?;

        let started: StartResponse = Self::parse(resp).await?;
        info!("Provisioned sandbox instance {}", started.id);

        Ok(SandboxInstance {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            id: started.id,
            released: AtomicBool::new(false),
        })
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, SandboxError> {
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SandboxError::Api {
                status: status.as_u16(),
                message,
            });
        }
        resp.json::<T>()
            .await
            .map_err(|e| SandboxError::InvalidResponse(e.to_string()))
    }
}

/// A provisioned browser instance.
///
/// The instance is owned exclusively by one extraction run for its entire
/// duration. Dropping it without [`release`](SandboxInstance::release) leaks
/// the remote browser until the sandbox's own idle timeout fires.
#[derive(Debug)]
pub struct SandboxInstance {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    id: String,
    released: AtomicBool,
}

impl SandboxInstance {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// CDP debugging endpoint of the remote browser.
    pub async fn cdp_url(&self) -> Result<String, SandboxError> {
        let url = format!("{}/v1/instance/{}/cdp_url", self.base_url, self.id);
        let resp = self
            .http
            .get(&url)
            .header("x-api-key", &self.api_key)
            .send()
            .await?;

        let body: CdpUrlResponse = SandboxClient::parse(resp).await?;
        Ok(body.cdp_url)
    }

    /// Stop the remote browser. Safe to call more than once; only the first
    /// call reaches the API.
    pub async fn release(&self) -> Result<(), SandboxError> {
        if self.released.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let url = format!("{}/v1/instance/{}/stop", self.base_url, self.id);
        let resp = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SandboxError::Api {
                status: status.as_u16(),
                message,
            });
        }

        info!("Released sandbox instance {}", self.id);
        Ok(())
    }
}

impl Drop for SandboxInstance {
    fn drop(&mut self) {
        if !self.released.load(Ordering::SeqCst) {
            warn!("Sandbox instance {} dropped without release", self.id);
        }
    }
}

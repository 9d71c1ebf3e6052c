//! Outbound delivery of scan results to a Malice collection endpoint.

use anyhow::{Context, Result};
use malice_core::PluginResults;
use reqwest::Client;
use std::time::Duration;

/// Header carrying the scan identifier.
pub const SCAN_ID_HEADER: &str = "X-Malice-ID";

const REQUEST_TIMEOUT_SECS: u64 = 60;

/// HTTP client posting results to the configured endpoint.
#[derive(Clone, Debug)]
pub struct CallbackClient {
    client: Client,
    endpoint: String,
}

/// Response returned by the collection endpoint.
#[derive(Debug, Clone)]
pub struct CallbackResponse {
    pub status: u16,
    pub body: String,
}

impl CallbackClient {
    /// Create a client for `endpoint`, optionally routing through `proxy`.
    pub fn new(endpoint: impl Into<String>, proxy: Option<&str>) -> Result<Self> {
        let mut builder = Client::builder().timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS));
        if let Some(proxy) = proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .with_context(|| format!("Invalid proxy URL: {}", proxy))?;
            builder = builder.proxy(proxy);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// POST `results` as JSON. Non-success statuses are logged and returned,
    /// not treated as errors; only transport failures are.
    pub async fn send(&self, scan_id: &str, results: &PluginResults) -> Result<CallbackResponse> {
        tracing::debug!(endpoint = %self.endpoint, scan_id = %scan_id, "Posting scan results");

        let response = self
            .client
            .post(&self.endpoint)
            .header(SCAN_ID_HEADER, scan_id)
            .json(results)
            .send()
            .await
            .with_context(|| format!("Failed to POST results to {}", self.endpoint))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read callback response body")?;

        if status.is_success() {
            tracing::info!(status = status.as_u16(), "Callback delivered");
        } else {
            tracing::warn!(status = status.as_u16(), body = %body, "Callback endpoint rejected results");
        }

        Ok(CallbackResponse {
            status: status.as_u16(),
            body,
        })
    }
}

//! HTTP bridge adapter.
//!
//! Implements the Bridge trait against the bridge's REST API:
//! - `GET  <base>/api/<queue>/pending` → `{has_pending, message, timestamp}`
//! - `POST <base>/api/<queue>/respond` ← `{recipient, message, timestamp}`
//!
//! Every request carries its own timeout; there is no client-wide one.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use toolbridge_config::BridgeConfig;
use toolbridge_core::bridge::Bridge;
use toolbridge_core::error::BridgeError;
use toolbridge_core::message::{OutboundMessage, PendingInput, PollResponse};
use tracing::{debug, trace};

/// HTTP bridge configuration.
#[derive(Debug, Clone)]
pub struct HttpBridgeConfig {
    /// Base URL, e.g. `http://localhost:8080`
    pub base_url: String,
    /// Queue segment of the API path
    pub queue: String,
    pub poll_timeout: Duration,
    pub probe_timeout: Duration,
    pub respond_timeout: Duration,
}

impl From<&BridgeConfig> for HttpBridgeConfig {
    fn from(config: &BridgeConfig) -> Self {
        Self {
            base_url: config.url.clone(),
            queue: config.queue.clone(),
            poll_timeout: config.poll_timeout(),
            probe_timeout: config.probe_timeout(),
            respond_timeout: config.respond_timeout(),
        }
    }
}

/// Bridge client speaking plain JSON over HTTP.
pub struct HttpBridge {
    client: reqwest::Client,
    pending_url: String,
    respond_url: String,
    poll_timeout: Duration,
    probe_timeout: Duration,
    respond_timeout: Duration,
}

impl HttpBridge {
    pub fn new(config: HttpBridgeConfig) -> Result<Self, BridgeError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| BridgeError::Request(format!("Failed to create HTTP client: {e}")))?;

        let base = config.base_url.trim_end_matches('/');
        Ok(Self {
            client,
            pending_url: format!("{base}/api/{}/pending", config.queue),
            respond_url: format!("{base}/api/{}/respond", config.queue),
            poll_timeout: config.poll_timeout,
            probe_timeout: config.probe_timeout,
            respond_timeout: config.respond_timeout,
        })
    }

    pub fn from_config(config: &BridgeConfig) -> Result<Self, BridgeError> {
        Self::new(HttpBridgeConfig::from(config))
    }

    /// Full URL of the pending endpoint.
    pub fn pending_url(&self) -> &str {
        &self.pending_url
    }

    /// Full URL of the respond endpoint.
    pub fn respond_url(&self) -> &str {
        &self.respond_url
    }

    async fn get_pending(&self, timeout: Duration) -> Result<reqwest::Response, BridgeError> {
        self.client
            .get(&self.pending_url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, &self.pending_url))
    }
}

/// Map a transport error onto the bridge taxonomy.
fn classify(err: reqwest::Error, endpoint: &str) -> BridgeError {
    if err.is_timeout() {
        BridgeError::Timeout(endpoint.to_string())
    } else if err.is_decode() {
        BridgeError::InvalidPayload(err.to_string())
    } else {
        BridgeError::Request(err.to_string())
    }
}

#[async_trait]
impl Bridge for HttpBridge {
    fn name(&self) -> &str {
        "http"
    }

    async fn health(&self) -> Result<(), BridgeError> {
        let resp = self.get_pending(self.probe_timeout).await?;
        if resp.status() == StatusCode::OK {
            Ok(())
        } else {
            Err(BridgeError::Status {
                endpoint: self.pending_url.clone(),
                status: resp.status().as_u16(),
            })
        }
    }

    async fn poll(&self) -> Result<Option<PendingInput>, BridgeError> {
        let resp = self.get_pending(self.poll_timeout).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(BridgeError::Status {
                endpoint: self.pending_url.clone(),
                status: status.as_u16(),
            });
        }

        let body: PollResponse = resp
            .json()
            .await
            .map_err(|e| BridgeError::InvalidPayload(e.to_string()))?;
        trace!(has_pending = body.has_pending, "Poll response");
        Ok(body.into_pending())
    }

    async fn respond(&self, message: &OutboundMessage) -> Result<(), BridgeError> {
        debug!(
            timestamp = %message.timestamp,
            content_len = message.message.len(),
            "Posting response to bridge"
        );

        let resp = self
            .client
            .post(&self.respond_url)
            .timeout(self.respond_timeout)
            .json(message)
            .send()
            .await
            .map_err(|e| classify(e, &self.respond_url))?;

        if resp.status() == StatusCode::OK {
            Ok(())
        } else {
            Err(BridgeError::Status {
                endpoint: self.respond_url.clone(),
                status: resp.status().as_u16(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(base_url: &str) -> HttpBridgeConfig {
        HttpBridgeConfig {
            base_url: base_url.into(),
            queue: "claude".into(),
            poll_timeout: Duration::from_secs(10),
            probe_timeout: Duration::from_secs(5),
            respond_timeout: Duration::from_secs(15),
        }
    }

    #[test]
    fn endpoint_urls() {
        let bridge = HttpBridge::new(test_config("http://localhost:8080/")).unwrap();
        assert_eq!(bridge.name(), "http");
        assert_eq!(bridge.pending_url(), "http://localhost:8080/api/claude/pending");
        assert_eq!(bridge.respond_url(), "http://localhost:8080/api/claude/respond");
    }

    #[test]
    fn from_bridge_config() {
        let config = BridgeConfig {
            queue: "ops".into(),
            ..BridgeConfig::default()
        };
        let bridge = HttpBridge::from_config(&config).unwrap();
        assert_eq!(bridge.pending_url(), "http://localhost:8080/api/ops/pending");
        assert_eq!(bridge.poll_timeout, Duration::from_secs(10));
        assert_eq!(bridge.probe_timeout, Duration::from_secs(5));
        assert_eq!(bridge.respond_timeout, Duration::from_secs(15));
    }
}

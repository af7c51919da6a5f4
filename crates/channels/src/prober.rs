//! Startup availability prober.
//!
//! Blocks until the bridge answers a health request, retrying at a fixed
//! interval up to a bounded number of attempts.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use toolbridge_config::BridgeConfig;
use toolbridge_core::bridge::Bridge;
use tracing::{debug, error, info};

/// How long and how often to probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbePolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for ProbePolicy {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(2),
        }
    }
}

impl From<&BridgeConfig> for ProbePolicy {
    fn from(config: &BridgeConfig) -> Self {
        Self {
            max_attempts: config.probe_attempts,
            interval: config.probe_interval(),
        }
    }
}

/// Waits for the bridge to come up.
pub struct AvailabilityProber {
    bridge: Arc<dyn Bridge>,
    policy: ProbePolicy,
}

impl AvailabilityProber {
    pub fn new(bridge: Arc<dyn Bridge>, policy: ProbePolicy) -> Self {
        Self { bridge, policy }
    }

    pub fn policy(&self) -> ProbePolicy {
        self.policy
    }

    /// Probe until the bridge is healthy.
    ///
    /// Returns `false` once `max_attempts` health checks failed, or early
    /// when `shutdown` fires between attempts. The caller must not start
    /// the poll loop on `false`.
    pub async fn probe(&self, shutdown: &CancellationToken) -> bool {
        let max = self.policy.max_attempts;

        for attempt in 0..max {
            if shutdown.is_cancelled() {
                info!("Shutdown requested while waiting for bridge");
                return false;
            }

            match self.bridge.health().await {
                Ok(()) => {
                    info!(bridge = %self.bridge.name(), attempt = attempt + 1, "Bridge is ready");
                    return true;
                }
                Err(e) => {
                    if attempt == 0 {
                        info!("Waiting for bridge to start...");
                    } else if attempt % 5 == 0 {
                        info!(attempt = attempt + 1, max_attempts = max, "Still waiting for bridge...");
                    }
                    debug!(error = %e, "Bridge health check failed");
                }
            }

            if attempt + 1 < max {
                tokio::select! {
                    _ = tokio::time::sleep(self.policy.interval) => {}
                    _ = shutdown.cancelled() => {}
                }
            }
        }

        error!(attempts = max, "Bridge failed to start within timeout");
        false
    }
}

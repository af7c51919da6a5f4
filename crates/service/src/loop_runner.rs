//! The poll/dispatch loop.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use toolbridge_channels::{AvailabilityProber, ProbePolicy, Responder};
use toolbridge_config::AppConfig;
use toolbridge_core::bridge::Bridge;
use toolbridge_core::error::ServiceError;
use toolbridge_core::executor::Executor;
use tracing::{error, info, warn};

use crate::backoff::{BackoffPolicy, BackoffStep};
use crate::pipeline::MessagePipeline;
use crate::state::ServiceState;

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Shutdown,
    TooManyErrors { count: u32 },
}

/// Relays bridge messages to the executor, one at a time.
pub struct BridgeService {
    bridge: Arc<dyn Bridge>,
    prober: AvailabilityProber,
    pipeline: MessagePipeline,
    backoff: BackoffPolicy,
    poll_interval: Duration,
}

impl BridgeService {
    pub fn new(
        bridge: Arc<dyn Bridge>,
        executor: Arc<dyn Executor>,
        recipient: impl Into<String>,
        config: &AppConfig,
    ) -> Self {
        let responder = Responder::new(bridge.clone(), recipient, config.response.chunk_delay());
        Self {
            prober: AvailabilityProber::new(bridge.clone(), ProbePolicy::from(&config.bridge)),
            pipeline: MessagePipeline::new(executor, responder, config),
            backoff: BackoffPolicy::from(&config.service),
            poll_interval: config.service.poll_interval(),
            bridge,
        }
    }

    /// Wait for the bridge, then run the loop until it stops.
    ///
    /// A shutdown request, whether during probing or running, is a clean
    /// `Ok`. Exhausting the probe or the poll error budget is an error.
    pub async fn start(&self, shutdown: CancellationToken) -> Result<(), ServiceError> {
        info!(bridge = %self.bridge.name(), "Starting bridge service");

        if !self.prober.probe(&shutdown).await {
            if shutdown.is_cancelled() {
                return Ok(());
            }
            return Err(ServiceError::BridgeUnavailable {
                attempts: self.prober.policy().max_attempts,
            });
        }

        let mut state = ServiceState::new();
        match self.run(&mut state, &shutdown).await {
            StopReason::Shutdown => Ok(()),
            StopReason::TooManyErrors { count } => Err(ServiceError::TooManyPollErrors { count }),
        }
    }

    /// The loop proper. Shutdown is observed at the top of every iteration
    /// and cuts idle sleeps short; a poll or a message already in progress
    /// always runs to completion.
    pub async fn run(&self, state: &mut ServiceState, shutdown: &CancellationToken) -> StopReason {
        info!(interval_ms = self.poll_interval.as_millis() as u64, "Polling for messages");

        loop {
            if shutdown.is_cancelled() || !state.is_running() {
                state.stop();
                info!("Shutdown requested, stopping service");
                return StopReason::Shutdown;
            }

            let wait = match self.bridge.poll().await {
                Ok(pending) => {
                    state.record_poll_success();
                    if let Some(input) = pending {
                        self.pipeline.handle(&input, state).await;
                    }
                    self.poll_interval
                }
                Err(e) => {
                    let errors = state.record_poll_failure();
                    match self.backoff.next(errors) {
                        BackoffStep::Wait(delay) => {
                            warn!(
                                error = %e,
                                consecutive_errors = errors,
                                backoff_secs = delay.as_secs(),
                                "Poll failed, backing off"
                            );
                            delay
                        }
                        BackoffStep::GiveUp => {
                            error!(error = %e, consecutive_errors = errors, "Too many consecutive errors, shutting down");
                            state.stop();
                            return StopReason::TooManyErrors { count: errors };
                        }
                    }
                }
            };

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = shutdown.cancelled() => {}
            }
        }
    }
}

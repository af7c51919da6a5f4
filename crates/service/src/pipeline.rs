//! Per-message pipeline: rate limit, execute, reply.
//!
//! Nothing that happens here is a loop-level error. Every outcome, including
//! a tool failure, ends as a reply to the sender.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use toolbridge_channels::{DeliveryReport, Responder};
use toolbridge_config::{AppConfig, WindowPolicy};
use toolbridge_core::chunk::chunk;
use toolbridge_core::executor::Executor;
use toolbridge_core::message::{PendingInput, preview};
use tracing::{info, warn};

use crate::notice::{Notices, Reply};
use crate::rate_limit::{Admission, admit};
use crate::state::ServiceState;

/// What happened to one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    RateLimited,
    Executed {
        kind: &'static str,
        delivery: DeliveryReport,
    },
}

pub struct MessagePipeline {
    executor: Arc<dyn Executor>,
    responder: Responder,
    notices: Notices,
    min_interval: Duration,
    window: WindowPolicy,
    max_chunk_chars: usize,
}

impl MessagePipeline {
    pub fn new(executor: Arc<dyn Executor>, responder: Responder, config: &AppConfig) -> Self {
        Self {
            executor,
            responder,
            notices: Notices::from(config),
            min_interval: config.rate_limit.min_interval(),
            window: config.rate_limit.window,
            max_chunk_chars: config.response.max_chunk_chars,
        }
    }

    /// Run one input to completion. Every reply carries the input's
    /// correlation id.
    pub async fn handle(&self, input: &PendingInput, state: &mut ServiceState) -> PipelineOutcome {
        let id = input.correlation_id.as_str();
        info!(timestamp = %id, message = %preview(&input.text, 50), "Received message");

        let now = Instant::now();
        if let Admission::Reject { retry_in } = admit(now, state.last_dispatch, self.min_interval) {
            warn!(retry_in_ms = retry_in.as_millis() as u64, "Rate limited");
            self.responder.send(&self.notices.rate_limited(), id).await;
            return PipelineOutcome::RateLimited;
        }

        if self.window == WindowPolicy::OnAdmit {
            state.record_dispatch(now);
        }

        let result = self.executor.execute(&input.text).await;

        if self.window == WindowPolicy::OnSuccess && result.is_success() {
            state.record_dispatch(now);
        }

        let delivery = match self.notices.reply(&result) {
            Reply::Chunked(text) => {
                self.responder
                    .respond(&chunk(&text, self.max_chunk_chars), id)
                    .await
            }
            Reply::Single(text) => {
                let delivered = self.responder.send(&text, id).await;
                DeliveryReport {
                    sent: usize::from(delivered),
                    failed: usize::from(!delivered),
                }
            }
        };

        info!(
            result = result.kind(),
            sent = delivery.sent,
            failed = delivery.failed,
            "Message handled"
        );
        PipelineOutcome::Executed {
            kind: result.kind(),
            delivery,
        }
    }
}

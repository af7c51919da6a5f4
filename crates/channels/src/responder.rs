//! Responder: delivers text back through the bridge.
//!
//! Delivery is at-most-once: a failed send is logged and dropped, never
//! retried, and never reported back to the poll loop as an error.

use std::sync::Arc;
use std::time::Duration;

use toolbridge_core::bridge::Bridge;
use toolbridge_core::message::{OutboundMessage, ResponseChunk, preview};
use tracing::{error, info};

/// Outcome of delivering one response, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: usize,
    pub failed: usize,
}

/// Posts responses to a fixed recipient.
pub struct Responder {
    bridge: Arc<dyn Bridge>,
    recipient: String,
    /// Pause between consecutive chunks of one response
    chunk_delay: Duration,
}

impl Responder {
    pub fn new(bridge: Arc<dyn Bridge>, recipient: impl Into<String>, chunk_delay: Duration) -> Self {
        Self {
            bridge,
            recipient: recipient.into(),
            chunk_delay,
        }
    }

    /// Send a single message as-is. Returns whether the bridge accepted it.
    pub async fn send(&self, text: &str, correlation_id: &str) -> bool {
        let message = OutboundMessage {
            recipient: self.recipient.clone(),
            message: text.to_string(),
            timestamp: correlation_id.to_string(),
        };

        match self.bridge.respond(&message).await {
            Ok(()) => {
                info!(preview = %preview(text, 100), "Response sent");
                true
            }
            Err(e) => {
                error!(error = %e, timestamp = %correlation_id, "Failed to send response");
                false
            }
        }
    }

    /// Send every chunk in index order, pausing between chunks.
    ///
    /// Fragments of a split response carry their `[i/n] ` prefix. A failed
    /// chunk does not stop the remaining ones.
    pub async fn respond(&self, chunks: &[ResponseChunk], correlation_id: &str) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        if chunks.len() > 1 {
            info!(chunks = chunks.len(), "Sending response in chunks");
        }

        for (i, chunk) in chunks.iter().enumerate() {
            if chunks.len() > 1 {
                info!(
                    index = chunk.index,
                    total = chunk.total,
                    preview = %preview(&chunk.text, 100),
                    "Sending chunk"
                );
            }

            if self.send(&chunk.render(), correlation_id).await {
                report.sent += 1;
            } else {
                report.failed += 1;
            }

            if i + 1 < chunks.len() {
                tokio::time::sleep(self.chunk_delay).await;
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedBridge;
    use toolbridge_core::chunk::chunk;

    fn responder(bridge: Arc<ScriptedBridge>) -> Responder {
        Responder::new(bridge, "+15550100", Duration::from_millis(1500))
    }

    #[tokio::test(start_paused = true)]
    async fn single_message_carries_recipient_and_timestamp() {
        let bridge = Arc::new(ScriptedBridge::healthy_after(0));
        let responder = responder(bridge.clone());

        assert!(responder.send("⏰ Please wait", "T1").await);

        let sent = bridge.messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, "+15550100");
        assert_eq!(sent[0].message, "⏰ Please wait");
        assert_eq!(sent[0].timestamp, "T1");
    }

    #[tokio::test(start_paused = true)]
    async fn single_chunk_has_no_prefix_and_no_delay() {
        let bridge = Arc::new(ScriptedBridge::healthy_after(0));
        let responder = responder(bridge.clone());

        let start = tokio::time::Instant::now();
        let report = responder.respond(&chunk("all good", 1500), "T1").await;

        assert_eq!(report, DeliveryReport { sent: 1, failed: 0 });
        assert_eq!(bridge.messages()[0].message, "all good");
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn chunks_are_prefixed_ordered_and_paced() {
        let bridge = Arc::new(ScriptedBridge::healthy_after(0));
        let responder = responder(bridge.clone());

        let text = "x".repeat(3200);
        let report = responder.respond(&chunk(&text, 1500), "T1").await;
        assert_eq!(report, DeliveryReport { sent: 3, failed: 0 });

        let sent = bridge.messages();
        assert_eq!(sent.len(), 3);
        assert!(sent[0].message.starts_with("[1/3] "));
        assert!(sent[1].message.starts_with("[2/3] "));
        assert!(sent[2].message.starts_with("[3/3] "));
        assert!(sent.iter().all(|m| m.timestamp == "T1"));
        assert_eq!(sent[2].message.len(), "[3/3] ".len() + 200);

        let times = bridge.send_times();
        assert_eq!(times[1] - times[0], Duration::from_millis(1500));
        assert_eq!(times[2] - times[1], Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_chunk_is_not_retried_and_rest_continue() {
        let bridge = Arc::new(ScriptedBridge::healthy_after(0).failing_responds(vec![1]));
        let responder = responder(bridge.clone());

        let text = "y".repeat(3200);
        let report = responder.respond(&chunk(&text, 1500), "T9").await;

        assert_eq!(report, DeliveryReport { sent: 2, failed: 1 });
        // Three attempts total, one per chunk.
        assert_eq!(bridge.messages().len(), 3);
    }
}

//! Bridge trait: the abstraction over the external message endpoint.
//!
//! A Bridge surfaces inbound messages one poll at a time and accepts
//! outbound responses. The HTTP implementation lives in the channels crate;
//! tests substitute in-memory fakes.

use async_trait::async_trait;

use crate::error::BridgeError;
use crate::message::{OutboundMessage, PendingInput};

/// The core Bridge trait.
///
/// Implementations apply their own per-request timeouts; callers treat a
/// timeout like any other [`BridgeError`].
#[async_trait]
pub trait Bridge: Send + Sync {
    /// Human-readable bridge name (e.g. "http").
    fn name(&self) -> &str;

    /// Lightweight reachability check used by the startup prober.
    ///
    /// `Ok(())` means the bridge answered with HTTP 200.
    async fn health(&self) -> std::result::Result<(), BridgeError>;

    /// Ask the bridge for the next pending input, if any.
    async fn poll(&self) -> std::result::Result<Option<PendingInput>, BridgeError>;

    /// Deliver one outbound message.
    async fn respond(&self, message: &OutboundMessage) -> std::result::Result<(), BridgeError>;
}

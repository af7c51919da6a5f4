//! Error types for the toolbridge domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.

use thiserror::Error;

// --- Bounded context errors ---

/// Failures talking to the external HTTP bridge.
///
/// Every variant is transient from the loop's point of view: the poll loop
/// counts them toward its backoff threshold, the responder only logs them.
#[derive(Debug, Clone, Error)]
pub enum BridgeError {
    #[error("Bridge request failed: {0}")]
    Request(String),

    #[error("Bridge request timed out: {0}")]
    Timeout(String),

    #[error("Bridge returned HTTP {status} for {endpoint}")]
    Status { endpoint: String, status: u16 },

    #[error("Invalid bridge payload: {0}")]
    InvalidPayload(String),
}

/// Conditions that stop the service as a whole.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Bridge did not become available after {attempts} attempts")]
    BridgeUnavailable { attempts: u32 },

    #[error("Too many consecutive poll errors ({count}), shutting down")]
    TooManyPollErrors { count: u32 },

    #[error("Tool binary not found at {path}")]
    ToolNotInstalled { path: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

//! # toolbridge service
//!
//! The single-task relay loop. Each iteration polls the bridge; a pending
//! input passes the rate limiter, runs through the executor and is answered
//! through the responder. Poll failures drive the backoff controller, and
//! per-message failures only ever produce a reply.

pub mod backoff;
pub mod bootstrap;
pub mod loop_runner;
pub mod notice;
pub mod pipeline;
pub mod rate_limit;
pub mod state;

#[cfg(test)]
mod test_helpers;

pub use backoff::{BackoffPolicy, BackoffStep};
pub use bootstrap::check_tool_installed;
pub use loop_runner::{BridgeService, StopReason};
pub use notice::{Notices, Reply};
pub use pipeline::{MessagePipeline, PipelineOutcome};
pub use rate_limit::{Admission, admit};
pub use state::ServiceState;

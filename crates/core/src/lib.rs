//! # toolbridge core
//!
//! Domain types, traits, and error definitions for the toolbridge relay.
//! This crate has **no runtime dependencies**; it defines the domain model
//! that the other crates implement against.
//!
//! ## Design Philosophy
//!
//! Both external collaborators are traits here: the [`Bridge`] that surfaces
//! inbound messages and accepts responses, and the [`Executor`] that runs the
//! command-line tool. Implementations live in their respective crates, so the
//! service loop can be driven end to end with in-memory fakes.

pub mod bridge;
pub mod chunk;
pub mod error;
pub mod executor;
pub mod message;

// Re-export key types at crate root for ergonomics
pub use bridge::Bridge;
pub use chunk::{DEFAULT_MAX_CHUNK_CHARS, chunk};
pub use error::{BridgeError, ServiceError};
pub use executor::{ExecutionResult, Executor};
pub use message::{OutboundMessage, PendingInput, PollResponse, ResponseChunk, preview};

//! Bridge channel implementations for toolbridge.
//!
//! Everything that talks to the external bridge lives here:
//! - **HTTP**: the reqwest-backed [`Bridge`](toolbridge_core::Bridge) client
//! - **Prober**: blocks at startup until the bridge is reachable
//! - **Responder**: posts (possibly chunked) responses back

pub mod http;
pub mod prober;
pub mod responder;

#[cfg(test)]
mod test_helpers;

pub use http::{HttpBridge, HttpBridgeConfig};
pub use prober::{AvailabilityProber, ProbePolicy};
pub use responder::{DeliveryReport, Responder};

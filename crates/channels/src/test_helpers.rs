//! Shared test utilities for the prober and responder tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::time::Instant;
use toolbridge_core::bridge::Bridge;
use toolbridge_core::error::BridgeError;
use toolbridge_core::message::{OutboundMessage, PendingInput};

/// A bridge whose health checks follow a script and which records
/// every response it is handed, with the (runtime) time it arrived.
pub struct ScriptedBridge {
    health: Mutex<VecDeque<Result<(), BridgeError>>>,
    health_calls: Mutex<usize>,
    fail_respond_at: Mutex<Vec<usize>>,
    pub sent: Mutex<Vec<(Instant, OutboundMessage)>>,
}

impl ScriptedBridge {
    /// Health checks fail `failures` times, then succeed.
    pub fn healthy_after(failures: usize) -> Self {
        let mut script = VecDeque::new();
        for _ in 0..failures {
            script.push_back(Err(BridgeError::Request("connection refused".into())));
        }
        script.push_back(Ok(()));
        Self::with_health(script)
    }

    /// Health checks always fail.
    pub fn never_healthy() -> Self {
        Self::with_health(VecDeque::new())
    }

    fn with_health(script: VecDeque<Result<(), BridgeError>>) -> Self {
        Self {
            health: Mutex::new(script),
            health_calls: Mutex::new(0),
            fail_respond_at: Mutex::new(vec![]),
            sent: Mutex::new(vec![]),
        }
    }

    /// Make the respond calls with these 0-based positions fail.
    pub fn failing_responds(self, positions: Vec<usize>) -> Self {
        *self.fail_respond_at.lock().unwrap() = positions;
        self
    }

    pub fn health_calls(&self) -> usize {
        *self.health_calls.lock().unwrap()
    }

    pub fn messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().iter().map(|(_, m)| m.clone()).collect()
    }

    pub fn send_times(&self) -> Vec<Instant> {
        self.sent.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }
}

#[async_trait]
impl Bridge for ScriptedBridge {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn health(&self) -> Result<(), BridgeError> {
        *self.health_calls.lock().unwrap() += 1;
        self.health
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BridgeError::Request("connection refused".into())))
    }

    async fn poll(&self) -> Result<Option<PendingInput>, BridgeError> {
        Ok(None)
    }

    async fn respond(&self, message: &OutboundMessage) -> Result<(), BridgeError> {
        let mut sent = self.sent.lock().unwrap();
        let position = sent.len();
        sent.push((Instant::now(), message.clone()));
        if self.fail_respond_at.lock().unwrap().contains(&position) {
            return Err(BridgeError::Status {
                endpoint: "/api/claude/respond".into(),
                status: 500,
            });
        }
        Ok(())
    }
}

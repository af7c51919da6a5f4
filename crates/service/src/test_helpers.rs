//! In-memory bridge and executor fakes for loop and pipeline tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::time::Instant;
use toolbridge_core::bridge::Bridge;
use toolbridge_core::error::BridgeError;
use toolbridge_core::executor::{ExecutionResult, Executor};
use toolbridge_core::message::{OutboundMessage, PendingInput};

type PollResult = Result<Option<PendingInput>, BridgeError>;

pub fn poll_error() -> BridgeError {
    BridgeError::Request("connection refused".into())
}

/// A bridge that replays a poll script, then repeats a fallback result.
/// Every poll and every response is recorded with the runtime time it happened.
pub struct ScriptedBridge {
    healthy: bool,
    polls: Mutex<VecDeque<PollResult>>,
    fallback: PollResult,
    poll_times: Mutex<Vec<Instant>>,
    sent: Mutex<Vec<(Instant, OutboundMessage)>>,
}

impl ScriptedBridge {
    pub fn new(polls: Vec<PollResult>, fallback: PollResult) -> Self {
        Self {
            healthy: true,
            polls: Mutex::new(polls.into()),
            fallback,
            poll_times: Mutex::new(vec![]),
            sent: Mutex::new(vec![]),
        }
    }

    /// Idle bridge that surfaces one input, then nothing.
    pub fn with_input(text: &str, correlation_id: &str) -> Self {
        Self::new(vec![Ok(Some(PendingInput::new(text, correlation_id)))], Ok(None))
    }

    pub fn always_failing() -> Self {
        Self::new(vec![], Err(poll_error()))
    }

    pub fn unhealthy(mut self) -> Self {
        self.healthy = false;
        self
    }

    pub fn poll_times(&self) -> Vec<Instant> {
        self.poll_times.lock().unwrap().clone()
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
        if self.healthy { Ok(()) } else { Err(poll_error()) }
    }

    async fn poll(&self) -> Result<Option<PendingInput>, BridgeError> {
        self.poll_times.lock().unwrap().push(Instant::now());
        self.polls
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }

    async fn respond(&self, message: &OutboundMessage) -> Result<(), BridgeError> {
        self.sent.lock().unwrap().push((Instant::now(), message.clone()));
        Ok(())
    }
}

/// An executor returning scripted results in order (then `Success("ok")`),
/// recording every input it was called with.
pub struct ScriptedExecutor {
    results: Mutex<VecDeque<ExecutionResult>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new(results: Vec<ExecutionResult>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            calls: Mutex::new(vec![]),
        }
    }

    pub fn output(text: &str) -> Self {
        Self::new(vec![ExecutionResult::Success {
            output: text.into(),
        }])
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Executor for ScriptedExecutor {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn execute(&self, text: &str) -> ExecutionResult {
        self.calls.lock().unwrap().push(text.to_string());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| ExecutionResult::Success { output: "ok".into() })
    }
}

//! Mutable loop state, owned by the loop driver and lent out by `&mut`.

use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct ServiceState {
    /// When the last admitted request consumed the rate-limit window
    pub last_dispatch: Option<Instant>,
    /// Poll failures since the last successful poll
    pub consecutive_errors: u32,
    running: bool,
}

impl Default for ServiceState {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceState {
    pub fn new() -> Self {
        Self {
            last_dispatch: None,
            consecutive_errors: 0,
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Transition to stopped. Returns `false` if already stopped.
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    pub fn record_poll_success(&mut self) {
        self.consecutive_errors = 0;
    }

    /// Count a failed poll and return the new streak length.
    pub fn record_poll_failure(&mut self) -> u32 {
        self.consecutive_errors = self.consecutive_errors.saturating_add(1);
        self.consecutive_errors
    }

    pub fn record_dispatch(&mut self, at: Instant) {
        self.last_dispatch = Some(at);
    }
}

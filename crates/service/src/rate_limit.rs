//! Minimum-interval gate in front of the executor.

use std::time::Duration;

use tokio::time::Instant;

/// Whether a request may be dispatched now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admit,
    /// Too soon; `retry_in` is the remainder of the window.
    Reject { retry_in: Duration },
}

/// Admit when no request was dispatched yet, or when at least
/// `min_interval` has passed since the last one.
///
/// Pure: recording the new dispatch time is the caller's job.
pub fn admit(now: Instant, last_dispatch: Option<Instant>, min_interval: Duration) -> Admission {
    let Some(last) = last_dispatch else {
        return Admission::Admit;
    };

    let elapsed = now.saturating_duration_since(last);
    if elapsed < min_interval {
        Admission::Reject {
            retry_in: min_interval - elapsed,
        }
    } else {
        Admission::Admit
    }
}

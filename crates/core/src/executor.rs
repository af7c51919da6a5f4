//! Executor trait: the abstraction over the external command-line tool.
//!
//! An executor takes one message, runs the tool on it and classifies the
//! outcome. It never retries and never returns an error: every failure mode
//! is a variant of [`ExecutionResult`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outcome of a single tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExecutionResult {
    /// Exit code 0; `output` is the trimmed stdout.
    Success { output: String },

    /// The hard timeout expired; the child was killed and reaped.
    Timeout,

    /// The tool binary could not be found.
    ToolMissing,

    /// Nonzero exit; `stderr` is the trimmed stderr.
    NonZeroExit { stderr: String },

    /// The wrapper script the tool is launched through does not exist.
    WrapperMissing { path: String },

    /// Spawning or waiting on the child failed for another reason.
    LaunchFailed { reason: String },
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Short label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Timeout => "timeout",
            Self::ToolMissing => "tool_missing",
            Self::NonZeroExit { .. } => "non_zero_exit",
            Self::WrapperMissing { .. } => "wrapper_missing",
            Self::LaunchFailed { .. } => "launch_failed",
        }
    }
}

/// The core Executor trait.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Name used in logs (e.g. "cli").
    fn name(&self) -> &str;

    /// Run the tool on `text` and classify the outcome.
    async fn execute(&self, text: &str) -> ExecutionResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_kinds() {
        assert!(ExecutionResult::Success { output: "ok".into() }.is_success());
        assert!(!ExecutionResult::Timeout.is_success());
        assert_eq!(ExecutionResult::ToolMissing.kind(), "tool_missing");
        assert_eq!(
            ExecutionResult::NonZeroExit { stderr: "boom".into() }.kind(),
            "non_zero_exit"
        );
    }

    #[test]
    fn result_serialization_is_tagged() {
        let json = serde_json::to_value(ExecutionResult::NonZeroExit {
            stderr: "boom".into(),
        })
        .unwrap();
        assert_eq!(json["kind"], "non_zero_exit");
        assert_eq!(json["stderr"], "boom");
    }
}

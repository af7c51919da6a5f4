//! User-facing texts sent back for each pipeline outcome.

use toolbridge_config::AppConfig;
use toolbridge_core::executor::ExecutionResult;

/// How much of a launch failure reason is quoted back.
const LAUNCH_FAILURE_EXCERPT_CHARS: usize = 200;

/// A reply to one input. Only tool output is split into chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Chunked(String),
    Single(String),
}

#[derive(Debug, Clone)]
pub struct Notices {
    /// Display name of the tool, e.g. "Claude"
    pub name: String,
    pub min_interval_secs: u64,
    pub timeout_secs: u64,
    pub error_excerpt_chars: usize,
}

impl From<&AppConfig> for Notices {
    fn from(config: &AppConfig) -> Self {
        Self {
            name: config.executor.display_name.clone(),
            min_interval_secs: config.rate_limit.min_interval_secs,
            timeout_secs: config.executor.timeout_secs,
            error_excerpt_chars: config.response.error_excerpt_chars,
        }
    }
}

fn excerpt(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

impl Notices {
    pub fn rate_limited(&self) -> String {
        format!(
            "⏰ Please wait {} seconds between queries",
            self.min_interval_secs
        )
    }

    pub fn reply(&self, result: &ExecutionResult) -> Reply {
        let name = &self.name;
        match result {
            ExecutionResult::Success { output } => Reply::Chunked(format!("🤖 {name}:\n{output}")),
            ExecutionResult::Timeout => Reply::Single(format!(
                "⏰ {name} timed out after {}s",
                self.timeout_secs
            )),
            ExecutionResult::ToolMissing => {
                Reply::Single(format!("❌ {name} CLI not found. Please install it first."))
            }
            ExecutionResult::NonZeroExit { stderr } => Reply::Single(format!(
                "❌ {name} Error: {}",
                excerpt(stderr, self.error_excerpt_chars)
            )),
            ExecutionResult::WrapperMissing { .. } => {
                Reply::Single(format!("❌ {name} executor script not found"))
            }
            ExecutionResult::LaunchFailed { reason } => Reply::Single(format!(
                "❌ Failed to call {name}: {}",
                excerpt(reason, LAUNCH_FAILURE_EXCERPT_CHARS)
            )),
        }
    }
}

//! Subprocess executor: runs the external tool once per message.
//!
//! The tool is launched through a wrapper script (by default
//! `/bin/bash <wrapper> <text>`) that establishes its runtime environment.
//! A hard wall-clock timeout bounds every run. The child leads its own
//! process group; on expiry the whole group is killed and the child reaped
//! before the call returns, so a tool the wrapper started does not outlive it.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use toolbridge_config::ExecutorConfig;
use toolbridge_core::executor::{ExecutionResult, Executor};
use toolbridge_core::message::preview;
use tracing::{debug, error, info, warn};

/// Environment variable carrying the allowed-tools setting to the child.
pub const ALLOWED_TOOLS_ENV: &str = "ALLOWED_TOOLS";

/// Exit status a POSIX shell uses for "command not found".
const EXIT_COMMAND_NOT_FOUND: i32 = 127;

/// Subprocess executor configuration.
#[derive(Debug, Clone)]
pub struct SubprocessConfig {
    /// The program spawned directly (the shell, or the tool itself)
    pub program: PathBuf,
    /// Script passed as the first argument; must exist before spawning
    pub wrapper: Option<PathBuf>,
    pub allowed_tools: String,
    pub timeout: Duration,
    pub max_input_chars: usize,
}

impl From<&ExecutorConfig> for SubprocessConfig {
    fn from(config: &ExecutorConfig) -> Self {
        Self {
            program: config.shell.clone(),
            wrapper: Some(config.wrapper.clone()),
            allowed_tools: config.allowed_tools.clone(),
            timeout: config.timeout(),
            max_input_chars: config.max_input_chars,
        }
    }
}

/// Runs the external tool with a bounded input and a hard timeout.
pub struct SubprocessExecutor {
    config: SubprocessConfig,
}

impl SubprocessExecutor {
    pub fn new(config: SubprocessConfig) -> Self {
        Self { config }
    }

    pub fn from_config(config: &ExecutorConfig) -> Self {
        Self::new(SubprocessConfig::from(config))
    }

    fn command(&self, input: &str) -> Command {
        let mut cmd = Command::new(&self.config.program);
        if let Some(wrapper) = &self.config.wrapper {
            cmd.arg(wrapper);
        }
        cmd.arg(input)
            .env(ALLOWED_TOOLS_ENV, &self.config.allowed_tools)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        cmd.process_group(0);

        cmd
    }
}

/// Trim the message and cut it to at most `max_chars` characters.
pub fn clean_input(text: &str, max_chars: usize) -> String {
    text.trim().chars().take(max_chars).collect()
}

/// Whether the tool binary exists at `path` (and is executable on Unix).
pub fn is_tool_installed(path: &Path) -> bool {
    let Ok(meta) = std::fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> String {
    let Some(mut pipe) = pipe else {
        return String::new();
    };
    let mut buf = Vec::new();
    if let Err(e) = pipe.read_to_end(&mut buf).await {
        debug!(error = %e, "Failed to read child output");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Kill the child's process group, then the child itself, and wait for it,
/// so neither the tool nor a zombie is left behind.
///
/// `pgid` is captured at spawn time: once `wait()` has reaped the wrapper,
/// `child.id()` is gone but its group may still hold the tool.
async fn terminate(child: &mut Child, pgid: Option<u32>) {
    #[cfg(unix)]
    {
        use nix::errno::Errno;
        use nix::sys::signal::{Signal, killpg};
        use nix::unistd::Pid;

        if let Some(pgid) = pgid {
            match killpg(Pid::from_raw(pgid as i32), Signal::SIGKILL) {
                Ok(()) | Err(Errno::ESRCH) => {}
                Err(e) => warn!(pgid, error = %e, "killpg failed"),
            }
        }
    }
    #[cfg(not(unix))]
    let _ = pgid;

    // The wrapper may already have been reaped while a grandchild held its pipes.
    if let Ok(Some(_)) = child.try_wait() {
        return;
    }
    if let Err(e) = child.kill().await {
        error!(error = %e, "Failed to kill timed-out tool process");
    }
}

#[async_trait]
impl Executor for SubprocessExecutor {
    fn name(&self) -> &str {
        "subprocess"
    }

    async fn execute(&self, text: &str) -> ExecutionResult {
        let input = clean_input(text, self.config.max_input_chars);

        if let Some(wrapper) = &self.config.wrapper {
            if !wrapper.exists() {
                error!(path = %wrapper.display(), "Wrapper script not found");
                return ExecutionResult::WrapperMissing {
                    path: wrapper.display().to_string(),
                };
            }
        }

        info!(input = %preview(&input, 100), "Calling tool");

        let mut child = match self.command(&input).spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                error!(program = %self.config.program.display(), "Tool not found");
                return ExecutionResult::ToolMissing;
            }
            Err(e) => {
                error!(error = %e, "Failed to spawn tool");
                return ExecutionResult::LaunchFailed {
                    reason: e.to_string(),
                };
            }
        };

        let pgid = child.id();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let outcome = tokio::time::timeout(self.config.timeout, async {
            let (status, out, err) = tokio::join!(child.wait(), read_pipe(stdout), read_pipe(stderr));
            status.map(|status| (status, out, err))
        })
        .await;

        match outcome {
            Ok(Ok((status, out, err))) => {
                if status.success() {
                    let output = out.trim().to_string();
                    info!(
                        chars = output.chars().count(),
                        preview = %preview(&output, 200),
                        "Tool responded"
                    );
                    ExecutionResult::Success { output }
                } else if status.code() == Some(EXIT_COMMAND_NOT_FOUND) {
                    error!(stderr = %err.trim(), "Tool not found by wrapper");
                    ExecutionResult::ToolMissing
                } else {
                    let stderr = err.trim().to_string();
                    error!(exit_code = ?status.code(), stderr = %stderr, "Tool failed");
                    ExecutionResult::NonZeroExit { stderr }
                }
            }
            Ok(Err(e)) => {
                error!(error = %e, "Failed waiting for tool");
                terminate(&mut child, pgid).await;
                ExecutionResult::LaunchFailed {
                    reason: e.to_string(),
                }
            }
            Err(_) => {
                warn!(timeout_secs = self.config.timeout.as_secs(), "Tool timed out");
                terminate(&mut child, pgid).await;
                ExecutionResult::Timeout
            }
        }
    }
}

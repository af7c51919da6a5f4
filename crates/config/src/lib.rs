//! Configuration loading, validation, and management for toolbridge.
//!
//! Loads configuration from `~/.toolbridge/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The root configuration structure.
///
/// Maps directly to `~/.toolbridge/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Identifier every response is addressed to (required to run)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,

    /// Bridge endpoint configuration
    #[serde(default)]
    pub bridge: BridgeConfig,

    /// External tool invocation
    #[serde(default)]
    pub executor: ExecutorConfig,

    /// Poll loop timing and error thresholds
    #[serde(default)]
    pub service: ServiceConfig,

    /// Minimum interval between tool invocations
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Outbound message shaping
    #[serde(default)]
    pub response: ResponseConfig,

    /// Log level and log file
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("recipient", &redact(&self.recipient))
            .field("bridge", &self.bridge)
            .field("executor", &self.executor)
            .field("service", &self.service)
            .field("rate_limit", &self.rate_limit)
            .field("response", &self.response)
            .field("logging", &self.logging)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Base URL of the bridge, e.g. `http://localhost:8080`
    #[serde(default = "default_bridge_url")]
    pub url: String,

    /// Queue segment of the API path (`/api/<queue>/pending`)
    #[serde(default = "default_queue")]
    pub queue: String,

    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,

    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    #[serde(default = "default_respond_timeout")]
    pub respond_timeout_secs: u64,

    /// Startup reachability attempts before giving up
    #[serde(default = "default_probe_attempts")]
    pub probe_attempts: u32,

    #[serde(default = "default_probe_interval")]
    pub probe_interval_ms: u64,
}

fn default_bridge_url() -> String {
    "http://localhost:8080".into()
}
fn default_queue() -> String {
    "claude".into()
}
fn default_poll_timeout() -> u64 {
    10
}
fn default_probe_timeout() -> u64 {
    5
}
fn default_respond_timeout() -> u64 {
    15
}
fn default_probe_attempts() -> u32 {
    30
}
fn default_probe_interval() -> u64 {
    2000
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            url: default_bridge_url(),
            queue: default_queue(),
            poll_timeout_secs: default_poll_timeout(),
            probe_timeout_secs: default_probe_timeout(),
            respond_timeout_secs: default_respond_timeout(),
            probe_attempts: default_probe_attempts(),
            probe_interval_ms: default_probe_interval(),
        }
    }
}

impl BridgeConfig {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn respond_timeout(&self) -> Duration {
        Duration::from_secs(self.respond_timeout_secs)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.probe_interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Name used in user-facing notices ("🤖 Claude: ...")
    #[serde(default = "default_display_name")]
    pub display_name: String,

    /// Interpreter the wrapper script is run with
    #[serde(default = "default_shell")]
    pub shell: PathBuf,

    /// Wrapper script that sets up the tool's environment and invokes it
    #[serde(default = "default_wrapper")]
    pub wrapper: PathBuf,

    /// The tool binary itself; checked for existence at startup
    #[serde(default = "default_tool_path")]
    pub tool_path: PathBuf,

    /// Passed to the tool as `ALLOWED_TOOLS`. "*" = unrestricted.
    #[serde(default = "default_allowed_tools")]
    pub allowed_tools: String,

    #[serde(default = "default_executor_timeout")]
    pub timeout_secs: u64,

    /// Input is trimmed and cut to this many characters
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,
}

fn default_display_name() -> String {
    "Claude".into()
}
fn default_shell() -> PathBuf {
    PathBuf::from("/bin/bash")
}
fn default_wrapper() -> PathBuf {
    AppConfig::config_dir().join("claude-executor.sh")
}
fn default_tool_path() -> PathBuf {
    PathBuf::from("/opt/homebrew/bin/claude")
}
fn default_allowed_tools() -> String {
    "*".into()
}
fn default_executor_timeout() -> u64 {
    300
}
fn default_max_input_chars() -> usize {
    1000
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            display_name: default_display_name(),
            shell: default_shell(),
            wrapper: default_wrapper(),
            tool_path: default_tool_path(),
            allowed_tools: default_allowed_tools(),
            timeout_secs: default_executor_timeout(),
            max_input_chars: default_max_input_chars(),
        }
    }
}

impl ExecutorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Sleep between polls after a successful cycle
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Consecutive poll failures before the service stops
    #[serde(default = "default_max_consecutive_errors")]
    pub max_consecutive_errors: u32,

    /// Upper bound of the exponential backoff
    #[serde(default = "default_backoff_cap")]
    pub backoff_cap_secs: u64,
}

fn default_poll_interval() -> u64 {
    2000
}
fn default_max_consecutive_errors() -> u32 {
    10
}
fn default_backoff_cap() -> u64 {
    30
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            max_consecutive_errors: default_max_consecutive_errors(),
            backoff_cap_secs: default_backoff_cap(),
        }
    }
}

impl ServiceConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn backoff_cap(&self) -> Duration {
        Duration::from_secs(self.backoff_cap_secs)
    }
}

/// When an admitted request consumes the rate-limit window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPolicy {
    /// Record the dispatch time at admission, whatever the tool does after.
    #[default]
    OnAdmit,
    /// Record the dispatch time only once the tool succeeded.
    OnSuccess,
}

impl std::fmt::Display for WindowPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OnAdmit => write!(f, "on_admit"),
            Self::OnSuccess => write!(f, "on_success"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_min_interval")]
    pub min_interval_secs: u64,

    #[serde(default)]
    pub window: WindowPolicy,
}

fn default_min_interval() -> u64 {
    10
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            min_interval_secs: default_min_interval(),
            window: WindowPolicy::default(),
        }
    }
}

impl RateLimitConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_secs(self.min_interval_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseConfig {
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,

    /// Pause between consecutive chunks of one response
    #[serde(default = "default_chunk_delay")]
    pub chunk_delay_ms: u64,

    /// How much of the tool's stderr goes into an error notice
    #[serde(default = "default_error_excerpt")]
    pub error_excerpt_chars: usize,
}

fn default_max_chunk_chars() -> usize {
    1500
}
fn default_chunk_delay() -> u64 {
    1500
}
fn default_error_excerpt() -> usize {
    300
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: default_max_chunk_chars(),
            chunk_delay_ms: default_chunk_delay(),
            error_excerpt_chars: default_error_excerpt(),
        }
    }
}

impl ResponseConfig {
    pub fn chunk_delay(&self) -> Duration {
        Duration::from_millis(self.chunk_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Append logs here in addition to stdout. An empty path means stdout only.
    #[serde(default = "default_log_file", skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_file() -> Option<PathBuf> {
    Some(AppConfig::config_dir().join("logs").join("toolbridge.log"))
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.toolbridge/config.toml).
    ///
    /// Environment overrides are applied on top, see [`AppConfig::apply_overrides`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(&Self::default_config_path())
    }

    /// Load from `path`, then apply environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.expand_paths();
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup.
    ///
    /// - `TOOLBRIDGE_RECIPIENT`, falling back to `YOUR_PHONE`
    /// - `ALLOWED_TOOLS`
    /// - `TOOLBRIDGE_BRIDGE_URL`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(recipient) = non_empty("TOOLBRIDGE_RECIPIENT").or_else(|| non_empty("YOUR_PHONE")) {
            self.recipient = Some(recipient);
        }

        if let Some(tools) = non_empty("ALLOWED_TOOLS") {
            self.executor.allowed_tools = tools;
        }

        if let Some(url) = non_empty("TOOLBRIDGE_BRIDGE_URL") {
            self.bridge.url = url;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".toolbridge")
    }

    /// Path of the default config file.
    pub fn default_config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// The recipient, or an error when none is configured.
    ///
    /// Running without one is a fatal startup condition.
    pub fn require_recipient(&self) -> Result<&str, ConfigError> {
        match self.recipient.as_deref().map(str::trim) {
            Some(r) if !r.is_empty() => Ok(r),
            _ => Err(ConfigError::MissingRecipient),
        }
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.bridge.url.starts_with("http://") && !self.bridge.url.starts_with("https://") {
            return Err(ConfigError::ValidationError(
                "bridge.url must start with http:// or https://".into(),
            ));
        }

        if self.bridge.queue.trim().is_empty() || self.bridge.queue.contains('/') {
            return Err(ConfigError::ValidationError(
                "bridge.queue must be a single non-empty path segment".into(),
            ));
        }

        if self.bridge.poll_timeout_secs == 0
            || self.bridge.probe_timeout_secs == 0
            || self.bridge.respond_timeout_secs == 0
        {
            return Err(ConfigError::ValidationError(
                "bridge timeouts must be > 0".into(),
            ));
        }

        if self.bridge.probe_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "bridge.probe_attempts must be > 0".into(),
            ));
        }

        if self.executor.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "executor.timeout_secs must be > 0".into(),
            ));
        }

        if self.executor.max_input_chars == 0 {
            return Err(ConfigError::ValidationError(
                "executor.max_input_chars must be > 0".into(),
            ));
        }

        if self.service.max_consecutive_errors == 0 {
            return Err(ConfigError::ValidationError(
                "service.max_consecutive_errors must be > 0".into(),
            ));
        }

        if self.response.max_chunk_chars == 0 {
            return Err(ConfigError::ValidationError(
                "response.max_chunk_chars must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Resolve a leading `~/` in every configured path.
    fn expand_paths(&mut self) {
        self.executor.shell = expand_home(&self.executor.shell);
        self.executor.wrapper = expand_home(&self.executor.wrapper);
        self.executor.tool_path = expand_home(&self.executor.tool_path);
        self.logging.file = match self.logging.file.take() {
            Some(file) if file.as_os_str().is_empty() => None,
            Some(file) => Some(expand_home(&file)),
            None => None,
        };
    }

    /// Generate a default config TOML string (for `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            recipient: None,
            bridge: BridgeConfig::default(),
            executor: ExecutorConfig::default(),
            service: ServiceConfig::default(),
            rate_limit: RateLimitConfig::default(),
            response: ResponseConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs_home().join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("No recipient configured: set `recipient` in config.toml or TOOLBRIDGE_RECIPIENT")]
    MissingRecipient,
}

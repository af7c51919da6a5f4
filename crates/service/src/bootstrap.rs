//! Wiring the service from configuration.

use std::sync::Arc;

use toolbridge_channels::HttpBridge;
use toolbridge_config::AppConfig;
use toolbridge_core::error::ServiceError;
use toolbridge_tools::{SubprocessExecutor, is_tool_installed};
use tracing::info;

use crate::loop_runner::BridgeService;

/// Fail unless the tool binary is present.
pub fn check_tool_installed(config: &AppConfig) -> Result<(), ServiceError> {
    let path = &config.executor.tool_path;
    if is_tool_installed(path) {
        Ok(())
    } else {
        Err(ServiceError::ToolNotInstalled {
            path: path.display().to_string(),
        })
    }
}

impl BridgeService {
    /// Build the service against the HTTP bridge and the subprocess executor.
    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        let recipient = config
            .require_recipient()
            .map_err(|e| ServiceError::Config(e.to_string()))?;

        let bridge = HttpBridge::from_config(&config.bridge)
            .map_err(|e| ServiceError::Config(e.to_string()))?;
        info!(pending = %bridge.pending_url(), respond = %bridge.respond_url(), "Bridge endpoints");

        let executor = SubprocessExecutor::from_config(&config.executor);
        info!(
            wrapper = %config.executor.wrapper.display(),
            allowed_tools = %config.executor.allowed_tools,
            timeout_secs = config.executor.timeout_secs,
            "Executor configured"
        );

        Ok(Self::new(Arc::new(bridge), Arc::new(executor), recipient, config))
    }
}

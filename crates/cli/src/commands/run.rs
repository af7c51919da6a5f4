//! `toolbridge run`: start the relay service.

use std::path::Path;

use tokio_util::sync::CancellationToken;
use toolbridge_config::AppConfig;
use toolbridge_service::{BridgeService, check_tool_installed};
use tracing::{error, info, warn};

use crate::logging;

pub async fn run(config_path: &Path, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = match AppConfig::load_with_env(config_path) {
        Ok(config) => config,
        Err(e) => {
            // No configured log file yet; report on stdout before exiting.
            logging::init("info", None, verbose)?;
            error!(path = %config_path.display(), error = %e, "Failed to load config");
            return Err(format!("Failed to load config: {e}").into());
        }
    };
    logging::init(&config.logging.level, config.logging.file.as_deref(), verbose)?;

    if let Err(e) = config.require_recipient() {
        error!("{e}");
        return Err(e.into());
    }

    if let Err(e) = check_tool_installed(&config) {
        error!(
            "{} CLI not found at {}",
            config.executor.display_name,
            config.executor.tool_path.display()
        );
        return Err(e.into());
    }

    info!(allowed_tools = %config.executor.allowed_tools, "Allowed tools");
    if config.executor.allowed_tools == "*" {
        warn!("All tools are allowed; set ALLOWED_TOOLS to restrict them");
    }

    let service = BridgeService::from_config(&config)?;
    let shutdown = CancellationToken::new();
    spawn_signal_handler(shutdown.clone());

    match service.start(shutdown).await {
        Ok(()) => {
            info!("Service stopped");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Service stopped");
            Err(e.into())
        }
    }
}

/// Cancel `shutdown` on SIGINT or SIGTERM.
fn spawn_signal_handler(shutdown: CancellationToken) {
    tokio::spawn(async move {
        wait_for_signal().await;
        info!("Received shutdown signal, finishing current work");
        shutdown.cancel();
    });
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(e) => {
            warn!(error = %e, "Failed to install SIGTERM handler");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

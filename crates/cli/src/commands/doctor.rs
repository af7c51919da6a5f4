//! `toolbridge doctor`: diagnose the installation.

use std::path::Path;

use toolbridge_channels::HttpBridge;
use toolbridge_config::AppConfig;
use toolbridge_core::bridge::Bridge;
use toolbridge_tools::is_tool_installed;

pub async fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 toolbridge Doctor: System Diagnostics");
    println!("========================================\n");

    let mut issues = 0;

    if !config_path.exists() {
        println!("  ⚠️  No config file at {}, using defaults", config_path.display());
    }

    let config = match AppConfig::load_with_env(config_path) {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  Fix the config and re-run doctor.");
            return Ok(());
        }
    };

    if config.require_recipient().is_ok() {
        println!("  ✅ Recipient configured");
    } else {
        println!("  ❌ No recipient: set `recipient` or TOOLBRIDGE_RECIPIENT");
        issues += 1;
    }

    let tool = &config.executor.tool_path;
    if is_tool_installed(tool) {
        println!("  ✅ {} CLI found at {}", config.executor.display_name, tool.display());
    } else {
        println!("  ❌ {} CLI not found at {}", config.executor.display_name, tool.display());
        issues += 1;
    }

    let wrapper = &config.executor.wrapper;
    if wrapper.is_file() {
        println!("  ✅ Wrapper script found at {}", wrapper.display());
    } else {
        println!("  ❌ Wrapper script missing at {}", wrapper.display());
        issues += 1;
    }

    match HttpBridge::from_config(&config.bridge) {
        Ok(bridge) => match bridge.health().await {
            Ok(()) => println!("  ✅ Bridge reachable at {}", bridge.pending_url()),
            Err(e) => {
                println!("  ⚠️  Bridge not reachable: {e}");
                issues += 1;
            }
        },
        Err(e) => {
            println!("  ❌ Bridge client error: {e}");
            issues += 1;
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}

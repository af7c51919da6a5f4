//! `toolbridge status`: show the effective configuration.

use std::path::Path;

use toolbridge_config::AppConfig;

pub async fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config =
        AppConfig::load_with_env(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    println!("🌉 toolbridge Status");
    println!("====================");
    println!("  Config file:    {}", config_path.display());
    println!(
        "  Recipient:      {}",
        if config.require_recipient().is_ok() { "configured" } else { "missing" }
    );
    println!("  Bridge:         {}/api/{}", config.bridge.url, config.bridge.queue);
    println!("  Tool:           {} ({})", config.executor.display_name, config.executor.tool_path.display());
    println!(
        "  Wrapper:        {} {}",
        config.executor.shell.display(),
        config.executor.wrapper.display()
    );
    println!("  Allowed tools:  {}", config.executor.allowed_tools);
    println!("  Tool timeout:   {}s", config.executor.timeout_secs);
    println!("  Poll interval:  {}ms", config.service.poll_interval_ms);
    println!("  Rate limit:     {}s ({})", config.rate_limit.min_interval_secs, config.rate_limit.window);
    println!("  Chunk size:     {} chars", config.response.max_chunk_chars);
    match &config.logging.file {
        Some(file) => println!("  Log file:       {}", file.display()),
        None => println!("  Log file:       (stdout only)"),
    }

    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file, using defaults. Run `toolbridge init` to create one");
    }

    Ok(())
}

//! `toolbridge init`: write a default config file.

use std::path::Path;

use toolbridge_config::AppConfig;

pub async fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("🌉 toolbridge: First-Time Setup");
    println!("===============================\n");

    if let Some(dir) = config_path.parent() {
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
            println!("✅ Created config directory: {}", dir.display());
        }
    }

    let log_dir = AppConfig::config_dir().join("logs");
    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)?;
        println!("✅ Created log directory: {}", log_dir.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run init.\n");
        return Ok(());
    }

    std::fs::write(config_path, AppConfig::default_toml())?;
    println!("✅ Created config.toml at: {}", config_path.display());
    println!("\n📝 Next steps:");
    println!("   1. Set `recipient` in {} (or export TOOLBRIDGE_RECIPIENT)", config_path.display());
    println!("   2. Put the executor wrapper script at the configured `executor.wrapper` path");
    println!("   3. Run: toolbridge doctor");
    println!("   4. Run: toolbridge run\n");

    Ok(())
}

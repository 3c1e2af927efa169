//! `rosterhub init` — write a default config file.

use rosterhub_config::AppConfig;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("Created config directory: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("Config already exists at: {}", config_path.display());
        println!("Edit it manually or delete and re-run init.");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("Created config.toml at: {}", config_path.display());
    println!();
    println!("Next steps:");
    println!("  1. Set an API key: export ROSTERHUB_API_KEY=sk-or-...");
    println!("     (OPENROUTER_API_KEY and OPENAI_API_KEY also work)");
    println!("  2. Start the server: rosterhub serve");

    Ok(())
}

//! Show or initialize the configuration file.

use scoretrack_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, init: bool) -> anyhow::Result<()> {
    if init {
        let path = config_file_path();
        if path.exists() {
            anyhow::bail!("Config already exists: {}", path.display());
        }
        let path = AppConfig::default()
            .save()
            .map_err(|e| anyhow::anyhow!("Failed to write config: {e}"))?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {e}"))?;
    println!("# {}", config_file_path().display());
    println!("{json}");
    Ok(())
}

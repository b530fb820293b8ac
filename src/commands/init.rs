use anyhow::{Context, Result};
use faq_harvest::config::{Config, DEFAULT_CONFIG_FILE};
use std::path::PathBuf;

pub fn init_config(path: PathBuf) -> Result<()> {
    let config_path = if path.extension().is_some_and(|ext| ext == "toml") {
        path
    } else {
        path.join(DEFAULT_CONFIG_FILE)
    };

    if config_path.exists() {
        anyhow::bail!("Configuration file already exists: {}", config_path.display());
    }
    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let toml_content = format!("# faq-harvest configuration\n\n{}", Config::default().to_toml()?);
    std::fs::write(&config_path, toml_content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Created configuration file: {}", config_path.display());

    Ok(())
}

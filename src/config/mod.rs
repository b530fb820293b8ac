//! Configuration for faq-harvest

mod logging;
mod scraping;

pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use scraping::{ScrapingConfig, DEFAULT_BASE_URL, DEFAULT_INDEX_URL};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "faq-harvest.toml";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Crawl configuration
    #[serde(default)]
    pub scraping: ScrapingConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate all configuration fields.
    ///
    /// Collects all validation errors and reports them together.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();
        let scraping = &self.scraping;

        if scraping.max_workers == 0 {
            errors.push("max_workers must be positive".to_string());
        }
        if scraping.max_retries == 0 {
            errors.push("max_retries must be positive".to_string());
        }
        if scraping.checkpoint_interval == 0 {
            errors.push("checkpoint_interval must be positive".to_string());
        }
        if scraping.request_timeout_secs == 0 {
            errors.push("request_timeout_secs must be positive".to_string());
        }
        if let Err(e) = check_http_url(&scraping.base_url) {
            errors.push(format!("base_url {}", e));
        }
        if let Err(e) = check_http_url(&scraping.index_url) {
            errors.push(format!("index_url {}", e));
        }
        if scraping.output_path.as_os_str().is_empty() {
            errors.push("output_path must not be empty".to_string());
        }
        if scraping.checkpoint_path.as_os_str().is_empty() {
            errors.push("checkpoint_path must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }
    }
}

fn check_http_url(raw: &str) -> std::result::Result<(), String> {
    let url = Url::parse(raw).map_err(|e| format!("'{}' is not a valid URL: {}", raw, e))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("'{}' must use http or https, not {}", raw, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_passes_validation() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn default_config_values() {
        let cfg = Config::default();
        assert_eq!(cfg.scraping.max_workers, 5);
        assert_eq!(cfg.scraping.max_retries, 3);
        assert_eq!(cfg.scraping.request_timeout_secs, 30);
        assert_eq!(cfg.scraping.checkpoint_interval, 10);
        assert_eq!(cfg.scraping.base_url, "https://wise.com");
        assert_eq!(cfg.logging.level, LogLevel::Info);
    }

    #[test]
    fn validate_rejects_zero_workers() {
        let mut cfg = Config::default();
        cfg.scraping.max_workers = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("max_workers must be positive"));
    }

    #[test]
    fn validate_rejects_non_http_index() {
        let mut cfg = Config::default();
        cfg.scraping.index_url = "ftp://example.com/topics".to_string();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("must use http or https"));
    }

    #[test]
    fn validate_collects_multiple_errors() {
        let mut cfg = Config::default();
        cfg.scraping.max_workers = 0;
        cfg.scraping.checkpoint_interval = 0;
        cfg.scraping.base_url = "not a url".to_string();

        let msg = cfg.validate().unwrap_err().to_string();
        assert!(msg.contains("max_workers"));
        assert!(msg.contains("checkpoint_interval"));
        assert!(msg.contains("base_url"));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("faq-harvest.toml");
        std::fs::write(&path, "[scraping]\nmax_workers = 8\n\n[logging]\nformat = \"json\"\n").unwrap();

        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.scraping.max_workers, 8);
        assert_eq!(cfg.scraping.max_retries, 3);
        assert_eq!(cfg.logging.format, LogFormat::Json);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.scraping.output_path, std::path::PathBuf::from("wise_help_content.csv"));
    }

    #[test]
    fn generated_toml_round_trips() {
        let toml = Config::default().to_toml().unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.scraping.index_url, DEFAULT_INDEX_URL);
    }
}

//! Configuration management for EvBoard
//!
//! Loads from YAML files + environment variables via .env

use anyhow::{bail, Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub report: ReportConfig,
    pub persistence: PersistenceConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Feed file (JSON or YAML); unset means the built-in sample batch
    pub path: Option<String>,
    /// Watch-mode refresh interval in seconds
    pub refresh_interval_secs: u64,
    /// Substitute the sample batch when the feed has never loaded
    pub fallback_to_sample: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// "text" or "json"
    pub format: String,
    /// Rows to print, 0 for all
    pub top: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersistenceConfig {
    /// Directory for automatic CSV exports
    pub export_dir: String,
    /// Append every summary to `<export_dir>/rankings.csv`
    pub csv_enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Default filter when RUST_LOG is unset
    pub level: String,
    /// JSON lines instead of human-readable output
    pub json: bool,
}

impl AppConfig {
    /// Load configuration from `.env`, files and environment, with an
    /// optional extra file layered on top
    pub fn load(extra: Option<&Path>) -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();
        Self::load_with(extra)
    }

    /// Layers `config/default`, `config/local`, the extra file and `EVBOARD__*`
    /// without touching `.env`.
    pub fn load_with(extra: Option<&Path>) -> Result<Self> {
        let mut builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = extra {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            // Override with environment variables (EVBOARD__*)
            .add_source(Environment::with_prefix("EVBOARD").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config.validate()?;
        Ok(app_config)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        let builder = Config::builder()
            // Feed defaults
            .set_default("feed.refresh_interval_secs", 60)?
            .set_default("feed.fallback_to_sample", true)?
            // Report defaults
            .set_default("report.format", "text")?
            .set_default("report.top", 0)?
            // Persistence defaults
            .set_default("persistence.export_dir", "./data")?
            .set_default("persistence.csv_enabled", false)?
            // Log defaults
            .set_default("log.level", "info")?
            .set_default("log.json", false)?;
        Ok(builder)
    }

    /// Generate a digest of the config for logging
    pub fn digest(&self) -> String {
        format!(
            "feed={} refresh={}s fallback={} format={} top={} csv={}",
            self.feed.path.as_deref().unwrap_or("<sample>"),
            self.feed.refresh_interval_secs,
            self.feed.fallback_to_sample,
            self.report.format,
            self.report.top,
            self.persistence.csv_enabled
        )
    }

    /// Reject values the binary cannot act on
    pub fn validate(&self) -> Result<()> {
        if self.feed.refresh_interval_secs == 0 {
            bail!("feed.refresh_interval_secs must be greater than 0");
        }

        match self.report.format.as_str() {
            "text" | "json" => {}
            other => bail!("report.format must be \"text\" or \"json\", got {:?}", other),
        }

        Ok(())
    }
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digest())
    }
}

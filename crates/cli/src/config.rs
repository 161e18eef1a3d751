//! CLI configuration: defaults, optional file, then `BACKOFFICE_*` variables

use anyhow::{Context, Result};
use backoffice_http::Locale;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub health: HealthSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Root URL of the backoffice API
    pub base_url: String,
    /// Per-request timeout in seconds (0 = none)
    pub timeout_secs: u64,
    /// Language of error messages
    pub locale: Locale,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
            locale: Locale::En,
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSettings {
    /// Seconds between two polls of `health --watch`
    pub interval_secs: u64,
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self { interval_secs: 30 }
    }
}

impl HealthSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

impl Settings {
    /// Load settings.
    ///
    /// `explicit` must exist when given; `fallback` is read only if present.
    pub fn load(explicit: Option<&Path>, fallback: &Path) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path));
        } else if fallback.exists() {
            builder = builder.add_source(File::from(fallback).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix("BACKOFFICE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder.build().context("Failed to load configuration")?;
        settings
            .try_deserialize()
            .context("Invalid configuration")
    }
}

/// Write the default settings as TOML
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let content = toml::to_string_pretty(&Settings::default())?;
    std::fs::write(path, content)?;
    Ok(())
}

use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::info;

pub mod defaults;
pub mod duration_serde;

use crate::errors::{AppError, AppResult};
use defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub youtube: YouTubeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    pub max_connections: Option<u32>,
}

/// Metadata cache behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// How long fetched metadata stays fresh before the provider is asked again
    #[serde(default = "default_freshness_window", with = "duration_serde::duration")]
    pub freshness_window: Duration,
    /// Upper bound on a single provider call
    #[serde(default = "default_provider_timeout", with = "duration_serde::duration")]
    pub provider_timeout: Duration,
    /// Resolve both videos in the background right after a pair is submitted
    #[serde(default = "default_warm_up_on_submit")]
    pub warm_up_on_submit: bool,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct YouTubeConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_youtube_base_url")]
    pub base_url: String,
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

fn default_freshness_window() -> Duration {
    Duration::from_secs(DEFAULT_FRESHNESS_WINDOW_SECS)
}

fn default_provider_timeout() -> Duration {
    Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS)
}

fn default_warm_up_on_submit() -> bool {
    DEFAULT_WARM_UP_ON_SUBMIT
}

fn default_youtube_base_url() -> String {
    DEFAULT_YOUTUBE_BASE_URL.to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: Some(DEFAULT_MAX_CONNECTIONS),
        }
    }
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            freshness_window: default_freshness_window(),
            provider_timeout: default_provider_timeout(),
            warm_up_on_submit: default_warm_up_on_submit(),
        }
    }
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_youtube_base_url(),
        }
    }
}

// The API key must never end up in logs.
impl fmt::Debug for YouTubeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YouTubeConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl MetadataConfig {
    pub fn validate(&self) -> AppResult<()> {
        if self.freshness_window.is_zero() {
            return Err(AppError::configuration(
                "metadata.freshness_window must be greater than zero",
            ));
        }
        if self.provider_timeout.is_zero() {
            return Err(AppError::configuration(
                "metadata.provider_timeout must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration layered as defaults, then the TOML file (if it
    /// exists), then `CLIPVOTE_*` environment variables.
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if std::path::Path::new(config_file).exists() {
            info!("Loading configuration from {}", config_file);
            figment = figment.merge(Toml::file(config_file));
        } else {
            info!("Config file {} not found, using defaults", config_file);
        }

        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load configuration from {config_file}"))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.database.url.trim().is_empty() {
            return Err(AppError::configuration("database.url must not be empty"));
        }
        if self.database.max_connections == Some(0) {
            return Err(AppError::configuration(
                "database.max_connections must be at least 1",
            ));
        }
        self.metadata.validate()
    }

    /// Effective configuration as TOML with secrets redacted
    pub fn to_redacted_toml(&self) -> Result<String> {
        let mut redacted = self.clone();
        if redacted.youtube.api_key.is_some() {
            redacted.youtube.api_key = Some("***".to_string());
        }
        Ok(toml::to_string_pretty(&redacted)?)
    }
}

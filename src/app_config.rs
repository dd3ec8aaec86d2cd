use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Upper bound for the per-attempt deadline
pub const MAX_TIMEOUT_MS: u64 = 300_000;

/// Upper bound for extra attempts per endpoint
pub const MAX_RETRY_COUNT: u32 = 10;

/// Upper bound for the backoff unit
pub const MAX_RETRY_BACKOFF_MS: u64 = 60_000;

/// Application configuration module
/// This module handles loading, validating and saving the configuration
/// that the translator and batch orchestrator are built from. It is read
/// once at startup and treated as read-only afterwards.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Remote translation endpoint
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EndpointConfig {
    /// Name used in logs
    pub name: String,

    /// Full URL that receives the POST
    pub url: String,
}

impl EndpointConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Remote endpoints in fallback order
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<EndpointConfig>,

    /// Use the offline phrase table once every endpoint has failed
    #[serde(default = "default_true")]
    pub offline_fallback: bool,

    /// User-Agent header sent to providers
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-attempt deadline in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Additional attempts per endpoint after the first one
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff unit in milliseconds, multiplied by the attempt number
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Pause between search results in a batch
    #[serde(default = "default_result_delay_ms")]
    pub result_delay_ms: u64,

    /// Pause between sentences of a summary
    #[serde(default = "default_sentence_delay_ms")]
    pub sentence_delay_ms: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoints: default_endpoints(),
            offline_fallback: true,
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            result_delay_ms: default_result_delay_ms(),
            sentence_delay_ms: default_sentence_delay_ms(),
        }
    }
}

impl TranslationConfig {
    /// Configuration with every delay set to zero, for tests and scripted runs
    pub fn without_delays(mut self) -> Self {
        self.retry_backoff_ms = 0;
        self.result_delay_ms = 0;
        self.sentence_delay_ms = 0;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn result_delay(&self) -> Duration {
        Duration::from_millis(self.result_delay_ms)
    }

    pub fn sentence_delay(&self) -> Duration {
        Duration::from_millis(self.sentence_delay_ms)
    }

    /// Check endpoint URLs and timing values
    pub fn validate(&self) -> Result<()> {
        if self.endpoints.is_empty() && !self.offline_fallback {
            return Err(anyhow!("At least one endpoint or the offline fallback must be enabled"));
        }

        for endpoint in &self.endpoints {
            let url = Url::parse(&endpoint.url)
                .with_context(|| format!("Invalid URL for endpoint '{}': {}", endpoint.name, endpoint.url))?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(anyhow!("Endpoint '{}' must use http or https", endpoint.name));
            }
        }

        if self.timeout_ms == 0 || self.timeout_ms > MAX_TIMEOUT_MS {
            return Err(anyhow!("timeout_ms must be between 1 and {}", MAX_TIMEOUT_MS));
        }

        if self.retry_count > MAX_RETRY_COUNT {
            return Err(anyhow!("retry_count must be at most {}", MAX_RETRY_COUNT));
        }

        if self.retry_backoff_ms > MAX_RETRY_BACKOFF_MS {
            return Err(anyhow!("retry_backoff_ms must be at most {}", MAX_RETRY_BACKOFF_MS));
        }

        Ok(())
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "fr".to_string()
}

fn default_endpoints() -> Vec<EndpointConfig> {
    vec![
        // trailing slash avoids a 301 from the public instance
        EndpointConfig::new("libretranslate", "https://libretranslate.de/translate/"),
        EndpointConfig::new("libretranslate-direct", "https://libretranslate.de/translate"),
    ]
}

fn default_user_agent() -> String {
    "LuminaSearch/1.0".to_string()
}

fn default_timeout_ms() -> u64 {
    3_000
}

fn default_retry_count() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    1_000 // 1s, 2s, ...
}

fn default_result_delay_ms() -> u64 {
    200
}

fn default_sentence_delay_ms() -> u64 {
    100
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Write as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path.as_ref(), json)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::validate_language_code(&self.source_language)
            .context("Invalid source language")?;
        crate::language_utils::validate_language_code(&self.target_language)
            .context("Invalid target language")?;

        self.translation.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

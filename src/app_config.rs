use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Settings file for the chapterglot CLI: Gemini access, retry waits,
/// review packet size and chapter fetching. Every section is optional.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Gemini API settings
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Delays used while the API is busy or over quota
    #[serde(default)]
    pub retry: RetryConfig,

    /// Glossary review settings
    #[serde(default)]
    pub glossary: GlossaryConfig,

    /// Chapter fetch settings
    #[serde(default)]
    pub ingestion: IngestionConfig,

    /// SQLite database file; the platform data directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Gemini API configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeminiConfig {
    // @field: Model name
    #[serde(default = "default_gemini_model")]
    pub model: String,

    // @field: Service URL
    #[serde(default = "default_gemini_endpoint")]
    pub endpoint: String,

    // @field: API key, falls back to the stored key when empty
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            endpoint: default_gemini_endpoint(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Retry delays for transient API conditions
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RetryConfig {
    // @field: Wait after HTTP 503, in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub busy_delay_ms: u64,

    // @field: Wait after HTTP 429 without a usable retryDelay, in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub default_quota_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            busy_delay_ms: default_retry_delay_ms(),
            default_quota_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Glossary review configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GlossaryConfig {
    // @field: Context lines collected per review packet
    #[serde(default = "default_context_samples")]
    pub context_samples: usize,
}

impl Default for GlossaryConfig {
    fn default() -> Self {
        Self {
            context_samples: default_context_samples(),
        }
    }
}

/// Chapter fetch configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IngestionConfig {
    // @field: Charset used to decode fetched pages
    #[serde(default = "default_charset")]
    pub charset: String,

    // @field: Pause between two fetches, in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    // @field: CSS selector of the chapter text inside a fetched page
    #[serde(default = "default_selector")]
    pub selector: String,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            charset: default_charset(),
            interval_ms: default_interval_ms(),
            selector: default_selector(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash-lite-preview-06-17".to_string()
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_retry_delay_ms() -> u64 {
    5000
}

fn default_context_samples() -> usize {
    crate::glossary::DEFAULT_CONTEXT_SAMPLES
}

fn default_charset() -> String {
    "gbk".to_string()
}

fn default_interval_ms() -> u64 {
    5000
}

fn default_selector() -> String {
    ".txtnav".to_string()
}

impl Config {
    /// Load the configuration at `path`, writing defaults when it is missing
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let file = File::open(path)
                .context(format!("Failed to open config file: {}", path.display()))?;

            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .context(format!("Failed to parse config file: {}", path.display()))?;

            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());

        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .context(format!("Failed to write config to file: {}", path.display()))?;

        Ok(())
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.gemini.model.trim().is_empty() {
            return Err(anyhow!("Gemini model name is required"));
        }

        url::Url::parse(&self.gemini.endpoint)
            .map_err(|e| anyhow!("Invalid Gemini endpoint '{}': {}", self.gemini.endpoint, e))?;

        if self.gemini.timeout_secs == 0 {
            return Err(anyhow!("Gemini timeout must be greater than zero"));
        }

        if self.glossary.context_samples == 0 {
            return Err(anyhow!("Context sample count must be greater than zero"));
        }

        if self.ingestion.charset.trim().is_empty() {
            return Err(anyhow!("Ingestion charset is required"));
        }

        scraper::Selector::parse(&self.ingestion.selector).map_err(|e| {
            anyhow!("Invalid chapter selector '{}': {}", self.ingestion.selector, e)
        })?;

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            gemini: GeminiConfig::default(),
            retry: RetryConfig::default(),
            glossary: GlossaryConfig::default(),
            ingestion: IngestionConfig::default(),
            storage_path: None,
            log_level: LogLevel::default(),
        }
    }
}

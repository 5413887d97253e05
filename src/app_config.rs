/*!
 * Application configuration.
 *
 * Handles loading, validating and saving the JSON configuration. Every field
 * has a serde default so a partial file is enough; a missing file is created
 * with defaults on first run.
 */

use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::extraction::{KnownVillage, PartyResolverKind, SegmentationStrategy, default_known_villages};

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Segmentation and field extraction settings
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Translation provider settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Where records are stored
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Segmentation and field extraction settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExtractionConfig {
    /// Entry boundary strategy
    #[serde(default)]
    pub segmentation: SegmentationStrategy,

    /// Blocks with this many characters or fewer are treated as noise
    #[serde(default = "default_min_block_chars")]
    pub min_block_chars: usize,

    /// Scan the whole text for document numbers when no block survives
    #[serde(default = "default_true")]
    pub scan_fallback: bool,

    /// Seller/buyer assignment strategy
    #[serde(default)]
    pub party_resolver: PartyResolverKind,

    /// Villages recognized by name without a label
    #[serde(default = "default_known_villages")]
    pub known_villages: Vec<KnownVillage>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            segmentation: SegmentationStrategy::default(),
            min_block_chars: default_min_block_chars(),
            scan_fallback: true,
            party_resolver: PartyResolverKind::default(),
            known_villages: default_known_villages(),
        }
    }
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    /// Managed translation API (Google Cloud Translation v2)
    #[default]
    Google,
    /// Chat completions
    OpenAI,
    /// Messages API
    Anthropic,
    /// Local transliteration only, no network
    Offline,
}

impl TranslationProvider {
    pub fn display_name(&self) -> &str {
        match self {
            Self::Google => "Google Translate",
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Offline => "Offline",
        }
    }

    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Google => "google".to_string(),
            Self::OpenAI => "openai".to_string(),
            Self::Anthropic => "anthropic".to_string(),
            Self::Offline => "offline".to_string(),
        }
    }

    /// Whether the provider calls a remote service
    pub fn is_remote(&self) -> bool {
        !matches!(self, Self::Offline)
    }

    /// Environment variable consulted when the config has no API key
    pub fn api_key_env_var(&self) -> Option<&'static str> {
        match self {
            Self::Google => Some("GOOGLE_TRANSLATE_API_KEY"),
            Self::OpenAI => Some("OPENAI_API_KEY"),
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::Offline => None,
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            "offline" => Ok(Self::Offline),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration entry
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    /// Model name, for language-model providers
    #[serde(default = "String::new")]
    pub model: String,

    /// API key; empty means "read the environment"
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service base URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::Google => Self {
                provider_type: "google".to_string(),
                model: String::new(),
                api_key: String::new(),
                endpoint: default_google_endpoint(),
                timeout_secs: default_timeout_secs(),
            },
            TranslationProvider::OpenAI => Self {
                provider_type: "openai".to_string(),
                model: default_openai_model(),
                api_key: String::new(),
                endpoint: default_openai_endpoint(),
                timeout_secs: default_timeout_secs(),
            },
            TranslationProvider::Anthropic => Self {
                provider_type: "anthropic".to_string(),
                model: default_anthropic_model(),
                api_key: String::new(),
                endpoint: default_anthropic_endpoint(),
                timeout_secs: default_timeout_secs(),
            },
            TranslationProvider::Offline => Self {
                provider_type: "offline".to_string(),
                model: String::new(),
                api_key: String::new(),
                endpoint: String::new(),
                timeout_secs: default_timeout_secs(),
            },
        }
    }
}

/// How translation requests are spaced out
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PacingMode {
    /// One record at a time, delay after each
    #[default]
    Sequential,
    /// Fixed-size batches in parallel, delay after each batch
    Batched,
}

/// What a name becomes when the provider fails on it
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    #[default]
    Transliterate,
    LeaveUnset,
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Sequential or batched requests
    #[serde(default)]
    pub pacing: PacingMode,

    /// Records per batch when batched
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Delay after each record or batch, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Name fallback when the provider fails
    #[serde(default)]
    pub fallback: FallbackPolicy,

    /// Also translate village, boundary details and schedule remarks
    #[serde(default = "default_true")]
    pub translate_place_fields: bool,

    /// Temperature for language-model providers (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// System prompt for language-model providers.
    /// Placeholder: {field}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            pacing: PacingMode::default(),
            batch_size: default_batch_size(),
            delay_ms: default_delay_ms(),
            fallback: FallbackPolicy::default(),
            translate_place_fields: true,
            temperature: default_temperature(),
            system_prompt: default_system_prompt(),
        }
    }
}

/// Storage settings
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct StorageConfig {
    /// SQLite file; `None` uses the platform data directory
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
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

fn default_min_block_chars() -> usize {
    80
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_batch_size() -> usize {
    10
}

fn default_delay_ms() -> u64 {
    100
}

fn default_temperature() -> f32 {
    0.3
}

fn default_true() -> bool {
    true
}

fn default_google_endpoint() -> String {
    "https://translation.googleapis.com".to_string()
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_openai_model() -> String {
    "gpt-4".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

fn default_system_prompt() -> String {
    "You are a Tamil to English translator specializing in Indian real estate documents. \
     Translate the given Tamil text to English. For names, use transliteration that preserves \
     the original pronunciation. For places and common terms, use standard English equivalents. \
     Context: this is a {field} from a Tamil Nadu property transaction document. \
     Return ONLY the translated text, nothing else."
        .to_string()
}

impl Config {
    /// Load the configuration file, creating it with defaults when absent
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let file = File::open(path).context(format!("Failed to open config file: {:?}", path))?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).context(format!("Failed to parse config file: {:?}", path))
        } else {
            warn!("Config file not found at {:?}, creating default config.", path);
            let config = Config::default();
            config.save(path)?;
            Ok(config)
        }
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, json).context(format!("Failed to write config file: {:?}", path))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.extraction.min_block_chars == 0 {
            return Err(anyhow!("extraction.min_block_chars must be greater than zero"));
        }

        let common = &self.translation.common;
        if common.batch_size == 0 {
            return Err(anyhow!("translation.common.batch_size must be greater than zero"));
        }
        if !(0.0..=1.0).contains(&common.temperature) {
            return Err(anyhow!("translation.common.temperature must be between 0.0 and 1.0"));
        }

        let provider = self.translation.provider;
        if provider.is_remote() {
            if self.translation.get_api_key().is_empty() {
                return Err(anyhow!(
                    "Translation API key is required for {} provider (set it in the config or {})",
                    provider.display_name(),
                    provider.api_key_env_var().unwrap_or("the environment")
                ));
            }

            let endpoint = self.translation.get_endpoint();
            url::Url::parse(&endpoint).context(format!("Invalid endpoint URL for {}: {}", provider, endpoint))?;
        }

        Ok(())
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter().find(|p| p.provider_type == provider_str)
    }

    /// Mutable access to the active provider entry, created when missing
    pub fn active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider_str = self.provider.to_lowercase_string();
        let idx = match self.available_providers.iter().position(|p| p.provider_type == provider_str) {
            Some(idx) => idx,
            None => {
                self.available_providers.push(ProviderConfig::new(self.provider));
                self.available_providers.len() - 1
            }
        };
        &mut self.available_providers[idx]
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        match self.provider {
            TranslationProvider::OpenAI => default_openai_model(),
            TranslationProvider::Anthropic => default_anthropic_model(),
            TranslationProvider::Google | TranslationProvider::Offline => String::new(),
        }
    }

    /// Get the API key for the active provider, falling back to its
    /// environment variable
    pub fn get_api_key(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.api_key.is_empty() {
                return provider_config.api_key.clone();
            }
        }

        self.provider
            .api_key_env_var()
            .and_then(|var| std::env::var(var).ok())
            .unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        match self.provider {
            TranslationProvider::Google => default_google_endpoint(),
            TranslationProvider::OpenAI => default_openai_endpoint(),
            TranslationProvider::Anthropic => default_anthropic_endpoint(),
            TranslationProvider::Offline => String::new(),
        }
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout(&self) -> Duration {
        let secs = self
            .get_active_provider_config()
            .map(|p| p.timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or_else(default_timeout_secs);
        Duration::from_secs(secs)
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::Google),
                ProviderConfig::new(TranslationProvider::OpenAI),
                ProviderConfig::new(TranslationProvider::Anthropic),
                ProviderConfig::new(TranslationProvider::Offline),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}

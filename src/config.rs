//! Configuration management for Mikoko Guardian
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::domain::CarbonPricing;
use crate::error::{MikokoError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Mikoko Guardian
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Model back end configuration
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Sampling settings sent with every completion request
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Agent behavior configuration
    #[serde(default)]
    pub agent: AgentConfig,
    /// Carbon credit pricing
    #[serde(default)]
    pub carbon: CarbonConfig,
    /// Cloud deployment identifiers (not used by the core logic)
    #[serde(default)]
    pub deployment: DeploymentConfig,
}

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,
}

fn default_provider_type() -> String {
    "ollama".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            ollama: OllamaConfig::default(),
        }
    }
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use for Ollama
    #[serde(default = "default_ollama_model")]
    pub model: String,

    /// HTTP timeout for a single completion request (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:latest".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

/// Sampling configuration
///
/// Defaults keep answers short and mostly deterministic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Sampling temperature (0.0-2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum number of tokens in a single model reply
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_output_tokens() -> u32 {
    250
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

/// Agent behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum number of model round-trips per user turn
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,

    /// Timeout for one user turn (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Conversation management settings
    #[serde(default)]
    pub conversation: ConversationConfig,

    /// Tool execution settings
    #[serde(default)]
    pub tools: ToolsConfig,
}

fn default_max_turns() -> usize {
    10
}

fn default_timeout() -> u64 {
    300
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            timeout_seconds: default_timeout(),
            conversation: ConversationConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

/// Conversation management configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Maximum tokens allowed in conversation context
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Minimum number of turns to retain when pruning
    #[serde(default = "default_min_retain")]
    pub min_retain_turns: usize,

    /// Token threshold to trigger pruning (fraction of max_tokens)
    #[serde(default = "default_prune_threshold")]
    pub prune_threshold: f32,
}

fn default_max_tokens() -> usize {
    32_000
}

fn default_min_retain() -> usize {
    5
}

fn default_prune_threshold() -> f32 {
    0.8
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            min_retain_turns: default_min_retain(),
            prune_threshold: default_prune_threshold(),
        }
    }
}

/// Tool execution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Maximum size of tool output handed back to the model (bytes)
    #[serde(default = "default_max_output")]
    pub max_output_size: usize,
}

fn default_max_output() -> usize {
    65_536 // 64 KB
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            max_output_size: default_max_output(),
        }
    }
}

/// Carbon credit pricing configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CarbonConfig {
    /// USD per tonne of CO2 equivalent
    #[serde(default = "default_credit_price")]
    pub credit_price_usd: f64,
}

fn default_credit_price() -> f64 {
    crate::domain::carbon::DEFAULT_CREDIT_PRICE_USD
}

impl Default for CarbonConfig {
    fn default() -> Self {
        Self {
            credit_price_usd: default_credit_price(),
        }
    }
}

impl CarbonConfig {
    /// Pricing handed to the carbon calculator
    pub fn pricing(&self) -> CarbonPricing {
        CarbonPricing {
            credit_price_usd: self.credit_price_usd,
        }
    }
}

/// Cloud deployment identifiers
///
/// Only the deployment tooling reads these; they are carried here so
/// `mikoko config` can show what the environment resolved to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Cloud project identifier
    #[serde(default)]
    pub project_id: Option<String>,

    /// Cloud region or location
    #[serde(default)]
    pub location: Option<String>,

    /// Storage bucket used for staging packaged agents
    #[serde(default)]
    pub storage_bucket: Option<String>,
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default_config()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn default_config() -> Self {
        Self {
            provider: ProviderConfig::default(),
            generation: GenerationConfig::default(),
            agent: AgentConfig::default(),
            carbon: CarbonConfig::default(),
            deployment: DeploymentConfig::default(),
        }
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| MikokoError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| MikokoError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider_type) = std::env::var("MIKOKO_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(ollama_host) = std::env::var("MIKOKO_OLLAMA_HOST") {
            self.provider.ollama.host = ollama_host;
        }

        if let Ok(ollama_model) = std::env::var("MIKOKO_OLLAMA_MODEL") {
            self.provider.ollama.model = ollama_model;
        }

        if let Ok(max_turns) = std::env::var("MIKOKO_MAX_TURNS") {
            if let Ok(value) = max_turns.parse() {
                self.agent.max_turns = value;
            } else {
                tracing::warn!("Invalid MIKOKO_MAX_TURNS: {}", max_turns);
            }
        }

        if let Ok(timeout) = std::env::var("MIKOKO_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.agent.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid MIKOKO_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(temperature) = std::env::var("MIKOKO_TEMPERATURE") {
            match temperature.parse::<f32>() {
                Ok(v) => self.generation.temperature = v,
                Err(_) => tracing::warn!("Invalid MIKOKO_TEMPERATURE: {}", temperature),
            }
        }

        if let Ok(max_output) = std::env::var("MIKOKO_MAX_OUTPUT_TOKENS") {
            match max_output.parse::<u32>() {
                Ok(v) => self.generation.max_output_tokens = v,
                Err(_) => tracing::warn!("Invalid MIKOKO_MAX_OUTPUT_TOKENS: {}", max_output),
            }
        }

        if let Ok(price) = std::env::var("MIKOKO_CREDIT_PRICE_USD") {
            match price.parse::<f64>() {
                Ok(v) => {
                    self.carbon.credit_price_usd = v;
                    tracing::debug!(credit_price_usd = v, "Env override: MIKOKO_CREDIT_PRICE_USD");
                }
                Err(_) => tracing::warn!("Invalid MIKOKO_CREDIT_PRICE_USD: {}", price),
            }
        }

        // Deployment identifiers use the cloud SDK's conventional names
        if let Ok(project) = std::env::var("GOOGLE_CLOUD_PROJECT") {
            self.deployment.project_id = Some(project);
        }
        if let Ok(location) = std::env::var("GOOGLE_CLOUD_LOCATION") {
            self.deployment.location = Some(location);
        }
        if let Ok(bucket) = std::env::var("GOOGLE_CLOUD_STORAGE_BUCKET") {
            self.deployment.storage_bucket = Some(bucket);
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(model) = &cli.model {
            tracing::debug!("Using model override from CLI: {}", model);
            self.provider.ollama.model = model.clone();
        }
    }

    /// Validate the configuration
    ///
    /// Ensures all configuration values are within acceptable ranges
    /// and that required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `MikokoError::Config` naming the first invalid field
    pub fn validate(&self) -> Result<()> {
        let valid_providers = ["ollama"];
        if !valid_providers.contains(&self.provider.provider_type.as_str()) {
            return Err(MikokoError::Config(format!(
                "Invalid provider type: '{}'. Must be one of: {}",
                self.provider.provider_type,
                valid_providers.join(", ")
            ))
            .into());
        }

        if self.provider.ollama.host.trim().is_empty() {
            return Err(
                MikokoError::Config("provider.ollama.host cannot be empty".to_string()).into(),
            );
        }

        if self.provider.ollama.request_timeout_seconds == 0 {
            return Err(MikokoError::Config(
                "provider.ollama.request_timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(MikokoError::Config(
                "generation.temperature must be between 0.0 and 2.0".to_string(),
            )
            .into());
        }

        if self.generation.max_output_tokens == 0 {
            return Err(MikokoError::Config(
                "generation.max_output_tokens must be greater than 0".to_string(),
            )
            .into());
        }

        if self.agent.max_turns == 0 {
            return Err(
                MikokoError::Config("max_turns must be greater than 0".to_string()).into(),
            );
        }

        if self.agent.max_turns > 100 {
            return Err(MikokoError::Config(
                "max_turns must be less than or equal to 100".to_string(),
            )
            .into());
        }

        if self.agent.timeout_seconds == 0 {
            return Err(
                MikokoError::Config("timeout_seconds must be greater than 0".to_string()).into(),
            );
        }

        if self.agent.conversation.max_tokens == 0 {
            return Err(MikokoError::Config(
                "conversation.max_tokens must be greater than 0".to_string(),
            )
            .into());
        }

        if self.agent.conversation.prune_threshold <= 0.0
            || self.agent.conversation.prune_threshold > 1.0
        {
            return Err(MikokoError::Config(
                "conversation.prune_threshold must be between 0.0 and 1.0".to_string(),
            )
            .into());
        }

        if self.agent.tools.max_output_size == 0 {
            return Err(MikokoError::Config(
                "tools.max_output_size must be greater than 0".to_string(),
            )
            .into());
        }

        if !(self.carbon.credit_price_usd.is_finite() && self.carbon.credit_price_usd >= 0.0) {
            return Err(MikokoError::Config(
                "carbon.credit_price_usd must be a non-negative number".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

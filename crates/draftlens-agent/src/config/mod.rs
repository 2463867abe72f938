//! Configuration loading for the draftlens binary.
//! Reads draftlens.toml from the current directory or the path in
//! DRAFTLENS_CONFIG. A missing file means built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use draftlens_common::AnalysisConfig;

pub const DEFAULT_CONFIG_PATH: &str = "draftlens.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Providers tried in this order; unknown or unconfigured names are skipped.
    #[serde(default = "default_providers")]
    pub providers: Vec<String>,
    pub groq: Option<LlmBackendConfig>,
    pub openai: Option<LlmBackendConfig>,
    pub anthropic: Option<LlmBackendConfig>,
    pub ollama: Option<LlmBackendConfig>,
    pub openai_compatible: Option<LlmBackendConfig>,
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_providers() -> Vec<String> {
    vec!["groq".to_string(), "openai".to_string(), "anthropic".to_string()]
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            providers: default_providers(),
            groq: None,
            openai: None,
            anthropic: None,
            ollama: None,
            openai_compatible: None,
            retry: RetryConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmBackendConfig {
    #[serde(default)]
    pub api_key: String,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
}

fn default_max_attempts()       -> u32 { 3 }
fn default_initial_backoff_ms() -> u64 { 1000 }

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
        }
    }
}

/// Model used when a provider section names none.
pub fn default_model(provider: &str) -> Option<&'static str> {
    match provider {
        "groq"      => Some("llama-3.3-70b-versatile"),
        "openai"    => Some("gpt-4o-mini"),
        "anthropic" => Some("claude-3-5-sonnet-latest"),
        "ollama"    => Some("llama3:8b"),
        _           => None,
    }
}

/// Name of the environment variable holding a provider's API key.
pub fn api_key_env_var(provider: &str) -> String {
    format!("DRAFTLENS_{}_API_KEY", provider.to_uppercase())
}

/// A key set in the config file wins over the environment.
pub fn resolve_api_key(
    provider: &str,
    configured: Option<&LlmBackendConfig>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    configured
        .map(|c| c.api_key.trim().to_string())
        .filter(|k| !k.is_empty())
        .or_else(|| lookup(&api_key_env_var(provider)).filter(|k| !k.trim().is_empty()))
}

impl LlmConfig {
    pub fn section(&self, provider: &str) -> Option<&LlmBackendConfig> {
        match provider {
            "groq"              => self.groq.as_ref(),
            "openai"            => self.openai.as_ref(),
            "anthropic"         => self.anthropic.as_ref(),
            "ollama"            => self.ollama.as_ref(),
            "openai_compatible" => self.openai_compatible.as_ref(),
            _                   => None,
        }
    }
}


impl Config {
    /// Load configuration from draftlens.toml.
    /// Checks DRAFTLENS_CONFIG env var first, then current directory.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("DRAFTLENS_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.analysis.validate()?;
        Ok(config)
    }
}

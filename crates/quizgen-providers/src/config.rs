//! Provider configuration and factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizgen_core::generator::GeneratorConfig;
use quizgen_core::traits::LlmProvider;

use crate::openai::OpenAiProvider;

/// Configuration for a single LLM provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Groq {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Groq {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Groq")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
                org_id,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .finish(),
        }
    }
}

/// Top-level quizgen configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizgenConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Default provider to use.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Default model to use.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Sampling temperature, 0.0 to 1.0.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Attempts per question, including the first.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Delay between attempts in milliseconds.
    #[serde(default)]
    pub retry_delay_ms: u64,
    /// Max tokens per completion.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Output directory for result files.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// File name prefix for result files.
    #[serde(default = "default_results_prefix")]
    pub results_prefix: String,
}

fn default_provider() -> String {
    "groq".to_string()
}
fn default_model() -> String {
    "llama-3.1-8b-instant".to_string()
}
fn default_temperature() -> f64 {
    0.9
}
fn default_retries() -> u32 {
    3
}
fn default_max_tokens() -> u32 {
    1024
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./results")
}
fn default_results_prefix() -> String {
    "quiz_results".to_string()
}

impl Default for QuizgenConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            temperature: default_temperature(),
            max_retries: default_retries(),
            retry_delay_ms: 0,
            max_tokens: default_max_tokens(),
            output_dir: default_output_dir(),
            results_prefix: default_results_prefix(),
        }
    }
}

impl QuizgenConfig {
    /// Reject values the generator cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.temperature) {
            anyhow::bail!(
                "temperature must be between 0.0 and 1.0, got {}",
                self.temperature
            );
        }
        if self.max_retries == 0 {
            anyhow::bail!("max_retries must be at least 1");
        }
        Ok(())
    }

    /// Generator settings derived from this config.
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            model: self.default_model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            max_retries: self.max_retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            system_prompt_override: None,
        }
    }

    /// Look up a provider by name, falling back to `default_provider`.
    pub fn provider(&self, name: Option<&str>) -> Result<(&str, &ProviderConfig)> {
        let name = name.unwrap_or(&self.default_provider);
        self.providers
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .with_context(|| {
                format!(
                    "provider '{name}' is not configured (set QUIZGEN_GROQ_KEY or add [providers.{name}] to quizgen.toml)"
                )
            })
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::Groq { api_key, base_url } => ProviderConfig::Groq {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            org_id: org_id.as_ref().map(|o| resolve_env_vars(o)),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizgen.toml` in the current directory
/// 2. `~/.config/quizgen/config.toml`
///
/// Environment variable overrides: `QUIZGEN_GROQ_KEY`, `QUIZGEN_OPENAI_KEY`.
pub fn load_config() -> Result<QuizgenConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizgenConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizgen.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizgenConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizgenConfig::default(),
    };

    apply_env_overrides(&mut config);

    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();

    config.validate()?;
    Ok(config)
}

fn apply_env_overrides(config: &mut QuizgenConfig) {
    if let Ok(key) = std::env::var("QUIZGEN_GROQ_KEY") {
        let entry = config
            .providers
            .entry("groq".into())
            .or_insert(ProviderConfig::Groq {
                api_key: String::new(),
                base_url: None,
            });
        if let ProviderConfig::Groq { api_key, .. } = entry {
            *api_key = key;
        }
    }

    if let Ok(key) = std::env::var("QUIZGEN_OPENAI_KEY") {
        let entry = config
            .providers
            .entry("openai".into())
            .or_insert(ProviderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
                org_id: None,
            });
        if let ProviderConfig::OpenAI { api_key, .. } = entry {
            *api_key = key;
        }
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizgen"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(name: &str, config: &ProviderConfig) -> Result<Box<dyn LlmProvider>> {
    let provider = match config {
        ProviderConfig::Groq { api_key, base_url } => {
            OpenAiProvider::groq(api_key, base_url.clone())
        }
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => OpenAiProvider::new(api_key, base_url.clone(), org_id.clone()),
    }
    .with_context(|| format!("failed to create provider '{name}'"))?;
    Ok(Box::new(provider))
}

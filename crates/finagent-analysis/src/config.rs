//! Configuration for analysis runs

use crate::error::{AnalysisError, Result};
use crate::source::SourceKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalystConfig {
    /// Where statements come from
    pub source: SourceKind,

    /// Directory holding `{TICKER}.json` fixtures for the file source
    pub data_dir: PathBuf,

    /// Directory reports are written to
    pub output_dir: PathBuf,

    /// Alpha Vantage API key (required for the Alpha Vantage source)
    pub alpha_vantage_api_key: Option<String>,

    /// Chat model used by the analyst agent
    pub model: String,

    /// OpenAI-compatible base URL; the provider default when unset
    pub llm_api_base: Option<String>,

    /// LLM API key
    pub llm_api_key: Option<String>,

    /// Upper bound for the statement fetch and for the agent run
    pub request_timeout: Duration,

    /// Maximum LLM round trips per agent run
    pub max_iterations: usize,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Sampling temperature
    pub temperature: Option<f32>,
}

impl Default for AnalystConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::AlphaVantage,
            data_dir: PathBuf::from("./data"),
            output_dir: PathBuf::from("./output"),
            alpha_vantage_api_key: None,
            model: "gpt-4o-mini".to_string(),
            llm_api_base: None,
            llm_api_key: None,
            request_timeout: Duration::from_secs(300),
            max_iterations: 10,
            max_tokens: 4096,
            temperature: Some(0.7),
        }
    }
}

impl AnalystConfig {
    /// Create a new configuration builder
    pub fn builder() -> AnalystConfigBuilder {
        AnalystConfigBuilder::default()
    }

    /// Defaults overridden by the process environment
    ///
    /// Reads `FINAGENT_SOURCE`, `FINAGENT_DATA_DIR`, `FINAGENT_OUTPUT_DIR`,
    /// `FINAGENT_TIMEOUT_SECS`, `ALPHA_VANTAGE_API_KEY`, `OPENAI_API_KEY`,
    /// `OPENAI_API_BASE` and `OPENAI_MODEL`. The result is not validated.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`AnalystConfig::from_env`] with a custom variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(source) = get("FINAGENT_SOURCE") {
            config.source = source.parse()?;
        }
        if let Some(dir) = get("FINAGENT_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get("FINAGENT_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(secs) = get("FINAGENT_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                AnalysisError::Config(format!("FINAGENT_TIMEOUT_SECS must be a number, got '{secs}'"))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(model) = get("OPENAI_MODEL") {
            config.model = model;
        }
        config.alpha_vantage_api_key = get("ALPHA_VANTAGE_API_KEY");
        config.llm_api_key = get("OPENAI_API_KEY");
        config.llm_api_base = get("OPENAI_API_BASE");

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.source == SourceKind::AlphaVantage && self.alpha_vantage_api_key.is_none() {
            return Err(AnalysisError::Config(
                "Alpha Vantage API key required when using the alpha-vantage source".to_string(),
            ));
        }

        if self.max_iterations == 0 {
            return Err(AnalysisError::Config(
                "max_iterations must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(AnalysisError::Config(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for AnalystConfig
#[derive(Debug, Default)]
pub struct AnalystConfigBuilder {
    base: Option<AnalystConfig>,
    source: Option<SourceKind>,
    data_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    alpha_vantage_api_key: Option<String>,
    model: Option<String>,
    llm_api_base: Option<String>,
    llm_api_key: Option<String>,
    request_timeout: Option<Duration>,
    max_iterations: Option<usize>,
    max_tokens: Option<usize>,
    temperature: Option<f32>,
}

impl AnalystConfigBuilder {
    /// Start from an existing configuration instead of the defaults
    pub fn base(mut self, config: AnalystConfig) -> Self {
        self.base = Some(config);
        self
    }

    /// Set the statement source
    pub fn source(mut self, source: SourceKind) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the fixture directory
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Set the report directory
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Set Alpha Vantage API key
    pub fn alpha_vantage_api_key(mut self, key: impl Into<String>) -> Self {
        self.alpha_vantage_api_key = Some(key.into());
        self
    }

    /// Set the chat model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the LLM base URL
    pub fn llm_api_base(mut self, base: impl Into<String>) -> Self {
        self.llm_api_base = Some(base.into());
        self
    }

    /// Set the LLM API key
    pub fn llm_api_key(mut self, key: impl Into<String>) -> Self {
        self.llm_api_key = Some(key.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set maximum agent iterations
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = Some(max);
        self
    }

    /// Set max tokens per completion
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AnalystConfig> {
        let defaults = self.base.unwrap_or_default();

        let config = AnalystConfig {
            source: self.source.unwrap_or(defaults.source),
            data_dir: self.data_dir.unwrap_or(defaults.data_dir),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            alpha_vantage_api_key: self
                .alpha_vantage_api_key
                .or(defaults.alpha_vantage_api_key),
            model: self.model.unwrap_or(defaults.model),
            llm_api_base: self.llm_api_base.or(defaults.llm_api_base),
            llm_api_key: self.llm_api_key.or(defaults.llm_api_key),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.temperature.or(defaults.temperature),
        };

        config.validate()?;
        Ok(config)
    }
}

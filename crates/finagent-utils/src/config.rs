//! Process-level configuration shared by finagent binaries

use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading process configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held an unusable value
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable single-line output
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidValue {
                key: "log format".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Logging settings for a finagent process
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub log_format: LogFormat,
    /// Filter directive used when `RUST_LOG` is unset
    pub log_filter: Option<String>,
}

impl Config {
    /// Read `FINAGENT_LOG_FORMAT` and `FINAGENT_LOG_FILTER`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Config::from_env`] with a custom variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(format) = lookup("FINAGENT_LOG_FORMAT") {
            config.log_format = format.parse().map_err(|_| ConfigError::InvalidValue {
                key: "FINAGENT_LOG_FORMAT".to_string(),
                value: format,
            })?;
        }
        config.log_filter = lookup("FINAGENT_LOG_FILTER").filter(|f| !f.trim().is_empty());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" Text ".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("yaml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.log_filter.is_none());
    }

    #[test]
    fn test_reads_format_and_filter() {
        let config = Config::from_lookup(lookup(&[
            ("FINAGENT_LOG_FORMAT", "json"),
            ("FINAGENT_LOG_FILTER", "warn,finagent_analysis=debug"),
        ]))
        .unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(
            config.log_filter.as_deref(),
            Some("warn,finagent_analysis=debug")
        );
    }

    #[test]
    fn test_invalid_format_names_variable() {
        let err = Config::from_lookup(lookup(&[("FINAGENT_LOG_FORMAT", "yaml")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for FINAGENT_LOG_FORMAT: yaml");
    }
}

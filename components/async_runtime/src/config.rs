//! Runtime limits for the event loop and the host promise primitive.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while loading a [`RuntimeConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The input was not valid JSON for a config
    #[error("failed to parse runtime config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field held a value the runtime cannot work with
    #[error("invalid runtime config: {0}")]
    Invalid(String),
}

/// Limits applied by the [`EventLoop`](crate::EventLoop).
///
/// # Examples
///
/// ```
/// use async_runtime::RuntimeConfig;
///
/// let config = RuntimeConfig::from_json_str(r#"{ "max_chain_depth": 8 }"#).unwrap();
/// assert_eq!(config.max_chain_depth, 8);
/// assert_eq!(config.max_turns, RuntimeConfig::default().max_turns);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Maximum number of task turns `run_until_done` performs before giving up
    pub max_turns: usize,
    /// Maximum length of a `then` chain before continuation allocation fails
    pub max_chain_depth: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_turns: 100_000,
            max_chain_depth: 10_000,
        }
    }
}

impl RuntimeConfig {
    /// Parses a config from JSON, filling missing fields with defaults.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects limits of zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_turns == 0 {
            return Err(ConfigError::Invalid("max_turns must be positive".to_string()));
        }
        if self.max_chain_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_chain_depth must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

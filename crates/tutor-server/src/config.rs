//! Server configuration from environment variables.
//!
//! [`ServerConfig::from_env`] reads the process environment (after the
//! binaries load `.env` through `dotenvy`). Every variable has a default except
//! the LLM API key: without one the agent is disabled and `/api/body` answers
//! with demo responses.
//!
//! | variable | default |
//! |---|---|
//! | `TUTOR_HOST` | `0.0.0.0` |
//! | `TUTOR_PORT` | `8000` |
//! | `TUTOR_PROGRESS_PORT` | `5000` |
//! | `TUTOR_CORS_ORIGINS` | `http://localhost:3000` |
//! | `API_KEY` | first line of `TUTOR_API_KEY_FILE` (`storage/api_key.txt`) |
//! | `TUTOR_LLM_PROVIDER` | `openrouter` |
//! | `TUTOR_LLM_BASE_URL` | provider default |
//! | `TUTOR_LLM_MODEL` | `anthropic/claude-3.7-sonnet` |
//! | `TUTOR_DEEP_THINKING_MODEL` | `anthropic/claude-3-opus` |
//! | `TUTOR_LLM_TIMEOUT_SECS` | `60` |
//! | `TUTOR_RNG_SEED` | unset (entropy) |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::llm_provider::LlmConfig;

pub const DEFAULT_MODEL: &str = "anthropic/claude-3.7-sonnet";
pub const DEFAULT_DEEP_THINKING_MODEL: &str = "anthropic/claude-3-opus";
pub const DEFAULT_API_KEY_FILE: &str = "storage/api_key.txt";

/// Configuration errors reported at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub progress_port: u16,
    /// Allowed CORS origins; empty means any origin.
    pub cors_origins: Vec<String>,
    pub api_key: Option<String>,
    pub llm_provider: String,
    pub llm_base_url: Option<String>,
    pub llm_model: String,
    pub deep_thinking_model: String,
    pub llm_timeout: Duration,
    pub rng_seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8000,
            progress_port: 5000,
            cors_origins: vec!["http://localhost:3000".to_string()],
            api_key: None,
            llm_provider: "openrouter".to_string(),
            llm_base_url: None,
            llm_model: DEFAULT_MODEL.to_string(),
            deep_thinking_model: DEFAULT_DEEP_THINKING_MODEL.to_string(),
            llm_timeout: Duration::from_secs(60),
            rng_seed: None,
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of a
    /// variable if it is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = ServerConfig::default();

        let cors_origins = match get("TUTOR_CORS_ORIGINS") {
            Some(raw) if raw == "*" => Vec::new(),
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect(),
            None => defaults.cors_origins,
        };

        let api_key = get("API_KEY").or_else(|| {
            let path = get("TUTOR_API_KEY_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_API_KEY_FILE));
            read_key_file(&path)
        });

        Ok(ServerConfig {
            host: get("TUTOR_HOST").unwrap_or(defaults.host),
            port: parse_var("TUTOR_PORT", get("TUTOR_PORT"))?.unwrap_or(defaults.port),
            progress_port: parse_var("TUTOR_PROGRESS_PORT", get("TUTOR_PROGRESS_PORT"))?
                .unwrap_or(defaults.progress_port),
            cors_origins,
            api_key,
            llm_provider: get("TUTOR_LLM_PROVIDER").unwrap_or(defaults.llm_provider),
            llm_base_url: get("TUTOR_LLM_BASE_URL"),
            llm_model: get("TUTOR_LLM_MODEL").unwrap_or(defaults.llm_model),
            deep_thinking_model: get("TUTOR_DEEP_THINKING_MODEL")
                .unwrap_or(defaults.deep_thinking_model),
            llm_timeout: parse_var::<u64>("TUTOR_LLM_TIMEOUT_SECS", get("TUTOR_LLM_TIMEOUT_SECS"))?
                .map(Duration::from_secs)
                .unwrap_or(defaults.llm_timeout),
            rng_seed: parse_var("TUTOR_RNG_SEED", get("TUTOR_RNG_SEED"))?,
        })
    }

    /// Listen address of the HTTP API.
    pub fn api_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Listen address of the progress WebSocket server.
    pub fn progress_addr(&self) -> String {
        format!("{}:{}", self.host, self.progress_port)
    }

    /// Provider settings for the agent, or `None` when no API key is known.
    pub fn llm(&self) -> Option<LlmConfig> {
        let api_key = self.api_key.clone()?;
        Some(LlmConfig {
            provider: self.llm_provider.clone(),
            api_base_url: self.llm_base_url.clone(),
            api_key,
            model: self.llm_model.clone(),
            deep_thinking_model: self.deep_thinking_model.clone(),
        })
    }
}

fn parse_var<T>(var: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|raw| {
            raw.parse::<T>().map_err(|err| ConfigError::InvalidValue {
                var,
                value: raw.clone(),
                reason: err.to_string(),
            })
        })
        .transpose()
}

fn read_key_file(path: &std::path::Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => contents
            .lines()
            .next()
            .map(|line| line.trim().to_string())
            .filter(|key| !key.is_empty()),
        Err(_) => {
            tracing::debug!(path = %path.display(), "no API key file");
            None
        }
    }
}

//! Configuration management for Valise
//!
//! Loads configuration from environment variables and an optional `.env`
//! file in the working directory.

use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};

/// Ollama model configuration
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Base URL of the Ollama server (OpenAI-compatible endpoint)
    pub base_url: String,
    /// Model identifier, e.g. "llama3.1:8b"
    pub model_id: String,
    /// Whether the model supports tool/function calling
    pub supports_tools: bool,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// OpenWeatherMap configuration
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// API key for OpenWeatherMap
    pub api_key: SecretString,
    /// Base URL for the OpenWeatherMap API
    pub base_url: String,
}

/// Orchestration limits
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Maximum re-ask cycles before a run is declared non-convergent
    pub max_reasks: u32,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level filter
    pub level: String,
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Ollama model settings
    pub model: ModelConfig,
    /// OpenWeatherMap settings
    pub weather: WeatherConfig,
    /// Orchestration settings
    pub agent: AgentConfig,
    /// Logging settings
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let api_key = std::env::var("OPENWEATHER_API_KEY")
            .map_err(|_| Error::Config("OPENWEATHER_API_KEY is not set".to_string()))?;

        Ok(Config {
            model: ModelConfig {
                base_url: std::env::var("OLLAMA_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:11434".to_string()),
                model_id: std::env::var("OLLAMA_MODEL")
                    .unwrap_or_else(|_| "llama3.1:8b".to_string()),
                supports_tools: std::env::var("OLLAMA_SUPPORTS_TOOLS")
                    .map(|v| v.to_lowercase() != "false")
                    .unwrap_or(true),
                timeout_secs: std::env::var("OLLAMA_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "120".to_string())
                    .parse()
                    .unwrap_or(120),
            },
            weather: WeatherConfig {
                api_key: SecretString::from(api_key),
                base_url: std::env::var("OPENWEATHER_BASE_URL")
                    .unwrap_or_else(|_| "https://api.openweathermap.org".to_string()),
            },
            agent: AgentConfig {
                max_reasks: std::env::var("AGENT_MAX_REASKS")
                    .unwrap_or_else(|_| "8".to_string())
                    .parse()
                    .unwrap_or(8),
            },
            log: LogConfig {
                level: std::env::var("RUST_LOG")
                    .unwrap_or_else(|_| "info,valise=debug".to_string()),
            },
        })
    }

    /// Validate that all required configuration is present
    pub fn validate(&self) -> Result<()> {
        if self.weather.api_key.expose_secret().is_empty() {
            return Err(Error::Config("OPENWEATHER_API_KEY is required".to_string()));
        }
        if self.model.base_url.is_empty() {
            return Err(Error::Config("OLLAMA_BASE_URL must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            model: ModelConfig {
                base_url: "http://localhost:11434".to_string(),
                model_id: "llama3.1:8b".to_string(),
                supports_tools: true,
                timeout_secs: 120,
            },
            weather: WeatherConfig {
                api_key: SecretString::from("test-key"),
                base_url: "https://api.openweathermap.org".to_string(),
            },
            agent: AgentConfig { max_reasks: 8 },
            log: LogConfig {
                level: "info".to_string(),
            },
        }
    }

    #[test]
    fn validates_complete_config() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn rejects_empty_api_key() {
        let mut config = test_config();
        config.weather.api_key = SecretString::from("");
        assert!(config.validate().is_err());
    }
}

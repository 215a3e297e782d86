//! Configuration management for supportcrew
//!
//! TOML configuration with defaults and validation.
//! Location: ~/.supportcrew/config.toml

use crate::errors::{AgentError, Result};
use crate::tools::{HttpToolGateway, RetryPolicy, SharedGateway, SimulatedLatency, SimulatedTools};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tools: ToolsConfig,
    pub logging: LoggingConfig,
}

/// Which tool gateway to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolBackend {
    Simulated,
    Http,
}

/// Tool gateway configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub backend: ToolBackend,
    pub base_url: Option<String>,
    pub timeout_ms: u64,
    pub search_latency_ms: u64,
    pub notify_latency_ms: u64,
    pub ticket_latency_ms: u64,
    pub max_attempts: u32,
    pub retry_base_delay_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive string
    pub filter: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            backend: ToolBackend::Simulated,
            base_url: None,
            timeout_ms: 10_000,
            search_latency_ms: 500,
            notify_latency_ms: 300,
            ticket_latency_ms: 400,
            max_attempts: 3,
            retry_base_delay_ms: 200,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl ToolsConfig {
    pub fn latency(&self) -> SimulatedLatency {
        SimulatedLatency {
            search: Duration::from_millis(self.search_latency_ms),
            notify: Duration::from_millis(self.notify_latency_ms),
            create_ticket: Duration::from_millis(self.ticket_latency_ms),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::with_config(self.max_attempts, self.retry_base_delay_ms)
    }

    /// Construct the configured gateway
    pub fn build_gateway(&self) -> Result<SharedGateway> {
        match self.backend {
            ToolBackend::Simulated => Ok(Arc::new(SimulatedTools::new(self.latency()))),
            ToolBackend::Http => {
                let base_url = self.base_url.as_deref().ok_or_else(|| {
                    AgentError::ConfigError("tools.base_url is required for the http backend".to_string())
                })?;
                let gateway = HttpToolGateway::new(
                    base_url,
                    Duration::from_millis(self.timeout_ms),
                    self.retry_policy(),
                )?;
                Ok(Arc::new(gateway))
            }
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(config_path) => Self::load_from_file(config_path),
            None => Self::load_default(),
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AgentError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| AgentError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from the standard location, or built-in defaults if absent
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// ~/.supportcrew/config.toml
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".supportcrew").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.tools.backend == ToolBackend::Http && self.tools.base_url.is_none() {
            return Err(AgentError::ConfigError(
                "tools.base_url is required for the http backend".to_string(),
            ));
        }

        if self.tools.timeout_ms == 0 {
            return Err(AgentError::ConfigError(
                "tools.timeout_ms must be greater than 0".to_string(),
            ));
        }

        if self.tools.max_attempts == 0 {
            return Err(AgentError::ConfigError(
                "tools.max_attempts must be at least 1".to_string(),
            ));
        }

        if self.logging.filter.trim().is_empty() {
            return Err(AgentError::ConfigError("logging.filter must not be empty".to_string()));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| AgentError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tools.backend, ToolBackend::Simulated);
        assert_eq!(config.tools.latency(), SimulatedLatency::default());
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tools]\nsearch_latency_ms = 5\n").unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.tools.search_latency_ms, 5);
        assert_eq!(config.tools.notify_latency_ms, 300);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_http_backend_requires_base_url() {
        let mut config = Config::default();
        config.tools.backend = ToolBackend::Http;
        assert!(config.validate().is_err());
        assert!(config.tools.build_gateway().is_err());

        config.tools.base_url = Some("http://localhost:8080".to_string());
        assert!(config.validate().is_ok());
        assert!(config.tools.build_gateway().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.tools.timeout_ms = 0;
        assert!(matches!(config.validate(), Err(AgentError::ConfigError(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.logging.filter = "supportcrew=debug".to_string();
        config.save(&path).unwrap();

        assert_eq!(Config::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = Config::load_from_file(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(AgentError::ConfigError(_))));
    }
}

//! Server Configuration
//!
//! Listener, CORS and logging settings, plus the engine configuration the
//! pipeline is built from.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::engine::env_flag;
use crate::config::EngineConfig;
use crate::core::error::{Result, TtsError};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Deployment environment
    #[serde(default)]
    pub environment: Environment,

    /// Debug mode
    #[serde(default)]
    pub debug: bool,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Pipeline configuration
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Anything but `production` is development
    pub fn from_str(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn default_log_level(&self) -> &'static str {
        match self {
            Environment::Development => "debug",
            Environment::Production => "info",
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins; `*` allows any
    #[serde(default = "default_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_origins(),
        }
    }
}

impl CorsConfig {
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level; follows the environment when unset
    #[serde(default)]
    pub level: Option<String>,
}

/// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
            debug: false,
            cors: CorsConfig::default(),
            logging: LoggingConfig::default(),
            engine: EngineConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| TtsError::Config {
            message: format!("Failed to read config file: {}", e),
            path: Some(path.to_path_buf()),
        })?;
        serde_yaml::from_str(&content).map_err(|e| TtsError::Config {
            message: format!("Failed to parse config YAML: {}", e),
            path: Some(path.to_path_buf()),
        })
    }

    /// Save to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port.trim().parse().map_err(|_| TtsError::Config {
                message: format!("PORT is not a valid port number: {}", port),
                path: None,
            })?;
        }
        if let Some(debug) = lookup("DEBUG") {
            self.debug = env_flag(&debug);
        }
        if let Some(environment) = lookup("ENVIRONMENT") {
            self.environment = Environment::from_str(&environment);
        }
        self.engine.apply_env_from(&lookup)
    }

    /// Effective log level
    pub fn log_level(&self) -> &str {
        match &self.logging.level {
            Some(level) => level,
            None if self.debug => "debug",
            None => self.environment.default_log_level(),
        }
    }

    /// Listen address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

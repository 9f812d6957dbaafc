use serde::{Deserialize, Serialize};
use std::env::VarError;
use std::net::SocketAddr;

use crate::errors::{ConfigError, GreeterError, Result};

pub const CONFIG_ENV_VAR: &str = "GREETER_CONFIG";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GreeterConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Listener settings for the container runner. Lambda ignores these.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_grace_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub filter: String,
    pub json: bool,
}

fn default_version() -> u32 {
    1
}

impl Default for GreeterConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_grace_ms: 5000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| {
                GreeterError::Config(ConfigError::Invalid {
                    message: format!("{}:{} is not a socket address: {}", self.host, self.port, e),
                })
            })
    }
}

/// Loads from `config_path` when given, otherwise from [`CONFIG_ENV_VAR`],
/// otherwise falls back to the defaults.
pub fn load_config(config_path: Option<&str>) -> Result<GreeterConfig> {
    match config_path {
        Some(path) => GreeterConfig::from_file(path),
        None if std::env::var_os(CONFIG_ENV_VAR).is_some() => GreeterConfig::from_env(),
        None => Ok(GreeterConfig::default()),
    }
}

impl GreeterConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            location: path.to_string(),
            error: Box::new(e),
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_env() -> Result<Self> {
        let config_str = std::env::var(CONFIG_ENV_VAR).map_err(|e| match e {
            VarError::NotPresent => ConfigError::MissingField {
                field: CONFIG_ENV_VAR.to_string(),
            },
            VarError::NotUnicode(_) => ConfigError::Invalid {
                message: format!("{} is not valid unicode", CONFIG_ENV_VAR),
            },
        })?;
        Self::from_yaml_str(&config_str)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // An empty document is a valid "all defaults" config.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: GreeterConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ConfigError::ValidationFailed {
                reason: format!("unsupported config version {}", self.version),
            }
            .into());
        }
        if self.server.host.is_empty() {
            return Err(ConfigError::ValidationFailed {
                reason: "Server host cannot be empty".to_string(),
            }
            .into());
        }
        if self.server.port == 0 {
            return Err(ConfigError::ValidationFailed {
                reason: "Server port cannot be 0".to_string(),
            }
            .into());
        }
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::ValidationFailed {
                reason: "Logging filter cannot be empty".to_string(),
            }
            .into());
        }
        self.server.socket_addr()?;
        Ok(())
    }
}

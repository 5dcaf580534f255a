use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

use crate::identifier::SqlDialect;
use crate::table_map::LANGUAGE_OVERLAY_PREFIX;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Server configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP server host address
    #[validate(length(min = 1, message = "HTTP host cannot be empty"))]
    pub http_host: String,

    /// HTTP server port (1-65535)
    #[validate(range(
        min = 1,
        max = 65535,
        message = "HTTP port must be between 1 and 65535"
    ))]
    pub http_port: u16,

    /// Dialect assumed when a request does not name one
    pub default_dialect: SqlDialect,

    /// Alias prefix of language overlay joins
    #[validate(length(min = 1, message = "Overlay prefix cannot be empty"))]
    pub overlay_prefix: String,

    /// Per-request timeout in seconds
    #[validate(range(
        min = 1,
        max = 300,
        message = "Request timeout must be between 1 and 300 seconds"
    ))]
    pub request_timeout_secs: u64,

    /// Maximum accepted request body size
    #[validate(range(
        min = 1024,
        max = 16777216,
        message = "Max body size must be between 1 KiB and 16 MiB"
    ))]
    pub max_body_bytes: usize,

    /// Whether to run server in daemon mode
    pub daemon: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_host: "0.0.0.0".to_string(),
            http_port: 8080,
            default_dialect: SqlDialect::default(),
            overlay_prefix: LANGUAGE_OVERLAY_PREFIX.to_string(),
            request_timeout_secs: 30,
            max_body_bytes: 1024 * 1024,
            daemon: false,
        }
    }
}

impl ServerConfig {
    /// Create configuration from environment variables with validation
    ///
    /// A `.env` file in the working directory (or a parent) is loaded first;
    /// variables already set in the process environment take precedence.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Self {
            http_host: env::var("TABLEREF_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: parse_env_var("TABLEREF_PORT", "8080")?,
            default_dialect: parse_env_var("TABLEREF_DIALECT", "postgresql")?,
            overlay_prefix: env::var("TABLEREF_OVERLAY_PREFIX")
                .unwrap_or_else(|_| LANGUAGE_OVERLAY_PREFIX.to_string()),
            request_timeout_secs: parse_env_var("TABLEREF_REQUEST_TIMEOUT_SECS", "30")?,
            max_body_bytes: parse_env_var("TABLEREF_MAX_BODY_BYTES", "1048576")?,
            daemon: false, // Environment-based config always runs in foreground
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from CLI arguments with validation
    pub fn from_cli(cli: CliConfig) -> Result<Self, ConfigError> {
        let config = Self {
            http_host: cli.http_host,
            http_port: cli.http_port,
            default_dialect: cli.default_dialect,
            overlay_prefix: cli.overlay_prefix,
            request_timeout_secs: cli.request_timeout_secs,
            max_body_bytes: cli.max_body_bytes,
            daemon: cli.daemon,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Merge with another configuration (the other side wins)
    pub fn merge(&mut self, other: Self) {
        self.http_host = other.http_host;
        self.http_port = other.http_port;
        self.default_dialect = other.default_dialect;
        self.overlay_prefix = other.overlay_prefix;
        self.request_timeout_secs = other.request_timeout_secs;
        self.max_body_bytes = other.max_body_bytes;
        self.daemon = other.daemon;
    }
}

/// CLI configuration (parsed from command line arguments)
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub http_host: String,
    pub http_port: u16,
    pub default_dialect: SqlDialect,
    pub overlay_prefix: String,
    pub request_timeout_secs: u64,
    pub max_body_bytes: usize,
    pub daemon: bool,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}

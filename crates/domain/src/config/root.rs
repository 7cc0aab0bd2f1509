use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::resolver::ResolverConfig;

const LOCAL_CONFIG_PATH: &str = "ferrous-stub.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/ferrous-stub/config.toml";

/// Main configuration structure for Ferrous Stub
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Servers, timeout and retry policy
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-stub.toml in current directory
    /// 3. /etc/ferrous-stub/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Some(found) = Self::get_config_path() {
            Self::from_file(&found)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if !overrides.servers.is_empty() {
            self.resolver.servers = overrides.servers;
        }
        if let Some(timeout_ms) = overrides.timeout_ms {
            self.resolver.timeout_ms = timeout_ms;
        }
        if let Some(retries) = overrides.max_retries {
            self.resolver.max_retries = retries;
        }
        if let Some(rd) = overrides.recursion_desired {
            self.resolver.recursion_desired = rd;
        }
        if let Some(record_type) = overrides.record_type {
            self.resolver.record_type = record_type;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolver.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "Query timeout cannot be 0".to_string(),
            ));
        }

        self.resolver
            .server_addrs()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        self.resolver.query_type()?;

        Ok(())
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        [LOCAL_CONFIG_PATH, SYSTEM_CONFIG_PATH]
            .into_iter()
            .find(|p| std::path::Path::new(p).exists())
            .map(str::to_string)
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub servers: Vec<String>,
    pub timeout_ms: Option<u64>,
    pub max_retries: Option<u32>,
    pub recursion_desired: Option<bool>,
    pub record_type: Option<String>,
    pub log_level: Option<String>,
}

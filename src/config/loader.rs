//! Configuration Loader
//!
//! Environment-aware loading built on the `config` crate: an optional file
//! (YAML, TOML or JSON by extension) layered under environment overrides.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use config::{Config, Environment, File};
use tracing::debug;

use super::ChainConfig;
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, CONFIG_PATH_VAR, DEFAULT_CONFIG_FILE,
    DEFAULT_ENVIRONMENT, ENVIRONMENT_VARS,
};
use crate::error::Result;

/// Loaded, validated configuration plus where it came from
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: ChainConfig,
    environment: String,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    ///
    /// Reads the file named by `TASKER_CHAIN_CONFIG` when set, otherwise an
    /// optional `config/tasker-chain.*`, then applies `TASKER_CHAIN_*` overrides.
    pub fn load() -> Result<Arc<ConfigManager>> {
        let explicit = env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from);
        Self::load_from(explicit.as_deref(), CONFIG_ENV_PREFIX)
    }

    /// Load configuration from a specific file, with default environment overrides
    pub fn load_from_path(path: &Path) -> Result<Arc<ConfigManager>> {
        Self::load_from(Some(path), CONFIG_ENV_PREFIX)
    }

    /// Load from an optional file and an explicit override prefix
    ///
    /// A nested key such as `dispatch_loop.dispatch_interval_ms` is overridden by
    /// `<PREFIX>_DISPATCH_LOOP__DISPATCH_INTERVAL_MS`.
    pub fn load_from(path: Option<&Path>, env_prefix: &str) -> Result<Arc<ConfigManager>> {
        let environment = Self::detect_environment();

        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config: ChainConfig = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator(CONFIG_ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;

        debug!(
            environment = %environment,
            source = ?path,
            dispatch_interval_ms = config.dispatch_loop.dispatch_interval_ms,
            "Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment,
            source: path.map(Path::to_path_buf),
        }))
    }

    /// Wrap an already-built configuration
    pub fn from_config(config: ChainConfig) -> Result<Arc<ConfigManager>> {
        config.validate()?;
        Ok(Arc::new(ConfigManager {
            config,
            environment: Self::detect_environment(),
            source: None,
        }))
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// File the configuration was read from, if an explicit one was given
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Detect current environment from environment variables
    pub fn detect_environment() -> String {
        ENVIRONMENT_VARS
            .iter()
            .find_map(|name| env::var(name).ok())
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
            .to_lowercase()
    }
}

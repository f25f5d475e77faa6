//! # Chain Configuration
//!
//! Settings for executor construction, the optional dispatch loop and logging.
//! Every field has a default, so an empty or missing configuration file yields
//! a working setup.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tasker_chain::config::ConfigManager;
//! use tasker_chain::Dispatcher;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let dispatcher = Dispatcher::with_config(manager.config().clone());
//! # Ok(())
//! # }
//! ```

pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::defaults;
use crate::error::{ChainError, Result};

pub use loader::ConfigManager;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Settings handed to every executor the registry creates
    pub executors: ExecutorConfig,

    /// Settings for [`crate::dispatcher::DispatchLoop`]
    pub dispatch_loop: DispatchLoopConfig,

    /// Structured logging settings
    pub logging: LoggingConfig,
}

/// Executor construction settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Initial capacity of a queue executor's pending FIFO
    pub queue_capacity: usize,

    /// Initial capacity of a strand executor's pending buffer
    pub strand_capacity: usize,

    /// Async executor thread settings
    #[serde(rename = "async")]
    pub async_threads: AsyncConfig,
}

/// Threads spawned by the async executor
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AsyncConfig {
    pub thread_name_prefix: String,
    /// Stack size in bytes; platform default when unset
    pub stack_size: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchLoopConfig {
    /// Pause between two dispatches of the driven channel
    pub dispatch_interval_ms: u64,
    pub thread_name_prefix: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    /// Explicit filter directive; environment-derived level when unset
    pub level: Option<String>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            queue_capacity: defaults::QUEUE_CAPACITY,
            strand_capacity: defaults::STRAND_CAPACITY,
            async_threads: AsyncConfig::default(),
        }
    }
}

impl Default for AsyncConfig {
    fn default() -> Self {
        Self {
            thread_name_prefix: defaults::ASYNC_THREAD_NAME_PREFIX.to_string(),
            stack_size: None,
        }
    }
}

impl Default for DispatchLoopConfig {
    fn default() -> Self {
        Self {
            dispatch_interval_ms: defaults::DISPATCH_INTERVAL_MS,
            thread_name_prefix: defaults::DISPATCH_THREAD_NAME_PREFIX.to_string(),
        }
    }
}

impl DispatchLoopConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.dispatch_interval_ms)
    }
}

impl ChainConfig {
    /// Reject settings that would leave a component unusable
    pub fn validate(&self) -> Result<()> {
        if self.dispatch_loop.dispatch_interval_ms == 0 {
            return Err(ChainError::Configuration(
                "dispatch_loop.dispatch_interval_ms must be greater than zero".to_string(),
            ));
        }

        if self.executors.async_threads.thread_name_prefix.trim().is_empty() {
            return Err(ChainError::Configuration(
                "executors.async.thread_name_prefix must not be empty".to_string(),
            ));
        }

        if self.executors.async_threads.stack_size == Some(0) {
            return Err(ChainError::Configuration(
                "executors.async.stack_size must be greater than zero when set".to_string(),
            ));
        }

        Ok(())
    }
}

//! # System Constants
//!
//! Environment variable names and defaults shared by configuration loading
//! and logging.

/// Environment variables consulted, in order, to detect the running environment
pub const ENVIRONMENT_VARS: [&str; 2] = ["TASKER_CHAIN_ENV", "APP_ENV"];

/// Environment used when none of [`ENVIRONMENT_VARS`] is set
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Prefix for environment overrides of configuration keys
pub const CONFIG_ENV_PREFIX: &str = "TASKER_CHAIN";

/// Separator between nested configuration keys in environment overrides
pub const CONFIG_ENV_SEPARATOR: &str = "__";

/// Environment variable pointing at an explicit configuration file
pub const CONFIG_PATH_VAR: &str = "TASKER_CHAIN_CONFIG";

/// Configuration file looked up (any supported extension) when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "config/tasker-chain";

/// Name used for the absence-of-channel marker
pub const NO_CHANNEL_NAME: &str = "void";

pub mod defaults {
    pub const QUEUE_CAPACITY: usize = 64;
    pub const STRAND_CAPACITY: usize = 64;
    pub const ASYNC_THREAD_NAME_PREFIX: &str = "tasker-chain-async";
    pub const DISPATCH_INTERVAL_MS: u64 = 10;
    pub const DISPATCH_THREAD_NAME_PREFIX: &str = "tasker-chain-dispatch";
}

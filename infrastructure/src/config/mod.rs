//! Configuration file loading for tool-relay
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./relay.toml` or `./.relay.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/tool-relay/config.toml`
//! 4. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAliasesConfig, FileCommandConfig, FileConfig, FileDispatchConfig,
    FileExecutorConfig, FileLoggingConfig, FileSelfTestConfig, tool_key,
};
pub use loader::ConfigLoader;

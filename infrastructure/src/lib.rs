//! Infrastructure layer for tool-relay
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the provider registry behind `ExecutorPort`,
//! the JSONL dispatch log, and configuration file loading.

pub mod config;
pub mod logging;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use logging::JsonlDispatchLogger;
pub use tools::{
    AgentHandler, BuiltinProvider, ExternalCommandProvider, FlowHandler, ProviderRegistry,
    RegistryStats, registry_from_config,
};

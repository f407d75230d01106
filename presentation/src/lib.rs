//! Presentation layer for tool-relay
//!
//! This crate contains CLI definitions, output formatters and the
//! self-test progress reporter.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{CallArgs, Cli, Command, ContextArgs, OutputFormat};
pub use output::{
    ConsoleFormatter, JsonFormatter, OutputFormatter, Resolution, formatter_for,
};
pub use progress::reporter::{ProgressReporter, SimpleProgress};

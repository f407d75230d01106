//! Port definitions (interfaces for external adapters)

pub mod dispatch_logger;
pub mod executor;
pub mod progress;

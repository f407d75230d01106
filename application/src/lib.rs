//! Application layer for tool-relay
//!
//! This crate contains the dispatch use cases, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::DispatchParams;
pub use ports::{
    dispatch_logger::{DispatchEvent, DispatchLogger, NoDispatchLogger},
    executor::ExecutorPort,
    progress::{NoProgress, SelfTestProgress},
};
pub use use_cases::dispatch::{
    DispatchStats, Dispatcher, SelfTestCase, SelfTestCaseResult, SelfTestError, SelfTestReport,
    SelfTestUseCase,
};

//! Application-level configuration.
//!
//! - [`DispatchParams`]: confidence gate, suggestion limit, self-test concurrency

pub mod dispatch_params;

pub use dispatch_params::DispatchParams;

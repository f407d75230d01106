//! Built-in capability provider module
//!
//! Provides the BuiltinProvider which serves shell commands and file
//! operations in-process.

mod provider;

pub use provider::{BUILTIN_PRIORITY, BuiltinProvider};

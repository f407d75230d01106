//! Domain layer for tool-relay
//!
//! This crate contains the dispatch core's pure logic: name resolution,
//! intent recognition, and the value objects every dispatch produces.
//! It performs no I/O; execution lives behind the application layer's
//! `ExecutorPort`.
//!
//! # Core Concepts
//!
//! ## Canonical names and aliases
//!
//! Each capability has one canonical name (`execute_shell`). Any spelling
//! a caller might use (`bash`, `Run-Command`) resolves to it through the
//! [`AliasResolver`].
//!
//! ## Intent
//!
//! The [`IntentRecognizer`] scores free text against every tool's trigger
//! patterns and returns ranked [`IntentMatch`]es with extracted parameters.
//!
//! ## Outcome
//!
//! Every dispatch ends in exactly one [`DispatchOutcome`]. Anything other
//! than `SUCCESS` carries an error message that names the target and the
//! real cause.

pub mod alias;
pub mod core;
pub mod intent;
pub mod tool;

pub use alias::AliasResolver;
pub use core::error::DomainError;
pub use intent::{IntentMatch, IntentRecognizer};
pub use tool::{
    BackendHint, BackendKind, CapabilityProvider, DefaultParamValidator, DispatchOutcome,
    DispatchResult, InvocationMode, ParamMap, ParamValidator, ProviderError, TargetKind, ToolCall,
    ToolDescriptor,
    catalog::{default_alias_resolver, default_intent_recognizer},
};

//! Tool domain module
//!
//! Everything a dispatch attempt is made of, minus the execution itself.
//!
//! ```text
//! ┌──────────────────┐    ┌──────────────┐    ┌──────────────────┐
//! │ ToolDescriptor   │───▶│ ToolCall     │───▶│ DispatchResult   │
//! │ (catalog)        │    │ (attempt)    │    │ (outcome)        │
//! └──────────────────┘    └──────────────┘    └──────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ToolDescriptor`]: triggers, extractors and base confidence of a tool
//! - [`ToolCall`]: one dispatch attempt, immutable once built
//! - [`DispatchResult`]: payload or honest failure, never both
//! - [`ParamValidator`]: structural checks before invocation
//! - [`CapabilityProvider`]: a registry that can run capabilities
//!
//! Failure texts live in [`messages`]; they name the target and the cause
//! and state that nothing was performed.

pub mod catalog;
pub mod entities;
pub mod messages;
pub mod provider;
pub mod traits;
pub mod value_objects;

pub use entities::{InvocationMode, ParamMap, TargetKind, ToolCall, ToolDescriptor};
pub use provider::{BackendHint, BackendKind, CapabilityProvider, ProviderError};
pub use traits::{DefaultParamValidator, ParamValidator};
pub use value_objects::{DispatchOutcome, DispatchResult};

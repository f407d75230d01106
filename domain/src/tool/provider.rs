//! Capability provider abstraction
//!
//! This module defines the [`CapabilityProvider`] trait, which abstracts the
//! registries a capability can be backed by. The executor consults every
//! provider and the first one that reports a capability as available gets
//! the call.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     ProviderRegistry                        │
//! │  (aggregates providers, routes by priority)                 │
//! └─────────────────────────────────────────────────────────────┘
//!           │                      │                     │
//!           ▼                      ▼                     ▼
//!    ┌──────────────┐      ┌──────────────┐      ┌──────────────┐
//!    │   External   │      │     Web      │      │   Builtin    │
//!    │   commands   │      │  (reqwest)   │      │ shell / file │
//!    └──────────────┘      └──────────────┘      └──────────────┘
//!    priority: 75          priority: 0           priority: -100
//! ```
//!
//! # Backend Kinds
//!
//! | Kind | Meaning |
//! |------|---------|
//! | `builtin` | Compiled into the host application |
//! | `local` | Hosted on this machine by a separate process or plugin |
//! | `external` | Registered at runtime from configuration or a remote service |

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entities::ParamMap;

/// Error type for provider and executor operations.
///
/// `ExecutionFailed` displays its message verbatim so that the text that
/// reaches the user is the backend's own.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider or capability is not available
    #[error("Not available: {0}")]
    NotAvailable(String),

    /// Capability, agent or flow is unknown to this backend
    #[error("Not found: {0}")]
    NotFound(String),

    /// Arguments were rejected by the backend
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Execution failed
    #[error("{0}")]
    ExecutionFailed(String),

    /// Execution exceeded its time budget
    #[error("Timed out after {0} seconds")]
    Timeout(u64),
}

/// Which kind of registry backs a capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Builtin,
    Local,
    External,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Builtin => "builtin",
            BackendKind::Local => "local",
            BackendKind::External => "external",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The backend selected during the availability check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendHint {
    /// Id of the provider that reported the capability
    pub provider_id: String,
    pub kind: BackendKind,
}

impl BackendHint {
    pub fn new(provider_id: impl Into<String>, kind: BackendKind) -> Self {
        Self {
            provider_id: provider_id.into(),
            kind,
        }
    }
}

impl std::fmt::Display for BackendHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.provider_id)
    }
}

/// A registry of capabilities that can execute them.
///
/// Implementations:
/// - `BuiltinProvider`: shell commands and file operations
/// - `WebProvider`: page scraping, HTTP API calls and web search (`web-tools` feature)
/// - `ExternalCommandProvider`: command templates registered from config
#[async_trait]
pub trait CapabilityProvider: Send + Sync {
    /// Unique identifier for this provider (e.g., "builtin", "external")
    fn id(&self) -> &str;

    fn kind(&self) -> BackendKind;

    /// Priority for capability resolution (higher = consulted first)
    fn priority(&self) -> i32 {
        0
    }

    /// Canonical names this provider advertises
    fn capabilities(&self) -> Vec<String>;

    /// Check whether a capability can be served right now
    async fn is_available(&self, capability: &str) -> bool {
        self.capabilities().iter().any(|c| c == capability)
    }

    /// Run a capability with the given parameters
    async fn invoke(
        &self,
        capability: &str,
        params: &ParamMap,
    ) -> Result<serde_json::Value, ProviderError>;
}

//! Executor port
//!
//! Defines the interface the dispatcher uses to run tools, agents and
//! flows. The dispatcher never executes anything itself.

use async_trait::async_trait;
use relay_domain::{BackendHint, ParamMap, ProviderError};
use serde_json::Value;

/// Port for capability, agent and flow execution
///
/// Implementations (adapters) live in the infrastructure layer. A
/// capability may be backed by one of several registries; the adapter
/// checks all of them and reports the first that offers it.
#[async_trait]
pub trait ExecutorPort: Send + Sync {
    /// Backend currently offering a capability, or `None` if no registry does
    async fn backend_for(&self, capability: &str) -> Option<BackendHint>;

    /// Check if a capability is available in any registry
    async fn is_capability_available(&self, capability: &str) -> bool {
        self.backend_for(capability).await.is_some()
    }

    /// Canonical names of every capability currently advertised
    async fn available_capabilities(&self) -> Vec<String>;

    async fn is_agent_available(&self, agent: &str) -> bool;

    /// Run a capability on the backend chosen during the availability check
    async fn invoke_capability(
        &self,
        capability: &str,
        backend: &BackendHint,
        params: &ParamMap,
    ) -> Result<Value, ProviderError>;

    async fn invoke_agent(
        &self,
        agent: &str,
        params: &ParamMap,
        context: &ParamMap,
    ) -> Result<Value, ProviderError>;

    /// Run a flow. There is no availability pre-check for flows; a
    /// misconfigured flow is expected to fail here.
    async fn invoke_flow(
        &self,
        flow: &str,
        params: &ParamMap,
        context: &ParamMap,
    ) -> Result<Value, ProviderError>;
}

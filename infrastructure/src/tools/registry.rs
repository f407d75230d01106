//! Provider Registry
//!
//! The [`ProviderRegistry`] aggregates capability providers plus named
//! agent and flow handlers, and implements [`ExecutorPort`].
//!
//! # Usage
//!
//! ```ignore
//! use relay_infrastructure::tools::{BuiltinProvider, ExternalCommandProvider, ProviderRegistry};
//!
//! let registry = ProviderRegistry::new()
//!     .register(ExternalCommandProvider::from_config(&config.executor.external)) // priority: 75
//!     .register(BuiltinProvider::new());                                         // priority: -100
//!
//! let backend = registry.backend_for("execute_shell").await; // Some(builtin:builtin)
//! ```
//!
//! # Priority-Based Resolution
//!
//! Providers are consulted in descending priority. The first one that
//! reports a capability as available serves it, so a command registered in
//! config can take over a builtin capability of the same name.
//!
//! # Dry Run
//!
//! With [`with_dry_run`](ProviderRegistry::with_dry_run) every availability
//! check still runs, but invocations return a description of what would
//! have been executed instead of executing it.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use relay_application::ExecutorPort;
use relay_domain::{BackendHint, CapabilityProvider, ParamMap, ProviderError};
use serde_json::{Value, json};
use tracing::{debug, trace};

/// A named agent the executor can hand a request to
#[async_trait]
pub trait AgentHandler: Send + Sync {
    /// Whether the agent can take requests right now
    async fn is_available(&self) -> bool {
        true
    }

    async fn run(&self, params: &ParamMap, context: &ParamMap) -> Result<Value, ProviderError>;
}

/// A named multi-step flow
#[async_trait]
pub trait FlowHandler: Send + Sync {
    async fn run(&self, params: &ParamMap, context: &ParamMap) -> Result<Value, ProviderError>;
}

/// Executor that aggregates providers and routes by priority
pub struct ProviderRegistry {
    /// Sorted by descending priority; registration order breaks ties
    providers: Vec<Arc<dyn CapabilityProvider>>,
    agents: HashMap<String, Arc<dyn AgentHandler>>,
    flows: HashMap<String, Arc<dyn FlowHandler>>,
    dry_run: bool,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            agents: HashMap::new(),
            flows: HashMap::new(),
            dry_run: false,
        }
    }

    /// Register a capability provider
    pub fn register<P: CapabilityProvider + 'static>(self, provider: P) -> Self {
        self.register_arc(Arc::new(provider))
    }

    /// Register a capability provider (Arc version)
    pub fn register_arc(mut self, provider: Arc<dyn CapabilityProvider>) -> Self {
        debug!(
            provider = provider.id(),
            kind = %provider.kind(),
            priority = provider.priority(),
            "Registered capability provider"
        );
        self.providers.push(provider);
        self.providers.sort_by_key(|p| Reverse(p.priority()));
        self
    }

    pub fn with_agent(mut self, name: impl Into<String>, handler: Arc<dyn AgentHandler>) -> Self {
        self.agents.insert(name.into(), handler);
        self
    }

    pub fn with_flow(mut self, name: impl Into<String>, handler: Arc<dyn FlowHandler>) -> Self {
        self.flows.insert(name.into(), handler);
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Registered provider IDs in resolution order
    pub fn provider_ids(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    pub fn agent_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.agents.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn flow_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.flows.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get statistics about registered providers and handlers
    pub fn stats(&self) -> RegistryStats {
        let mut capabilities_per_provider = HashMap::new();
        let mut unique = BTreeSet::new();
        for provider in &self.providers {
            let caps = provider.capabilities();
            capabilities_per_provider.insert(provider.id().to_string(), caps.len());
            unique.extend(caps);
        }

        RegistryStats {
            total_providers: self.providers.len(),
            total_capabilities: unique.len(),
            capabilities_per_provider,
            agents: self.agents.len(),
            flows: self.flows.len(),
        }
    }

    fn dry_run_payload(
        target: &str,
        name: &str,
        backend: Option<String>,
        params: &ParamMap,
    ) -> Value {
        json!({
            "dry_run": true,
            "target": target,
            "name": name,
            "backend": backend,
            "params": params,
        })
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about the registry
#[derive(Debug, Clone)]
pub struct RegistryStats {
    pub total_providers: usize,
    pub total_capabilities: usize,
    pub capabilities_per_provider: HashMap<String, usize>,
    pub agents: usize,
    pub flows: usize,
}

#[async_trait]
impl ExecutorPort for ProviderRegistry {
    async fn backend_for(&self, capability: &str) -> Option<BackendHint> {
        for provider in &self.providers {
            if provider.is_available(capability).await {
                trace!(capability, provider = provider.id(), "Capability resolved");
                return Some(BackendHint::new(provider.id(), provider.kind()));
            }
        }
        debug!(capability, "No provider offers capability");
        None
    }

    async fn available_capabilities(&self) -> Vec<String> {
        let mut available = BTreeSet::new();
        for provider in &self.providers {
            for capability in provider.capabilities() {
                if !available.contains(&capability) && provider.is_available(&capability).await {
                    available.insert(capability);
                }
            }
        }
        available.into_iter().collect()
    }

    async fn is_agent_available(&self, agent: &str) -> bool {
        match self.agents.get(agent) {
            Some(handler) => handler.is_available().await,
            None => false,
        }
    }

    async fn invoke_capability(
        &self,
        capability: &str,
        backend: &BackendHint,
        params: &ParamMap,
    ) -> Result<Value, ProviderError> {
        let provider = self
            .providers
            .iter()
            .find(|p| p.id() == backend.provider_id)
            .ok_or_else(|| ProviderError::NotAvailable(format!("backend {}", backend)))?;

        if self.dry_run {
            return Ok(Self::dry_run_payload(
                "tool",
                capability,
                Some(backend.to_string()),
                params,
            ));
        }

        provider.invoke(capability, params).await
    }

    async fn invoke_agent(
        &self,
        agent: &str,
        params: &ParamMap,
        context: &ParamMap,
    ) -> Result<Value, ProviderError> {
        let handler = self
            .agents
            .get(agent)
            .ok_or_else(|| ProviderError::NotFound(format!("agent '{}'", agent)))?;

        if self.dry_run {
            return Ok(Self::dry_run_payload("agent", agent, None, params));
        }
        handler.run(params, context).await
    }

    async fn invoke_flow(
        &self,
        flow: &str,
        params: &ParamMap,
        context: &ParamMap,
    ) -> Result<Value, ProviderError> {
        let handler = self
            .flows
            .get(flow)
            .ok_or_else(|| ProviderError::NotFound(format!("flow '{}'", flow)))?;

        if self.dry_run {
            return Ok(Self::dry_run_payload("flow", flow, None, params));
        }
        handler.run(params, context).await
    }
}

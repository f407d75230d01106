//! Executor adapters
//!
//! Capabilities are served by providers, consulted in priority order by
//! the [`ProviderRegistry`]:
//!
//! - `external`: command templates from `[executor.external]` (75)
//! - `web`: scraping, HTTP API calls and search, with the `web-tools` feature (0)
//! - `builtin`: shell commands and file operations (-100)
//!
//! Agents and flows from `[executor.agents]` / `[executor.flows]` are
//! registered as command-backed handlers.

pub mod builtin;
pub mod command;
pub mod external;
pub mod file;
#[cfg(feature = "web-tools")]
pub mod web;

mod registry;

pub use builtin::BuiltinProvider;
pub use external::{CommandAgent, CommandFlow, CommandTemplate, ExternalCommandProvider};
pub use registry::{AgentHandler, FlowHandler, ProviderRegistry, RegistryStats};
#[cfg(feature = "web-tools")]
pub use web::WebProvider;

use std::sync::Arc;

use crate::config::FileExecutorConfig;

/// Build the registry described by `[executor]`.
///
/// `dry_run` is OR-ed with the config flag so the command line can force it.
pub fn registry_from_config(config: &FileExecutorConfig, dry_run: bool) -> ProviderRegistry {
    let timeout = config.command_timeout_secs;
    let working_dir = config.working_dir.clone();

    let mut registry = ProviderRegistry::new().with_dry_run(dry_run || config.dry_run);

    if !config.external.is_empty() {
        registry = registry.register(ExternalCommandProvider::from_config(
            &config.external,
            timeout,
            working_dir.clone(),
        ));
    }

    #[cfg(feature = "web-tools")]
    if config.web {
        match WebProvider::new() {
            Ok(provider) => registry = registry.register(provider),
            Err(e) => tracing::warn!(error = %e, "Web provider disabled"),
        }
    }

    if config.builtin {
        let mut builtin = BuiltinProvider::new().with_timeout_secs(timeout);
        if let Some(dir) = &working_dir {
            builtin = builtin.with_working_dir(dir);
        }
        registry = registry.register(builtin);
    }

    for (name, entry) in &config.agents {
        let template = CommandTemplate::from_config(entry, timeout, working_dir.clone());
        registry = registry.with_agent(name, Arc::new(CommandAgent::new(name, template)));
    }
    for (name, entry) in &config.flows {
        let template = CommandTemplate::from_config(entry, timeout, working_dir.clone());
        registry = registry.with_flow(name, Arc::new(CommandFlow::new(name, template)));
    }

    registry
}

//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application and
//! domain types by the methods on [`FileConfig`].

mod dispatch;
mod executor;
mod logging;

pub use dispatch::{FileAliasesConfig, FileDispatchConfig, FileSelfTestConfig};
pub use executor::{FileCommandConfig, FileExecutorConfig, tool_key};
pub use logging::FileLoggingConfig;

use relay_application::DispatchParams;
use relay_domain::tool::catalog::CANONICAL_TOOLS;
use relay_domain::{AliasResolver, default_alias_resolver};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("dispatch.min_confidence must be within [0, 1], got {0}")]
    InvalidMinConfidence(f64),

    #[error("self_test.concurrency cannot be 0")]
    ZeroConcurrency,

    #[error("executor.command_timeout_secs cannot be 0")]
    InvalidTimeout,

    #[error("executor.{section}.{name}: command cannot be empty")]
    EmptyCommand { section: &'static str, name: String },

    #[error("aliases.extra.{alias}: unknown target '{target}'")]
    UnknownAliasTarget { alias: String, target: String },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub dispatch: FileDispatchConfig,
    pub aliases: FileAliasesConfig,
    pub executor: FileExecutorConfig,
    pub self_test: FileSelfTestConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration, stopping at the first problem
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let min = self.dispatch.min_confidence;
        if !(0.0..=1.0).contains(&min) {
            return Err(ConfigValidationError::InvalidMinConfidence(min));
        }

        if self.self_test.concurrency == 0 {
            return Err(ConfigValidationError::ZeroConcurrency);
        }

        if self.executor.command_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        for (section, entries) in [
            ("external", &self.executor.external),
            ("agents", &self.executor.agents),
            ("flows", &self.executor.flows),
        ] {
            if let Some((name, _)) = entries.iter().find(|(_, c)| c.command.trim().is_empty()) {
                return Err(ConfigValidationError::EmptyCommand {
                    section,
                    name: name.clone(),
                });
            }
        }

        let external = self.executor.external_tool_names();
        for (alias, target) in &self.aliases.extra {
            let key = tool_key(target);
            let known = CANONICAL_TOOLS.contains(&key.as_str()) || external.contains(&key);
            if !known {
                return Err(ConfigValidationError::UnknownAliasTarget {
                    alias: alias.clone(),
                    target: target.clone(),
                });
            }
        }

        Ok(())
    }

    /// Dispatcher parameters derived from `[dispatch]` and `[self_test]`
    pub fn dispatch_params(&self) -> DispatchParams {
        DispatchParams::default()
            .with_min_confidence(self.dispatch.min_confidence)
            .with_suggestion_limit(self.dispatch.suggestion_limit)
            .with_self_test_concurrency(self.self_test.concurrency)
    }

    /// The built-in alias table extended with external tools and `[aliases.extra]`.
    ///
    /// External tool names become canonical names of their own. Extra
    /// aliases that try to redirect an existing canonical name are ignored.
    pub fn build_alias_resolver(&self) -> AliasResolver {
        let mut resolver =
            default_alias_resolver().with_min_containment_len(self.aliases.min_containment_len);

        for name in self.executor.external_tool_names() {
            resolver.register_tool(&name);
        }
        for (alias, target) in &self.aliases.extra {
            if !resolver.register_alias(alias, target) {
                tracing::warn!(alias, target, "Ignoring alias that shadows a canonical name");
            }
        }
        resolver
    }
}

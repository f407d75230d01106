//! Built-in capability provider
//!
//! Serves `execute_shell` and `file_operations` in-process. It has the
//! lowest priority so that any configured provider can take a capability
//! over.

use async_trait::async_trait;
use relay_domain::tool::catalog::{EXECUTE_SHELL, FILE_OPERATIONS};
use relay_domain::{BackendKind, CapabilityProvider, ParamMap, ProviderError};
use serde_json::Value;
use std::path::PathBuf;

use crate::tools::{command, file};

/// Priority for the built-in provider (lowest, used as fallback)
pub const BUILTIN_PRIORITY: i32 = -100;

/// Built-in capability provider
#[derive(Debug, Clone)]
pub struct BuiltinProvider {
    working_dir: Option<PathBuf>,
    timeout_secs: u64,
}

impl BuiltinProvider {
    pub fn new() -> Self {
        Self {
            working_dir: None,
            timeout_secs: command::DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the working directory for commands and relative paths
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    async fn execute_shell(&self, params: &ParamMap) -> Result<Value, ProviderError> {
        let command = params
            .get("command")
            .and_then(Value::as_str)
            .ok_or_else(|| ProviderError::InvalidArguments("'command' is required".to_string()))?;

        // A per-call working_dir wins over the provider default
        let working_dir = params
            .get("working_dir")
            .and_then(Value::as_str)
            .map(PathBuf::from)
            .or_else(|| self.working_dir.clone());

        let output = command::run_shell(command, working_dir.as_deref(), self.timeout_secs).await?;
        Ok(output.to_value())
    }
}

impl Default for BuiltinProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CapabilityProvider for BuiltinProvider {
    fn id(&self) -> &str {
        "builtin"
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Builtin
    }

    fn priority(&self) -> i32 {
        BUILTIN_PRIORITY
    }

    fn capabilities(&self) -> Vec<String> {
        vec![EXECUTE_SHELL.to_string(), FILE_OPERATIONS.to_string()]
    }

    async fn invoke(&self, capability: &str, params: &ParamMap) -> Result<Value, ProviderError> {
        match capability {
            EXECUTE_SHELL => self.execute_shell(params).await,
            FILE_OPERATIONS => {
                file::execute_file_operation(params, self.working_dir.as_deref()).await
            }
            other => Err(ProviderError::NotFound(other.to_string())),
        }
    }
}

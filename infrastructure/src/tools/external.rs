//! External command provider: config-registered capabilities, agents and
//! flows backed by shell command templates.
//!
//! Each entry wraps a command template with `{param_name}` placeholders.
//! All parameter values are shell-escaped before substitution.
//!
//! # Example Configuration
//!
//! ```toml
//! [executor.external.gh_issue]
//! description = "Create a GitHub issue"
//! command = "gh issue create --title {title} --body {body}"
//!
//! [executor.agents.reviewer]
//! command = "review-bot --repo {repo} --session {session_id}"
//! ```
//!
//! Agent and flow templates see the call parameters first and the call
//! context second, so `{session_id}` above can come from either.

use async_trait::async_trait;
use relay_domain::{BackendKind, CapabilityProvider, ParamMap, ProviderError};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

use super::command::{self, CommandOutput};
use super::registry::{AgentHandler, FlowHandler};
use crate::config::{FileCommandConfig, tool_key};

/// Priority for the external provider (highest: overrides builtin names)
pub const EXTERNAL_PRIORITY: i32 = 75;

/// A command template ready to run
#[derive(Debug, Clone, PartialEq)]
pub struct CommandTemplate {
    pub description: String,
    pub template: String,
    pub timeout_secs: u64,
    pub working_dir: Option<PathBuf>,
}

impl CommandTemplate {
    pub fn from_config(
        config: &FileCommandConfig,
        default_timeout_secs: u64,
        working_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            description: config.description.clone(),
            template: config.command.clone(),
            timeout_secs: config.timeout_secs.unwrap_or(default_timeout_secs),
            working_dir,
        }
    }

    pub fn render(&self, lookups: &[&ParamMap]) -> String {
        command::render_template(&self.template, lookups)
    }

    /// Render and run. A non-zero exit status is an execution failure.
    pub async fn run(&self, lookups: &[&ParamMap]) -> Result<Value, ProviderError> {
        let rendered = self.render(lookups);
        let output =
            command::run_shell(&rendered, self.working_dir.as_deref(), self.timeout_secs).await?;
        check_exit(output)
    }
}

fn check_exit(output: CommandOutput) -> Result<Value, ProviderError> {
    if output.success() {
        return Ok(output.to_value());
    }

    let detail = if output.stderr.trim().is_empty() {
        output.stdout.trim()
    } else {
        output.stderr.trim()
    };
    let code = output
        .exit_code
        .map(|c| c.to_string())
        .unwrap_or_else(|| "signal".to_string());
    Err(ProviderError::ExecutionFailed(if detail.is_empty() {
        format!("command exited with status {}", code)
    } else {
        format!(
            "command exited with status {}: {}",
            code,
            relay_domain::core::string::truncate(detail, 500)
        )
    }))
}

/// Provider for capabilities declared under `[executor.external]`
#[derive(Debug, Clone, Default)]
pub struct ExternalCommandProvider {
    tools: BTreeMap<String, CommandTemplate>,
}

impl ExternalCommandProvider {
    pub fn from_config(
        configs: &BTreeMap<String, FileCommandConfig>,
        default_timeout_secs: u64,
        working_dir: Option<PathBuf>,
    ) -> Self {
        let tools = configs
            .iter()
            .map(|(name, config)| {
                (
                    tool_key(name),
                    CommandTemplate::from_config(config, default_timeout_secs, working_dir.clone()),
                )
            })
            .collect();
        Self { tools }
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn description(&self, name: &str) -> Option<&str> {
        self.tools.get(name).map(|t| t.description.as_str())
    }
}

#[async_trait]
impl CapabilityProvider for ExternalCommandProvider {
    fn id(&self) -> &str {
        "external"
    }

    fn kind(&self) -> BackendKind {
        BackendKind::External
    }

    fn priority(&self) -> i32 {
        EXTERNAL_PRIORITY
    }

    fn capabilities(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    async fn invoke(&self, capability: &str, params: &ParamMap) -> Result<Value, ProviderError> {
        let tool = self
            .tools
            .get(capability)
            .ok_or_else(|| ProviderError::NotFound(capability.to_string()))?;
        debug!(capability, template = %tool.template, "Running external command");
        tool.run(&[params]).await
    }
}

/// Agent backed by a command template
#[derive(Debug, Clone)]
pub struct CommandAgent {
    name: String,
    template: CommandTemplate,
}

impl CommandAgent {
    pub fn new(name: impl Into<String>, template: CommandTemplate) -> Self {
        Self {
            name: name.into(),
            template,
        }
    }
}

#[async_trait]
impl AgentHandler for CommandAgent {
    async fn run(&self, params: &ParamMap, context: &ParamMap) -> Result<Value, ProviderError> {
        debug!(agent = %self.name, "Running agent command");
        let output = self.template.run(&[params, context]).await?;
        Ok(json!({ "agent": self.name, "output": output }))
    }
}

/// Flow backed by a command template
#[derive(Debug, Clone)]
pub struct CommandFlow {
    name: String,
    template: CommandTemplate,
}

impl CommandFlow {
    pub fn new(name: impl Into<String>, template: CommandTemplate) -> Self {
        Self {
            name: name.into(),
            template,
        }
    }
}

#[async_trait]
impl FlowHandler for CommandFlow {
    async fn run(&self, params: &ParamMap, context: &ParamMap) -> Result<Value, ProviderError> {
        debug!(flow = %self.name, "Running flow command");
        let output = self.template.run(&[params, context]).await?;
        Ok(json!({ "flow": self.name, "output": output }))
    }
}

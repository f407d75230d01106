//! Executor section (`[executor]`)
//!
//! ```toml
//! [executor]
//! dry_run = false
//! working_dir = "/srv/project"
//! command_timeout_secs = 60
//!
//! [executor.external.gh_issue]
//! description = "Create a GitHub issue"
//! command = "gh issue create --title {title} --body {body}"
//!
//! [executor.agents.reviewer]
//! command = "review-bot --repo {repo}"
//!
//! [executor.flows.nightly]
//! command = "./scripts/nightly.sh {date}"
//! timeout_secs = 900
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// `[executor]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutorConfig {
    /// Describe invocations instead of running them
    pub dry_run: bool,
    /// Working directory for commands and relative file paths
    pub working_dir: Option<PathBuf>,
    pub command_timeout_secs: u64,
    /// Register the builtin shell/file provider
    pub builtin: bool,
    /// Register the HTTP provider (only with the `web-tools` feature)
    pub web: bool,
    /// Command-template tools registered at runtime
    pub external: BTreeMap<String, FileCommandConfig>,
    pub agents: BTreeMap<String, FileCommandConfig>,
    pub flows: BTreeMap<String, FileCommandConfig>,
}

impl Default for FileExecutorConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            working_dir: None,
            command_timeout_secs: 60,
            builtin: true,
            web: true,
            external: BTreeMap::new(),
            agents: BTreeMap::new(),
            flows: BTreeMap::new(),
        }
    }
}

impl FileExecutorConfig {
    /// `[executor.external]` names as the alias resolver stores them
    pub fn external_tool_names(&self) -> Vec<String> {
        self.external.keys().map(|name| tool_key(name)).collect()
    }
}

/// Tool names are case-insensitive: trimmed and lower-cased
pub fn tool_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A command template with `{param}` placeholders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCommandConfig {
    pub description: String,
    pub command: String,
    /// Overrides `command_timeout_secs` for this entry
    pub timeout_secs: Option<u64>,
}

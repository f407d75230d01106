//! Dispatch, alias and self-test sections (`[dispatch]`, `[aliases]`, `[self_test]`)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `[dispatch]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDispatchConfig {
    /// Gate for intent-driven dispatch, in [0, 1]
    pub min_confidence: f64,
    /// Suggestions attached to a TOOL_NOT_FOUND result
    pub suggestion_limit: usize,
}

impl Default for FileDispatchConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            suggestion_limit: 5,
        }
    }
}

/// `[aliases]` section
///
/// ```toml
/// [aliases]
/// min_containment_len = 4
///
/// [aliases.extra]
/// sh = "execute_shell"
/// fetch_page = "web_scraper"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAliasesConfig {
    /// Alias → canonical name, merged over the built-in table
    pub extra: BTreeMap<String, String>,
    /// Shortest name allowed to resolve by substring containment (0 = no limit)
    pub min_containment_len: usize,
}

/// `[self_test]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSelfTestConfig {
    /// Maximum number of self-test calls in flight
    pub concurrency: usize,
}

impl Default for FileSelfTestConfig {
    fn default() -> Self {
        Self { concurrency: 4 }
    }
}

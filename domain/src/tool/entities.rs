//! Tool domain entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// String-keyed parameter map passed to tools, agents and flows
pub type ParamMap = BTreeMap<String, serde_json::Value>;

/// How a tool was selected for a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvocationMode {
    /// Selected by confidence-gated recognition of free text
    Auto,
    /// Named explicitly by the caller
    Forced,
    /// Display-only candidate, never executed
    Suggested,
}

impl InvocationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvocationMode::Auto => "auto",
            InvocationMode::Forced => "forced",
            InvocationMode::Suggested => "suggested",
        }
    }
}

impl std::fmt::Display for InvocationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InvocationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(InvocationMode::Auto),
            "forced" => Ok(InvocationMode::Forced),
            "suggested" => Ok(InvocationMode::Suggested),
            other => Err(format!("Unknown invocation mode: {}", other)),
        }
    }
}

/// Kind of object a dispatch targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Tool,
    Agent,
    Flow,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Tool => "tool",
            TargetKind::Agent => "agent",
            TargetKind::Flow => "flow",
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ordered extraction patterns for one parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamExtractor {
    /// Parameter name the extracted value is stored under
    pub param: String,
    /// Patterns tried in order; the first non-empty capture wins
    pub patterns: Vec<String>,
}

/// Static description of a recognizable tool.
///
/// Patterns are kept as source strings here and compiled once by
/// [`IntentRecognizer::new`](crate::IntentRecognizer::new).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique canonical identifier (e.g., "execute_shell")
    pub canonical_name: String,
    /// Human-readable description
    pub description: String,
    /// Case-insensitive patterns that indicate this tool is requested
    pub trigger_patterns: Vec<String>,
    /// Parameter extractors, in declaration order
    pub extractors: Vec<ParamExtractor>,
    /// Score assigned when any trigger pattern matches
    pub base_confidence: f64,
}

impl ToolDescriptor {
    pub fn new(
        canonical_name: impl Into<String>,
        description: impl Into<String>,
        base_confidence: f64,
    ) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            description: description.into(),
            trigger_patterns: Vec::new(),
            extractors: Vec::new(),
            base_confidence,
        }
    }

    pub fn with_trigger(mut self, pattern: impl Into<String>) -> Self {
        self.trigger_patterns.push(pattern.into());
        self
    }

    pub fn with_triggers(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.trigger_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Add extraction patterns for a parameter.
    ///
    /// Calling this twice for the same parameter appends to its pattern list.
    pub fn with_extractor(
        mut self,
        param: impl Into<String>,
        patterns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let param = param.into();
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        match self.extractors.iter_mut().find(|e| e.param == param) {
            Some(existing) => existing.patterns.extend(patterns),
            None => self.extractors.push(ParamExtractor { param, patterns }),
        }
        self
    }

    /// Names of the parameters this tool declares extractors for
    pub fn declared_params(&self) -> impl Iterator<Item = &str> {
        self.extractors.iter().map(|e| e.param.as_str())
    }
}

/// One dispatch attempt.
///
/// Built once the target name has been resolved (or failed to resolve)
/// and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// What kind of object is being invoked
    pub target: TargetKind,
    /// Canonical name, `None` when resolution failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_name: Option<String>,
    /// Name exactly as supplied by the caller
    pub original_name: String,
    pub mode: InvocationMode,
    pub params: ParamMap,
    #[serde(default)]
    pub context: ParamMap,
    pub created_at: DateTime<Utc>,
    /// Free text the call originated from (empty for explicit calls)
    #[serde(default)]
    pub source_text: String,
}

impl ToolCall {
    pub fn new(target: TargetKind, original_name: impl Into<String>, mode: InvocationMode) -> Self {
        Self {
            target,
            canonical_name: None,
            original_name: original_name.into(),
            mode,
            params: ParamMap::new(),
            context: ParamMap::new(),
            created_at: Utc::now(),
            source_text: String::new(),
        }
    }

    pub fn with_canonical(mut self, canonical: impl Into<String>) -> Self {
        self.canonical_name = Some(canonical.into());
        self
    }

    pub fn with_params(mut self, params: ParamMap) -> Self {
        self.params = params;
        self
    }

    pub fn with_context(mut self, context: ParamMap) -> Self {
        self.context = context;
        self
    }

    pub fn with_source_text(mut self, text: impl Into<String>) -> Self {
        self.source_text = text.into();
        self
    }

    /// Canonical name when resolved, otherwise the name as supplied
    pub fn display_name(&self) -> &str {
        self.canonical_name.as_deref().unwrap_or(&self.original_name)
    }

    /// Get a string parameter
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_mode_roundtrip_str() {
        for mode in [
            InvocationMode::Auto,
            InvocationMode::Forced,
            InvocationMode::Suggested,
        ] {
            assert_eq!(mode.as_str().parse::<InvocationMode>().unwrap(), mode);
        }
        assert!("sometimes".parse::<InvocationMode>().is_err());
        assert_eq!(" FORCED ".parse::<InvocationMode>().unwrap(), InvocationMode::Forced);
    }

    #[test]
    fn test_descriptor_builder() {
        let tool = ToolDescriptor::new("execute_shell", "Run shell commands", 0.9)
            .with_trigger(r"\bexecute\b")
            .with_triggers([r"\bвыполни\b", r"\bзапусти\b"])
            .with_extractor("command", [r"execute\s+(.+)"])
            .with_extractor("command", [r"`([^`]+)`"]);

        assert_eq!(tool.trigger_patterns.len(), 3);
        assert_eq!(tool.extractors.len(), 1);
        assert_eq!(tool.extractors[0].patterns.len(), 2);
        assert_eq!(tool.declared_params().collect::<Vec<_>>(), vec!["command"]);
    }

    #[test]
    fn test_tool_call_display_name() {
        let call = ToolCall::new(TargetKind::Tool, "Run_Command", InvocationMode::Forced);
        assert_eq!(call.display_name(), "Run_Command");

        let call = call.with_canonical("execute_shell");
        assert_eq!(call.display_name(), "execute_shell");
        assert_eq!(call.original_name, "Run_Command");
    }

    #[test]
    fn test_tool_call_serializes_mode_lowercase() {
        let mut params = ParamMap::new();
        params.insert("command".to_string(), "ls".into());
        let call = ToolCall::new(TargetKind::Tool, "shell", InvocationMode::Auto)
            .with_canonical("execute_shell")
            .with_params(params);

        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(json["mode"], "auto");
        assert_eq!(json["target"], "tool");
        assert_eq!(json["params"]["command"], "ls");
        assert_eq!(call.get_string("command"), Some("ls"));
    }
}

//! Intent recognition entities

use crate::tool::entities::{InvocationMode, ParamMap};
use serde::{Deserialize, Serialize};

/// One candidate tool for a piece of free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentMatch {
    /// Canonical tool name
    pub tool_name: String,
    /// Score in [0, 1]
    pub confidence: f64,
    pub mode: InvocationMode,
    pub extracted_params: ParamMap,
    /// Patterns and heuristics that produced this match (diagnostics)
    pub matched_patterns: Vec<String>,
    pub source_text: String,
}

impl IntentMatch {
    /// A match for an explicitly named tool: confidence 1.0, no scoring
    pub fn forced(tool_name: impl Into<String>, source_text: impl Into<String>, params: ParamMap) -> Self {
        let tool_name = tool_name.into();
        Self {
            matched_patterns: vec![format!("forced:{}", tool_name)],
            tool_name,
            confidence: 1.0,
            mode: InvocationMode::Forced,
            extracted_params: params,
            source_text: source_text.into(),
        }
    }

    pub fn is_forced(&self) -> bool {
        self.mode == InvocationMode::Forced
    }
}

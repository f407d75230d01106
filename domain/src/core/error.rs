//! Domain error types

use thiserror::Error;

/// Errors raised while building the tool registry.
///
/// These only occur at construction time. Once an [`IntentRecognizer`](crate::IntentRecognizer)
/// is built, recognition itself never fails.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid pattern for tool '{tool}': {pattern}: {source}")]
    InvalidPattern {
        tool: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Base confidence for tool '{tool}' must be within [0, 1], got {value}")]
    InvalidConfidence { tool: String, value: f64 },

    #[error("Tool registered twice: {0}")]
    DuplicateTool(String),

    #[error("Tool name cannot be empty")]
    EmptyToolName,
}

impl DomainError {
    /// Name of the tool the error refers to, if any
    pub fn tool(&self) -> Option<&str> {
        match self {
            DomainError::InvalidPattern { tool, .. } | DomainError::InvalidConfidence { tool, .. } => {
                Some(tool)
            }
            DomainError::DuplicateTool(tool) => Some(tool),
            DomainError::EmptyToolName => None,
        }
    }
}

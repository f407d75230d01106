//! Tool domain value objects: dispatch outcome and result types
//!
//! These types form the **output side** of the dispatch pipeline.
//! Every dispatch attempt produces exactly one [`DispatchResult`] whose
//! [`DispatchOutcome`] is drawn from a closed set:
//!
//! | Outcome | Recoverable? | Description |
//! |---------|--------------|-------------|
//! | `SUCCESS` | - | Executor returned normally, payload attached |
//! | `TOOL_NOT_FOUND` | Yes | Name did not resolve; suggestions attached |
//! | `TOOL_UNAVAILABLE` | Yes | Resolved, but no backend currently offers it |
//! | `INVALID_PARAMS` | Yes | Structural validation failed before invocation |
//! | `EXECUTION_ERROR` | No retry | Executor raised; message preserved in `cause` |

use super::entities::ToolCall;
use serde::{Deserialize, Serialize, Serializer};
use std::time::Duration;

/// Closed-set classification of a dispatch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DispatchOutcome {
    Success,
    ToolNotFound,
    ToolUnavailable,
    ExecutionError,
    InvalidParams,
}

impl DispatchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchOutcome::Success => "SUCCESS",
            DispatchOutcome::ToolNotFound => "TOOL_NOT_FOUND",
            DispatchOutcome::ToolUnavailable => "TOOL_UNAVAILABLE",
            DispatchOutcome::ExecutionError => "EXECUTION_ERROR",
            DispatchOutcome::InvalidParams => "INVALID_PARAMS",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Success)
    }

    /// Whether the caller can reasonably fix the problem and try again
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DispatchOutcome::ToolNotFound
                | DispatchOutcome::ToolUnavailable
                | DispatchOutcome::InvalidParams
        )
    }
}

impl std::fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn serialize_millis<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(elapsed.as_millis() as u64)
}

/// Structured result of one dispatch attempt.
///
/// Exactly one of [`payload`](Self::payload) and
/// [`error_message`](Self::error_message) is present. The only constructors
/// are [`success`](Self::success) and [`failure`](Self::failure), which
/// uphold that.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResult {
    pub outcome: DispatchOutcome,
    pub call: ToolCall,
    /// Executor return value (success only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    /// User-facing failure text naming the target and the real cause
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Underlying failure reason, verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
    /// Canonical names the caller may have meant (TOOL_NOT_FOUND only)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl DispatchResult {
    /// Create a successful result
    pub fn success(call: ToolCall, payload: serde_json::Value, elapsed: Duration) -> Self {
        Self {
            outcome: DispatchOutcome::Success,
            call,
            payload: Some(payload),
            error_message: None,
            cause: None,
            elapsed,
            suggestions: Vec::new(),
        }
    }

    /// Create a failed result.
    ///
    /// Passing [`DispatchOutcome::Success`] here is a contract violation and
    /// is recorded as an execution error instead.
    pub fn failure(
        call: ToolCall,
        outcome: DispatchOutcome,
        message: impl Into<String>,
        cause: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        debug_assert!(!outcome.is_success(), "failure() called with SUCCESS");
        let outcome = if outcome.is_success() {
            DispatchOutcome::ExecutionError
        } else {
            outcome
        };
        Self {
            outcome,
            call,
            payload: None,
            error_message: Some(message.into()),
            cause: Some(cause.into()),
            elapsed,
            suggestions: Vec::new(),
        }
    }

    /// Attach suggestions (kept only for TOOL_NOT_FOUND)
    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        if self.outcome == DispatchOutcome::ToolNotFound {
            self.suggestions = suggestions;
        }
        self
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    pub fn payload(&self) -> Option<&serde_json::Value> {
        self.payload.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

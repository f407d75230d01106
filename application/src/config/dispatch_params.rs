//! Dispatch parameters: use case behavior control.
//!
//! [`DispatchParams`] groups the static parameters that control the
//! [`Dispatcher`](crate::use_cases::dispatch::Dispatcher) and the self-test
//! harness. These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};

/// Dispatch control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchParams {
    /// Minimum confidence an intent needs before it is dispatched automatically.
    pub min_confidence: f64,
    /// Maximum number of suggestions attached to a TOOL_NOT_FOUND result.
    pub suggestion_limit: usize,
    /// Maximum number of self-test calls in flight.
    pub self_test_concurrency: usize,
}

impl Default for DispatchParams {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            suggestion_limit: 5,
            self_test_concurrency: 4,
        }
    }
}

impl DispatchParams {
    // ==================== Builder Methods ====================

    pub fn with_min_confidence(mut self, min: f64) -> Self {
        self.min_confidence = min;
        self
    }

    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }

    pub fn with_self_test_concurrency(mut self, concurrency: usize) -> Self {
        self.self_test_concurrency = concurrency;
        self
    }
}

//! Aggregate dispatch counters.

use relay_domain::{DispatchOutcome, DispatchResult, InvocationMode, TargetKind};
use serde::Serialize;
use std::collections::BTreeMap;

/// Process-lifetime usage counters.
///
/// Counters only ever grow; there is no reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchStats {
    pub total_calls: u64,
    pub successful_calls: u64,
    pub failed_calls: u64,
    pub by_mode: BTreeMap<InvocationMode, u64>,
    /// Canonical tool name → calls (unresolved names are not counted here)
    pub by_tool: BTreeMap<String, u64>,
    pub by_outcome: BTreeMap<DispatchOutcome, u64>,
}

impl DispatchStats {
    pub fn record(&mut self, result: &DispatchResult) {
        self.total_calls += 1;
        if result.is_success() {
            self.successful_calls += 1;
        } else {
            self.failed_calls += 1;
        }
        *self.by_mode.entry(result.call.mode).or_default() += 1;
        *self.by_outcome.entry(result.outcome).or_default() += 1;

        if result.call.target == TargetKind::Tool
            && let Some(name) = &result.call.canonical_name
        {
            *self.by_tool.entry(name.clone()).or_default() += 1;
        }
    }

    /// Share of successful calls in [0, 1] (0 when nothing was dispatched)
    pub fn success_rate(&self) -> f64 {
        if self.total_calls == 0 {
            0.0
        } else {
            self.successful_calls as f64 / self.total_calls as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_domain::ToolCall;
    use std::time::Duration;

    #[test]
    fn test_record_counts_everything() {
        let mut stats = DispatchStats::default();

        let ok = DispatchResult::success(
            ToolCall::new(TargetKind::Tool, "bash", InvocationMode::Forced)
                .with_canonical("execute_shell"),
            serde_json::json!({}),
            Duration::ZERO,
        );
        let missing = DispatchResult::failure(
            ToolCall::new(TargetKind::Tool, "nope", InvocationMode::Auto),
            DispatchOutcome::ToolNotFound,
            "m",
            "c",
            Duration::ZERO,
        );
        let agent = DispatchResult::failure(
            ToolCall::new(TargetKind::Agent, "researcher", InvocationMode::Forced)
                .with_canonical("researcher"),
            DispatchOutcome::ToolUnavailable,
            "m",
            "c",
            Duration::ZERO,
        );

        stats.record(&ok);
        stats.record(&missing);
        stats.record(&agent);

        assert_eq!(stats.total_calls, 3);
        assert_eq!(stats.successful_calls, 1);
        assert_eq!(stats.failed_calls, 2);
        assert_eq!(stats.by_mode[&InvocationMode::Forced], 2);
        assert_eq!(stats.by_mode[&InvocationMode::Auto], 1);
        assert_eq!(stats.by_tool.len(), 1);
        assert_eq!(stats.by_tool["execute_shell"], 1);
        assert_eq!(stats.by_outcome[&DispatchOutcome::ToolNotFound], 1);
        assert!((stats.success_rate() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_serializes_with_string_keys() {
        let mut stats = DispatchStats::default();
        stats.record(&DispatchResult::success(
            ToolCall::new(TargetKind::Tool, "translate", InvocationMode::Auto)
                .with_canonical("translator"),
            serde_json::json!("hola"),
            Duration::ZERO,
        ));
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["by_mode"]["auto"], 1);
        assert_eq!(json["by_outcome"]["SUCCESS"], 1);
        assert_eq!(json["by_tool"]["translator"], 1);
    }
}

//! JSON output formatter

use crate::output::formatter::{OutputFormatter, Resolution};
use relay_application::{DispatchStats, SelfTestReport};
use relay_domain::{DispatchResult, IntentMatch};
use serde::Serialize;
use serde_json::json;

/// Formats results as pretty-printed JSON
pub struct JsonFormatter;

impl JsonFormatter {
    fn render<T: Serialize + ?Sized>(value: &T) -> String {
        match serde_json::to_string_pretty(value) {
            Ok(mut s) => {
                s.push('\n');
                s
            }
            Err(e) => format!("{{\"error\": \"serialization failed: {}\"}}\n", e),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn dispatch_result(&self, result: &DispatchResult) -> String {
        Self::render(result)
    }

    fn no_match(&self, text: &str, threshold: f64, candidates: &[IntentMatch]) -> String {
        Self::render(&json!({
            "matched": false,
            "text": text,
            "threshold": threshold,
            "candidates": candidates,
        }))
    }

    fn suggestions(&self, _text: &str, matches: &[IntentMatch]) -> String {
        Self::render(matches)
    }

    fn resolution(&self, resolution: &Resolution) -> String {
        Self::render(resolution)
    }

    fn tools(&self, tools: &[String]) -> String {
        Self::render(tools)
    }

    fn self_test(&self, report: &SelfTestReport, stats: &DispatchStats) -> String {
        Self::render(&json!({ "report": report, "stats": stats }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_domain::{DispatchOutcome, InvocationMode, TargetKind, ToolCall};
    use serde_json::Value;
    use std::time::Duration;

    #[test]
    fn test_dispatch_result_fields() {
        let result = DispatchResult::failure(
            ToolCall::new(TargetKind::Tool, "web_scraper", InvocationMode::Auto)
                .with_canonical("web_scraper"),
            DispatchOutcome::ToolUnavailable,
            "Tool 'web_scraper' is not available",
            "no backend",
            Duration::from_millis(12),
        );
        let value: Value = serde_json::from_str(&JsonFormatter.dispatch_result(&result)).unwrap();
        assert_eq!(value["outcome"], "TOOL_UNAVAILABLE");
        assert_eq!(value["elapsed_ms"], 12);
        assert_eq!(value["call"]["canonical_name"], "web_scraper");
        assert!(value.get("payload").is_none());
    }

    #[test]
    fn test_no_match_is_explicit() {
        let value: Value =
            serde_json::from_str(&JsonFormatter.no_match("hi", 0.5, &[])).unwrap();
        assert_eq!(value["matched"], false);
        assert_eq!(value["candidates"], json!([]));
    }

    #[test]
    fn test_resolution() {
        let value: Value = serde_json::from_str(&JsonFormatter.resolution(&Resolution {
            input: "bash".to_string(),
            canonical: Some("execute_shell".to_string()),
            aliases: vec!["bash".to_string(), "shell".to_string()],
            suggestions: vec![],
        }))
        .unwrap();
        assert_eq!(value["canonical"], "execute_shell");
        assert_eq!(value["aliases"][1], "shell");
    }
}

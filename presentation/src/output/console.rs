//! Console output formatter for dispatch results

use crate::output::formatter::{OutputFormatter, Resolution};
use colored::Colorize;
use relay_application::{DispatchStats, SelfTestReport};
use relay_domain::core::string::preview_value;
use relay_domain::{DispatchOutcome, DispatchResult, IntentMatch, TargetKind};
use serde_json::Value;

const PARAM_PREVIEW_LEN: usize = 60;

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    fn outcome_label(outcome: DispatchOutcome) -> String {
        match outcome {
            DispatchOutcome::Success => format!("{} {}", "✓".green(), outcome.as_str().green().bold()),
            DispatchOutcome::ToolNotFound | DispatchOutcome::ToolUnavailable => {
                format!("{} {}", "✗".yellow(), outcome.as_str().yellow().bold())
            }
            _ => format!("{} {}", "✗".red(), outcome.as_str().red().bold()),
        }
    }

    fn target_line(result: &DispatchResult) -> String {
        let call = &result.call;
        let mut line = match (&call.canonical_name, call.target) {
            (Some(canonical), TargetKind::Tool) if *canonical != call.original_name => {
                format!("{} ({} '{}')", canonical.bold(), "from".dimmed(), call.original_name)
            }
            _ => call.display_name().bold().to_string(),
        };
        if call.target != TargetKind::Tool {
            line = format!("{} {}", call.target.as_str(), line);
        }
        format!(
            "{} {}",
            line,
            format!("[{} | {} ms]", call.mode, result.elapsed.as_millis()).dimmed()
        )
    }

    fn is_dry_run(result: &DispatchResult) -> bool {
        result
            .payload()
            .and_then(|p| p.get("dry_run"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    fn payload_text(payload: &Value) -> String {
        match payload {
            Value::String(s) => s.clone(),
            other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        }
    }

    fn match_line(m: &IntentMatch) -> String {
        let params = m
            .extracted_params
            .iter()
            .map(|(k, v)| format!("{}={}", k, preview_value(v, PARAM_PREVIEW_LEN)))
            .collect::<Vec<_>>()
            .join(", ");
        let mut line = format!("  {:.2}  {}", m.confidence, m.tool_name.bold());
        if !params.is_empty() {
            line.push_str(&format!("  {}", params));
        }
        line
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn dispatch_result(&self, result: &DispatchResult) -> String {
        let mut label = Self::outcome_label(result.outcome);
        if Self::is_dry_run(result) {
            label = format!("{} {}", label, "(dry run, nothing executed)".yellow());
        }
        let mut output = format!("{} {}\n", label, Self::target_line(result));

        if let Some(payload) = result.payload() {
            output.push_str(&Self::indent(&Self::payload_text(payload), "  "));
            output.push('\n');
        }

        if let Some(message) = result.error_message() {
            output.push_str(&format!("  {}\n", message));
            if let Some(cause) = &result.cause
                && !message.contains(cause.as_str())
            {
                output.push_str(&format!("  {} {}\n", "Cause:".dimmed(), cause));
            }
        }

        if !result.suggestions.is_empty() {
            output.push_str(&format!(
                "  {} {}\n",
                "Did you mean:".cyan(),
                result.suggestions.join(", ")
            ));
        }

        output
    }

    fn no_match(&self, text: &str, threshold: f64, candidates: &[IntentMatch]) -> String {
        let mut output = format!(
            "{} no confident match for \"{}\" (threshold {:.2})\n",
            "?".yellow().bold(),
            text,
            threshold
        );
        if candidates.is_empty() {
            output.push_str("  No tool recognized this request. Nothing was executed.\n");
        } else {
            output.push_str(&format!("  {}\n", "Closest candidates:".cyan()));
            for m in candidates {
                output.push_str(&Self::match_line(m));
                output.push('\n');
            }
        }
        output
    }

    fn suggestions(&self, text: &str, matches: &[IntentMatch]) -> String {
        if matches.is_empty() {
            return format!("No tools match \"{}\"\n", text);
        }
        let mut output = format!("{} \"{}\"\n", "Candidates for".cyan().bold(), text);
        for m in matches {
            output.push_str(&Self::match_line(m));
            output.push('\n');
        }
        output
    }

    fn resolution(&self, resolution: &Resolution) -> String {
        match &resolution.canonical {
            Some(canonical) => {
                let mut output = format!(
                    "{} {} {}\n",
                    resolution.input,
                    "→".dimmed(),
                    canonical.green().bold()
                );
                if !resolution.aliases.is_empty() {
                    output.push_str(&format!(
                        "  {} {}\n",
                        "Aliases:".cyan(),
                        resolution.aliases.join(", ")
                    ));
                }
                output
            }
            None => {
                let mut output = format!(
                    "{} '{}' does not resolve to any tool\n",
                    "✗".red(),
                    resolution.input
                );
                if !resolution.suggestions.is_empty() {
                    output.push_str(&format!(
                        "  {} {}\n",
                        "Did you mean:".cyan(),
                        resolution.suggestions.join(", ")
                    ));
                }
                output
            }
        }
    }

    fn tools(&self, tools: &[String]) -> String {
        if tools.is_empty() {
            return "No capabilities are available.\n".to_string();
        }
        let mut output = format!("{}\n", "Available capabilities:".cyan().bold());
        for tool in tools {
            output.push_str(&format!("  {}\n", tool));
        }
        output
    }

    fn self_test(&self, report: &SelfTestReport, stats: &DispatchStats) -> String {
        let mut output = String::new();

        for failure in report.failures() {
            output.push_str(&format!(
                "{} {} {} expected {}, got {} ({})\n",
                "✗".red(),
                failure.name.bold(),
                "→".dimmed(),
                failure.expected,
                failure.resolved.as_deref().unwrap_or("nothing"),
                failure.outcome
            ));
        }

        let summary = format!(
            "{} passed, {} failed in {} ms",
            report.passed,
            report.failed,
            report.elapsed.as_millis()
        );
        if report.all_passed() {
            output.push_str(&format!("{} {}\n", "✓".green(), summary.green().bold()));
        } else {
            output.push_str(&format!("{} {}\n", "✗".red(), summary.red().bold()));
        }

        let histogram = report
            .outcomes
            .iter()
            .map(|(outcome, n)| format!("{} {}", outcome, n))
            .collect::<Vec<_>>()
            .join(", ");
        output.push_str(&format!("  {} {}\n", "Outcomes:".dimmed(), histogram));
        output.push_str(&format!(
            "  {} {:.1}% of {} calls\n",
            "Success rate:".dimmed(),
            stats.success_rate() * 100.0,
            stats.total_calls
        ));

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_domain::{InvocationMode, ParamMap, ToolCall};
    use std::time::Duration;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_success_shows_alias_and_payload() {
        plain();
        let result = DispatchResult::success(
            ToolCall::new(TargetKind::Tool, "bash", InvocationMode::Forced)
                .with_canonical("execute_shell"),
            serde_json::json!({"stdout": "hi"}),
            Duration::from_millis(3),
        );
        let text = ConsoleFormatter.dispatch_result(&result);
        assert!(text.contains("SUCCESS"));
        assert!(text.contains("execute_shell (from 'bash')"));
        assert!(text.contains("\"stdout\": \"hi\""));
        assert!(text.contains("forced"));
        assert!(!text.contains("dry run"));
    }

    #[test]
    fn test_dry_run_is_marked() {
        plain();
        let result = DispatchResult::success(
            ToolCall::new(TargetKind::Tool, "execute_shell", InvocationMode::Forced)
                .with_canonical("execute_shell"),
            serde_json::json!({
                "dry_run": true,
                "target": "tool",
                "name": "execute_shell",
                "backend": "builtin:builtin",
                "params": {"command": "rm -rf build"},
            }),
            Duration::ZERO,
        );
        let text = ConsoleFormatter.dispatch_result(&result);
        let headline = text.lines().next().unwrap();
        assert!(headline.starts_with("✓ SUCCESS (dry run, nothing executed) execute_shell"));
    }

    #[test]
    fn test_failure_shows_message_and_suggestions() {
        plain();
        let result = DispatchResult::failure(
            ToolCall::new(TargetKind::Tool, "shel", InvocationMode::Auto),
            DispatchOutcome::ToolNotFound,
            "Tool 'shel' not found",
            "no such alias",
            Duration::ZERO,
        )
        .with_suggestions(vec!["execute_shell".to_string()]);
        let text = ConsoleFormatter.dispatch_result(&result);
        assert!(text.contains("TOOL_NOT_FOUND"));
        assert!(text.contains("Tool 'shel' not found"));
        assert!(text.contains("Cause: no such alias"));
        assert!(text.contains("Did you mean: execute_shell"));
    }

    #[test]
    fn test_no_match_without_candidates() {
        plain();
        let text = ConsoleFormatter.no_match("hello there", 0.5, &[]);
        assert!(text.contains("no confident match"));
        assert!(text.contains("Nothing was executed"));
    }

    #[test]
    fn test_suggestions_list_params() {
        plain();
        let mut params = ParamMap::new();
        params.insert("query".to_string(), serde_json::json!("rust async"));
        let m = IntentMatch {
            tool_name: "web_search".to_string(),
            confidence: 0.9,
            mode: InvocationMode::Suggested,
            extracted_params: params,
            matched_patterns: vec![],
            source_text: "google rust async".to_string(),
        };
        let text = ConsoleFormatter.suggestions("google rust async", &[m]);
        assert!(text.contains("0.90  web_search  query=rust async"));
    }

    #[test]
    fn test_resolution_unresolved() {
        plain();
        let text = ConsoleFormatter.resolution(&Resolution {
            input: "zzz".to_string(),
            canonical: None,
            aliases: vec![],
            suggestions: vec!["translator".to_string()],
        });
        assert!(text.contains("'zzz' does not resolve"));
        assert!(text.contains("Did you mean: translator"));
    }
}

//! User-facing failure messages.
//!
//! Every message names the target and the concrete cause, and states
//! plainly that nothing was performed. Callers relay these texts to the
//! user verbatim instead of letting a model improvise a success story.

use super::entities::TargetKind;

/// Suffix shared by every message where the executor was never reached
pub const NOT_PERFORMED: &str = "No action was performed.";

fn capitalized(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::Tool => "Tool",
        TargetKind::Agent => "Agent",
        TargetKind::Flow => "Flow",
    }
}

pub fn not_found(name: &str, suggestions: &[String]) -> String {
    let mut message = format!("Tool '{}' was not found. {}", name, NOT_PERFORMED);
    if !suggestions.is_empty() {
        message.push_str(&format!(" Did you mean: {}?", suggestions.join(", ")));
    }
    message
}

pub fn unavailable(kind: TargetKind, name: &str) -> String {
    format!(
        "{} '{}' is not available in any registered backend. {}",
        capitalized(kind),
        name,
        NOT_PERFORMED
    )
}

pub fn invalid_params(name: &str, reason: &str) -> String {
    format!(
        "Invalid parameters for tool '{}': {}. {}",
        name, reason, NOT_PERFORMED
    )
}

pub fn execution_failed(kind: TargetKind, name: &str, cause: &str) -> String {
    format!(
        "{} '{}' failed during execution: {}. No result was produced; the action must not be reported as completed.",
        capitalized(kind),
        name,
        cause
    )
}

pub fn not_initialized(kind: TargetKind, name: &str) -> String {
    format!(
        "Cannot dispatch {} '{}': executor is not initialized. {}",
        kind, name, NOT_PERFORMED
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_with_suggestions() {
        let msg = not_found("shel", &["execute_shell".to_string()]);
        assert!(msg.contains("'shel'"));
        assert!(msg.contains(NOT_PERFORMED));
        assert!(msg.ends_with("Did you mean: execute_shell?"));
    }

    #[test]
    fn test_not_found_without_suggestions() {
        let msg = not_found("zzz", &[]);
        assert!(!msg.contains("Did you mean"));
    }

    #[test]
    fn test_messages_name_target_and_disclaim() {
        let msg = unavailable(TargetKind::Agent, "researcher");
        assert!(msg.starts_with("Agent 'researcher'"));
        assert!(msg.contains(NOT_PERFORMED));

        let msg = execution_failed(TargetKind::Flow, "nightly", "step 2 exploded");
        assert!(msg.contains("Flow 'nightly'"));
        assert!(msg.contains("step 2 exploded"));
        assert!(msg.contains("must not be reported as completed"));

        let msg = not_initialized(TargetKind::Flow, "nightly");
        assert!(msg.contains("not initialized"));
    }
}

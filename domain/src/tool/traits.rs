//! Tool domain traits
//!
//! Contains pure domain logic traits for parameter validation.
//! The async `ExecutorPort` is defined in the application layer (ports).

use super::catalog;
use super::entities::ParamMap;

/// Validator for tool parameters
///
/// This is a pure domain trait that checks the structure of a parameter
/// map before anything is invoked, without any I/O operations.
pub trait ParamValidator: Send + Sync {
    /// Validate parameters for a canonical tool name
    fn validate(&self, tool: &str, params: &ParamMap) -> Result<(), String>;
}

/// Required fields for the tools that have hard structural requirements.
/// Tools not listed here accept any parameter map.
const REQUIRED_FIELDS: &[(&str, &[&str])] = &[
    (catalog::EXECUTE_SHELL, &["command"]),
    (catalog::FILE_OPERATIONS, &["path"]),
    (catalog::WEB_SCRAPER, &["url"]),
    (catalog::API_CALL, &["url"]),
];

/// Default implementation of ParamValidator
#[derive(Debug, Clone, Default)]
pub struct DefaultParamValidator;

impl DefaultParamValidator {
    /// Required fields registered for a tool (empty when it has no rule)
    pub fn required_fields(tool: &str) -> &'static [&'static str] {
        REQUIRED_FIELDS
            .iter()
            .find(|(name, _)| *name == tool)
            .map(|(_, fields)| *fields)
            .unwrap_or(&[])
    }
}

fn is_missing(value: Option<&serde_json::Value>) -> bool {
    match value {
        None | Some(serde_json::Value::Null) => true,
        Some(serde_json::Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

impl ParamValidator for DefaultParamValidator {
    fn validate(&self, tool: &str, params: &ParamMap) -> Result<(), String> {
        for field in Self::required_fields(tool) {
            if is_missing(params.get(*field)) {
                return Err(format!(
                    "Missing required parameter '{}' for tool '{}'",
                    field, tool
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, serde_json::Value)]) -> ParamMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_validator_missing_required() {
        let validator = DefaultParamValidator;
        let result = validator.validate("execute_shell", &ParamMap::new());
        assert_eq!(
            result.unwrap_err(),
            "Missing required parameter 'command' for tool 'execute_shell'"
        );
    }

    #[test]
    fn test_validator_blank_and_null_count_as_missing() {
        let validator = DefaultParamValidator;
        assert!(
            validator
                .validate("file_operations", &params(&[("path", json!("   "))]))
                .is_err()
        );
        assert!(
            validator
                .validate("web_scraper", &params(&[("url", json!(null))]))
                .is_err()
        );
    }

    #[test]
    fn test_validator_valid_call() {
        let validator = DefaultParamValidator;
        let p = params(&[("command", json!("ls -la")), ("extra", json!(1))]);
        assert!(validator.validate("execute_shell", &p).is_ok());
    }

    #[test]
    fn test_validator_tool_without_rule() {
        let validator = DefaultParamValidator;
        assert!(validator.validate("translator", &ParamMap::new()).is_ok());
        assert!(validator.validate("not_a_tool", &ParamMap::new()).is_ok());
        assert!(DefaultParamValidator::required_fields("translator").is_empty());
    }
}

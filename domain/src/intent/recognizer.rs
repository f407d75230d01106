//! Pattern-driven intent recognition.

use regex::{Regex, RegexBuilder};
use serde_json::Value;
use tracing::{debug, trace};

use super::entities::IntentMatch;
use super::heuristics::{self, HeuristicMatch};
use crate::core::error::DomainError;
use crate::tool::entities::{InvocationMode, ParamMap, ToolDescriptor};

/// Flat bonus for a tool whose parameters could be extracted
pub const EXTRACTION_BONUS: f64 = 0.1;

#[derive(Debug, Clone)]
struct CompiledTool {
    name: String,
    base_confidence: f64,
    /// (source pattern, compiled) pairs
    triggers: Vec<(String, Regex)>,
    extractors: Vec<(String, Vec<Regex>)>,
}

/// Registry of recognizable tools, compiled once at construction.
///
/// Read-only after [`new`](Self::new); share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct IntentRecognizer {
    tools: Vec<CompiledTool>,
    heuristics: bool,
}

fn compile_trigger(tool: &str, pattern: &str) -> Result<Regex, DomainError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| DomainError::InvalidPattern {
            tool: tool.to_string(),
            pattern: pattern.to_string(),
            source,
        })
}

fn compile_extractor(tool: &str, pattern: &str) -> Result<Regex, DomainError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .multi_line(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|source| DomainError::InvalidPattern {
            tool: tool.to_string(),
            pattern: pattern.to_string(),
            source,
        })
}

/// Round to hundredths so that `0.7 + 0.1` compares equal to `0.8`
fn round_confidence(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// First non-empty capture (or whole match when the pattern has no group)
fn capture(re: &Regex, text: &str) -> Option<String> {
    let caps = re.captures(text)?;
    let m = if re.captures_len() > 1 {
        caps.get(1)?
    } else {
        caps.get(0)?
    };
    let value = m.as_str().trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl CompiledTool {
    fn compile(descriptor: ToolDescriptor) -> Result<Self, DomainError> {
        let name = descriptor.canonical_name;
        let triggers = descriptor
            .trigger_patterns
            .into_iter()
            .map(|p| compile_trigger(&name, &p).map(|re| (p, re)))
            .collect::<Result<Vec<_>, _>>()?;
        let extractors = descriptor
            .extractors
            .into_iter()
            .map(|e| {
                let compiled = e
                    .patterns
                    .iter()
                    .map(|p| compile_extractor(&name, p))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((e.param, compiled))
            })
            .collect::<Result<Vec<_>, DomainError>>()?;
        Ok(Self {
            name,
            base_confidence: descriptor.base_confidence,
            triggers,
            extractors,
        })
    }
}

impl IntentRecognizer {
    /// Compile a set of descriptors.
    ///
    /// Fails on blank or duplicate names, confidences outside [0, 1], and
    /// patterns that do not compile.
    pub fn new(descriptors: impl IntoIterator<Item = ToolDescriptor>) -> Result<Self, DomainError> {
        let mut tools: Vec<CompiledTool> = Vec::new();
        for descriptor in descriptors {
            if descriptor.canonical_name.trim().is_empty() {
                return Err(DomainError::EmptyToolName);
            }
            if tools.iter().any(|t| t.name == descriptor.canonical_name) {
                return Err(DomainError::DuplicateTool(descriptor.canonical_name));
            }
            if !(0.0..=1.0).contains(&descriptor.base_confidence) {
                return Err(DomainError::InvalidConfidence {
                    tool: descriptor.canonical_name,
                    value: descriptor.base_confidence,
                });
            }
            tools.push(CompiledTool::compile(descriptor)?);
        }
        Ok(Self {
            tools,
            heuristics: true,
        })
    }

    /// Disable the structural heuristics (pattern scoring only)
    pub fn without_heuristics(mut self) -> Self {
        self.heuristics = false;
        self
    }

    pub fn tool_names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.name.as_str())
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name == name)
    }

    fn tool(&self, name: &str) -> Option<&CompiledTool> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Rank candidate tools for `text`, best first.
    ///
    /// With a non-blank `forced_tool` the result is exactly one FORCED match
    /// for it, whatever the text says.
    pub fn parse(&self, text: &str, forced_tool: Option<&str>) -> Vec<IntentMatch> {
        if let Some(tool) = forced_tool.filter(|t| !t.trim().is_empty()) {
            let params = self.extract_params(text, tool);
            return vec![IntentMatch::forced(tool, text, params)];
        }

        if text.trim().is_empty() {
            return Vec::new();
        }

        let lowered = text.to_lowercase();
        let mut candidates: Vec<IntentMatch> = Vec::new();

        for tool in &self.tools {
            let matched: Vec<String> = tool
                .triggers
                .iter()
                .filter(|(_, re)| re.is_match(&lowered))
                .map(|(source, _)| source.clone())
                .collect();
            if matched.is_empty() {
                continue;
            }

            let params = self.extract_with(Some(tool), text);
            let mut confidence = tool.base_confidence;
            if !params.is_empty() {
                confidence = (confidence + EXTRACTION_BONUS).min(1.0);
            }
            trace!(
                tool = %tool.name,
                confidence,
                patterns = matched.len(),
                "Trigger patterns matched"
            );

            candidates.push(IntentMatch {
                tool_name: tool.name.clone(),
                confidence: round_confidence(confidence),
                mode: InvocationMode::Auto,
                extracted_params: params,
                matched_patterns: matched,
                source_text: text.to_string(),
            });
        }

        if self.heuristics {
            for hint in heuristics::detect(text) {
                merge_heuristic(&mut candidates, hint, text);
            }
        }

        // sort_by is stable: ties keep discovery order
        candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        debug!(
            candidates = candidates.len(),
            top = candidates.first().map(|c| c.tool_name.as_str()).unwrap_or("-"),
            "Parsed intent"
        );
        candidates
    }

    /// Extract parameters for `tool` from `text`.
    ///
    /// Declared extractors run first, then generic URL (`url`, extra ones
    /// under `urls`) and path extraction fill whatever is still unset.
    /// Unknown tools get the generic extraction only.
    pub fn extract_params(&self, text: &str, tool: &str) -> ParamMap {
        self.extract_with(self.tool(tool), text)
    }

    fn extract_with(&self, tool: Option<&CompiledTool>, text: &str) -> ParamMap {
        let mut params = ParamMap::new();

        if let Some(tool) = tool {
            for (param, patterns) in &tool.extractors {
                if let Some(value) = patterns.iter().find_map(|re| capture(re, text)) {
                    params.insert(param.clone(), Value::String(value));
                }
            }
        }

        let mut urls = heuristics::find_urls(text).into_iter();
        if let Some(first) = urls.next() {
            params
                .entry("url".to_string())
                .or_insert(Value::String(first));
            let rest: Vec<Value> = urls.map(Value::String).collect();
            if !rest.is_empty() {
                params
                    .entry("urls".to_string())
                    .or_insert(Value::Array(rest));
            }
        }

        if !params.contains_key("path")
            && let Some(path) = heuristics::find_path(text)
        {
            params.insert("path".to_string(), Value::String(path));
        }

        params
    }

    /// Top candidate, but only if it reaches `min_confidence`.
    ///
    /// This is the gate in front of every automatic dispatch.
    pub fn best_match(
        &self,
        text: &str,
        forced_tool: Option<&str>,
        min_confidence: f64,
    ) -> Option<IntentMatch> {
        self.parse(text, forced_tool)
            .into_iter()
            .next()
            .filter(|m| m.confidence >= min_confidence)
    }

    /// Display-only candidates, never meant for execution
    pub fn suggest(&self, text: &str, max_n: usize) -> Vec<IntentMatch> {
        self.parse(text, None)
            .into_iter()
            .take(max_n)
            .map(|mut m| {
                m.mode = InvocationMode::Suggested;
                m
            })
            .collect()
    }
}

/// Fold a heuristic into the candidate list. A tool appears at most once:
/// an existing candidate keeps the higher confidence and gains unset params.
fn merge_heuristic(candidates: &mut Vec<IntentMatch>, hint: HeuristicMatch, text: &str) {
    if let Some(existing) = candidates.iter_mut().find(|c| c.tool_name == hint.tool) {
        existing.confidence = existing.confidence.max(hint.confidence);
        for (key, value) in hint.params {
            existing.extracted_params.entry(key).or_insert(value);
        }
        existing.matched_patterns.push(hint.label.to_string());
        return;
    }

    candidates.push(IntentMatch {
        tool_name: hint.tool.to_string(),
        confidence: hint.confidence,
        mode: InvocationMode::Auto,
        extracted_params: hint.params,
        matched_patterns: vec![hint.label.to_string()],
        source_text: text.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::catalog;

    fn recognizer() -> IntentRecognizer {
        catalog::default_intent_recognizer()
    }

    #[test]
    fn test_shell_command_russian() {
        let r = recognizer();
        let top = r.best_match("выполни ls -la", None, 0.5).unwrap();
        assert_eq!(top.tool_name, "execute_shell");
        assert_eq!(top.mode, InvocationMode::Auto);
        assert_eq!(top.confidence, 1.0);
        assert_eq!(top.extracted_params["command"], "ls -la");
    }

    #[test]
    fn test_scrape_russian_url() {
        let r = recognizer();
        let matches = r.parse("скачай данные с https://example.com", None);
        let scraper = matches
            .iter()
            .find(|m| m.tool_name == "web_scraper")
            .unwrap();
        assert_eq!(scraper.extracted_params["url"], "https://example.com");
        assert!(
            scraper
                .matched_patterns
                .iter()
                .any(|p| p == "heuristic:url+scrape")
        );
        assert_eq!(matches[0].tool_name, "web_scraper");
    }

    #[test]
    fn test_heuristic_only_candidate() {
        let r = recognizer();
        let matches = r.parse("скачай данные с https://example.com", None);
        let r = r.without_heuristics();
        let pattern_only = r.parse("скачай данные с https://example.com", None);
        assert_eq!(matches.len(), pattern_only.len());

        let matches = recognizer().parse("please extract https://example.com/prices", None);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].tool_name, "web_scraper");
        assert_eq!(matches[0].confidence, 0.8);
        assert_eq!(
            matches[0].matched_patterns,
            vec!["heuristic:url+scrape".to_string()]
        );
    }

    #[test]
    fn test_forced_mode_determinism() {
        let r = recognizer();
        for text in ["", "translate hello to german", "выполни ls"] {
            let matches = r.parse(text, Some("web_search"));
            assert_eq!(matches.len(), 1);
            assert_eq!(matches[0].tool_name, "web_search");
            assert_eq!(matches[0].confidence, 1.0);
            assert_eq!(matches[0].mode, InvocationMode::Forced);
            assert_eq!(matches[0].matched_patterns, vec!["forced:web_search"]);
        }
    }

    #[test]
    fn test_forced_mode_unknown_tool() {
        let r = recognizer();
        let matches = r.parse("see https://example.com", Some("mystery"));
        assert_eq!(matches[0].tool_name, "mystery");
        assert_eq!(matches[0].extracted_params["url"], "https://example.com");
    }

    #[test]
    fn test_empty_text() {
        let r = recognizer();
        assert!(r.parse("", None).is_empty());
        assert!(r.parse("   \n", None).is_empty());
        assert!(r.suggest("", 3).is_empty());
    }

    #[test]
    fn test_threshold_gating() {
        let r = recognizer();
        let text = "analyze the quarterly numbers";
        assert!(!r.parse(text, None).is_empty());
        assert!(r.best_match(text, None, 0.99).is_none());
        assert!(r.best_match(text, None, 0.5).is_some());
    }

    #[test]
    fn test_slash_words_do_not_reach_file_operations() {
        let r = recognizer();
        for text in ["I am reachable 24/7", "pros and/or cons", "what is TCP/IP"] {
            let top = r.best_match(text, None, 0.5);
            assert!(
                top.as_ref().is_none_or(|m| m.tool_name != "file_operations"),
                "{text:?} matched {top:?}"
            );
        }
        let top = r.best_match("open notes/todo.txt", None, 0.5).unwrap();
        assert_eq!(top.tool_name, "file_operations");
        assert_eq!(top.extracted_params["path"], "notes/todo.txt");
    }

    #[test]
    fn test_bonus_is_rounded() {
        let r = recognizer();
        // data_analyzer: 0.7 base + bonus
        let top = r.best_match("analyze sales figures", None, 0.0).unwrap();
        assert_eq!(top.tool_name, "data_analyzer");
        assert_eq!(top.confidence, 0.8);
        assert_eq!(top.extracted_params["source"], "sales figures");
    }

    #[test]
    fn test_no_bonus_without_params() {
        let r = recognizer();
        let top = r.best_match("show some statistics", None, 0.0).unwrap();
        assert_eq!(top.tool_name, "data_analyzer");
        assert_eq!(top.confidence, 0.7);
        assert!(top.extracted_params.is_empty());
    }

    #[test]
    fn test_results_sorted_descending() {
        let r = recognizer();
        let matches = r.parse("run the command cat /etc/hosts and translate it", None);
        assert!(matches.len() >= 2);
        for pair in matches.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
        assert_eq!(matches[0].tool_name, "execute_shell");
    }

    #[test]
    fn test_path_heuristic_merges_into_pattern_match() {
        let r = recognizer();
        let matches = r.parse("read the file /etc/hosts", None);
        let files: Vec<_> = matches
            .iter()
            .filter(|m| m.tool_name == "file_operations")
            .collect();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].extracted_params["path"], "/etc/hosts");
        assert_eq!(files[0].extracted_params["operation"], "read");
        assert_eq!(files[0].confidence, 0.9);
        assert!(files[0].matched_patterns.iter().any(|p| p == "heuristic:path"));
    }

    #[test]
    fn test_extract_params_declared_then_generic() {
        let r = recognizer();
        let params = r.extract_params(
            "translate \"good morning\" into german, see https://a.example and https://b.example",
            "translator",
        );
        assert_eq!(params["text"], "good morning");
        assert_eq!(params["target_language"], "german");
        assert_eq!(params["url"], "https://a.example");
        assert_eq!(params["urls"], serde_json::json!(["https://b.example"]));
    }

    #[test]
    fn test_extract_params_backtick_command() {
        let r = recognizer();
        let params = r.extract_params("please run `git status` here", "execute_shell");
        assert_eq!(params["command"], "git status");
    }

    #[test]
    fn test_suggest_marks_mode() {
        let r = recognizer();
        let suggestions = r.suggest("google rust async book", 2);
        assert!(!suggestions.is_empty());
        assert!(suggestions.len() <= 2);
        assert!(
            suggestions
                .iter()
                .all(|m| m.mode == InvocationMode::Suggested)
        );
        assert_eq!(suggestions[0].tool_name, "web_search");
        assert_eq!(suggestions[0].extracted_params["query"], "rust async book");
    }

    #[test]
    fn test_new_rejects_bad_descriptors() {
        let bad_pattern = ToolDescriptor::new("broken", "", 0.5).with_trigger("(unclosed");
        assert!(matches!(
            IntentRecognizer::new([bad_pattern]),
            Err(DomainError::InvalidPattern { .. })
        ));

        let bad_conf = ToolDescriptor::new("loud", "", 1.5);
        assert!(matches!(
            IntentRecognizer::new([bad_conf]),
            Err(DomainError::InvalidConfidence { .. })
        ));

        let dup = || ToolDescriptor::new("twin", "", 0.5);
        assert!(matches!(
            IntentRecognizer::new([dup(), dup()]),
            Err(DomainError::DuplicateTool(_))
        ));

        assert!(matches!(
            IntentRecognizer::new([ToolDescriptor::new(" ", "", 0.5)]),
            Err(DomainError::EmptyToolName)
        ));
    }

    #[test]
    fn test_whole_match_without_group() {
        let tool = ToolDescriptor::new("ticket", "", 0.6)
            .with_trigger(r"\bticket\b")
            .with_extractor("id", [r"[A-Z]+-\d+"]);
        let r = IntentRecognizer::new([tool]).unwrap().without_heuristics();
        let top = r.best_match("close ticket ABC-123", None, 0.0).unwrap();
        assert_eq!(top.extracted_params["id"], "ABC-123");
        assert_eq!(top.confidence, 0.7);
    }
}

//! Output formatter trait

use relay_application::{DispatchStats, SelfTestReport};
use relay_domain::{DispatchResult, IntentMatch};
use serde::Serialize;

/// What a name resolves to, for `resolve`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub input: String,
    pub canonical: Option<String>,
    /// Every alias of the canonical name (empty when unresolved)
    pub aliases: Vec<String>,
    /// Closest canonical names (only when unresolved)
    pub suggestions: Vec<String>,
}

/// Trait for rendering command results
pub trait OutputFormatter {
    fn dispatch_result(&self, result: &DispatchResult) -> String;

    /// Nothing reached the confidence gate; `candidates` are the best guesses
    fn no_match(&self, text: &str, threshold: f64, candidates: &[IntentMatch]) -> String;

    fn suggestions(&self, text: &str, matches: &[IntentMatch]) -> String;

    fn resolution(&self, resolution: &Resolution) -> String;

    fn tools(&self, tools: &[String]) -> String;

    fn self_test(&self, report: &SelfTestReport, stats: &DispatchStats) -> String;
}

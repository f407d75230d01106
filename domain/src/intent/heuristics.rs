//! Structural heuristics that work without the pattern tables.
//!
//! A URL plus a scraping keyword suggests the scraper, a URL plus an API
//! keyword suggests an API call, and a path-shaped token suggests file
//! operations.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::tool::catalog::{API_CALL, FILE_OPERATIONS, URL_PATTERN, WEB_SCRAPER};
use crate::tool::entities::ParamMap;

pub const SCRAPE_CONFIDENCE: f64 = 0.8;
pub const API_CONFIDENCE: f64 = 0.7;
pub const PATH_CONFIDENCE: f64 = 0.75;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(URL_PATTERN).unwrap());

/// Rooted paths, drive paths, relative paths ending in `name.ext`, and bare
/// file names with a known extension. A bare `word/word` is not a path.
static PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:^|[\s"'(=])((?:~|\.{1,2})?/[\w.\-]+(?:/[\w.\-]+)*/?|[A-Za-z]:\\[\w.\-\\]+|[\w.\-]+(?:/[\w.\-]+)*/[\w\-][\w.\-]*\.[A-Za-z][A-Za-z0-9]*|[\w\-]+\.(?:txt|md|json|toml|ya?ml|csv|tsv|log|rs|py|js|ts|html?|xml|ini|cfg|conf|sh|sql)\b)"#,
    )
    .unwrap()
});

static SCRAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:download|extract|scrape|parse|fetch|crawl|скача\w*|извлек\w*|спарс\w*|парс\w*|загрузи\w*|собери)")
        .unwrap()
});

static API_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:api|endpoint|rest|json|request|get|post|put|patch|delete|запрос\w*|эндпоинт\w*|апи)\b")
        .unwrap()
});

/// Explicit method token, matched case-sensitively on the original text
static METHOD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(GET|POST|PUT|PATCH|DELETE|HEAD)\b").unwrap());

static WRITE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:write|save|create|append|создай|запиши|сохрани|допиши)\w*").unwrap()
});

static LIST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:list\w*|ls|dir|список\w*|содержимое|перечисли\w*)\b").unwrap()
});

/// A candidate produced by a heuristic
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicMatch {
    pub tool: &'static str,
    pub confidence: f64,
    pub params: ParamMap,
    pub label: &'static str,
}

/// Every http(s) URL in the text, in order of appearance
pub fn find_urls(text: &str) -> Vec<String> {
    URL_RE.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// First path-shaped token, ignoring anything inside URLs
pub fn find_path(text: &str) -> Option<String> {
    let without_urls = URL_RE.replace_all(text, " ");
    PATH_RE
        .captures(&without_urls)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?', ')']))
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}

/// Operation implied by the wording: list beats write, read is the default
pub fn infer_operation(lowered: &str) -> &'static str {
    if LIST_RE.is_match(lowered) {
        "list"
    } else if WRITE_RE.is_match(lowered) {
        "write"
    } else {
        "read"
    }
}

/// Run every heuristic over `text`.
///
/// The scraper and API heuristics are exclusive (scraper first); the path
/// heuristic is independent of both.
pub fn detect(text: &str) -> Vec<HeuristicMatch> {
    let lowered = text.to_lowercase();
    let mut matches = Vec::new();

    if let Some(url) = find_urls(text).into_iter().next() {
        if SCRAPE_RE.is_match(&lowered) {
            let mut params = ParamMap::new();
            params.insert("url".to_string(), Value::String(url));
            matches.push(HeuristicMatch {
                tool: WEB_SCRAPER,
                confidence: SCRAPE_CONFIDENCE,
                params,
                label: "heuristic:url+scrape",
            });
        } else if API_RE.is_match(&lowered) {
            let method = METHOD_RE
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str())
                .unwrap_or("GET");
            let mut params = ParamMap::new();
            params.insert("url".to_string(), Value::String(url));
            params.insert("method".to_string(), Value::String(method.to_string()));
            matches.push(HeuristicMatch {
                tool: API_CALL,
                confidence: API_CONFIDENCE,
                params,
                label: "heuristic:url+api",
            });
        }
    }

    if let Some(path) = find_path(text) {
        let mut params = ParamMap::new();
        params.insert("path".to_string(), Value::String(path));
        params.insert(
            "operation".to_string(),
            Value::String(infer_operation(&lowered).to_string()),
        );
        matches.push(HeuristicMatch {
            tool: FILE_OPERATIONS,
            confidence: PATH_CONFIDENCE,
            params,
            label: "heuristic:path",
        });
    }

    matches
}

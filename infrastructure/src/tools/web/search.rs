//! `web_search` capability backed by the DuckDuckGo Instant Answer API.
//!
//! The API needs no key and returns abstracts, instant answers,
//! definitions and related topics rather than a full result listing.

use relay_domain::{ParamMap, ProviderError};
use serde_json::{Value, json};

/// DuckDuckGo Instant Answer API endpoint (no API key required).
const DDG_API_URL: &str = "https://api.duckduckgo.com/";

const MAX_RELATED_TOPICS: usize = 10;

pub async fn execute_web_search(
    client: &reqwest::Client,
    params: &ParamMap,
) -> Result<Value, ProviderError> {
    let query = params
        .get("query")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ProviderError::InvalidArguments("'query' is required".to_string()))?;

    let response = client
        .get(DDG_API_URL)
        .query(&[
            ("q", query),
            ("format", "json"),
            ("no_html", "1"),
            ("skip_disambig", "1"),
        ])
        .send()
        .await
        .map_err(|e| ProviderError::ExecutionFailed(format!("Search request failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(ProviderError::ExecutionFailed(format!(
            "Search API returned error: {}",
            response.status()
        )));
    }

    let body: Value = response.json().await.map_err(|e| {
        ProviderError::ExecutionFailed(format!("Failed to parse search results: {}", e))
    })?;

    Ok(summarize_results(query, &body))
}

/// Reduce a DuckDuckGo response to the fields worth showing
fn summarize_results(query: &str, data: &Value) -> Value {
    let non_empty = |key: &str| {
        data[key]
            .as_str()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let related: Vec<Value> = data["RelatedTopics"]
        .as_array()
        .map(|topics| {
            topics
                .iter()
                // Nested topic groups carry no Text of their own
                .filter_map(|t| {
                    let text = t["Text"].as_str().filter(|s| !s.is_empty())?;
                    Some(json!({ "text": text, "url": t["FirstURL"].as_str().unwrap_or("") }))
                })
                .take(MAX_RELATED_TOPICS)
                .collect()
        })
        .unwrap_or_default();

    let summary = non_empty("AbstractText");
    let answer = non_empty("Answer");
    let definition = non_empty("Definition");
    let redirect = non_empty("Redirect");
    let found = summary.is_some()
        || answer.is_some()
        || definition.is_some()
        || redirect.is_some()
        || !related.is_empty();

    json!({
        "query": query,
        "found": found,
        "summary": summary,
        "summary_source": non_empty("AbstractSource"),
        "summary_url": non_empty("AbstractURL"),
        "answer": answer,
        "definition": definition,
        "redirect": redirect,
        "related": related,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_with_abstract() {
        let data = json!({
            "AbstractText": "Rust is a systems programming language.",
            "AbstractSource": "Wikipedia",
            "AbstractURL": "https://en.wikipedia.org/wiki/Rust_(programming_language)",
            "Answer": "",
            "Definition": "",
            "RelatedTopics": [],
            "Redirect": ""
        });

        let out = summarize_results("Rust programming", &data);
        assert_eq!(out["found"], true);
        assert_eq!(out["summary_source"], "Wikipedia");
        assert!(out["answer"].is_null());
    }

    #[test]
    fn test_summarize_empty() {
        let data = json!({
            "AbstractText": "",
            "Answer": "",
            "Definition": "",
            "RelatedTopics": [],
            "Redirect": ""
        });
        let out = summarize_results("obscure query", &data);
        assert_eq!(out["found"], false);
        assert_eq!(out["related"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_summarize_skips_topic_groups_and_caps() {
        let mut topics: Vec<Value> = (0..15)
            .map(|i| json!({ "Text": format!("Topic {}", i), "FirstURL": "https://example.com" }))
            .collect();
        topics.insert(0, json!({ "Name": "Group", "Topics": [] }));

        let out = summarize_results("q", &json!({ "RelatedTopics": topics }));
        let related = out["related"].as_array().unwrap();
        assert_eq!(related.len(), MAX_RELATED_TOPICS);
        assert_eq!(related[0]["text"], "Topic 0");
    }
}

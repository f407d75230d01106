//! `web_scraper` capability: fetch a page and extract its readable text

use relay_domain::{ParamMap, ProviderError};
use serde_json::{Value, json};
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};

/// Maximum response body size (5 MB)
pub const MAX_BODY_SIZE: usize = 5 * 1024 * 1024;

/// Default max extracted text size (50 KB)
const DEFAULT_MAX_TEXT: usize = 50 * 1024;

/// Tags whose entire subtree is ignored
const SKIP_TAGS: [&str; 4] = ["script", "style", "noscript", "svg"];

static BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());
static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());

/// Fetch `url` and return its text content.
///
/// HTML is reduced to text; any other content type is returned as-is.
pub async fn execute_web_scraper(
    client: &reqwest::Client,
    params: &ParamMap,
) -> Result<Value, ProviderError> {
    let url = params
        .get("url")
        .and_then(Value::as_str)
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ProviderError::InvalidArguments("'url' is required".to_string()))?;
    let max_length = params
        .get("max_length")
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .unwrap_or(DEFAULT_MAX_TEXT);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ProviderError::ExecutionFailed(format!("Failed to fetch URL: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::ExecutionFailed(format!(
            "HTTP error: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        )));
    }

    if let Some(length) = response.content_length()
        && length > MAX_BODY_SIZE as u64
    {
        return Err(ProviderError::ExecutionFailed(format!(
            "Response too large: {} bytes (max: {} bytes)",
            length, MAX_BODY_SIZE
        )));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body = response.bytes().await.map_err(|e| {
        ProviderError::ExecutionFailed(format!("Failed to read response body: {}", e))
    })?;
    if body.len() > MAX_BODY_SIZE {
        return Err(ProviderError::ExecutionFailed(format!(
            "Response too large: {} bytes",
            body.len()
        )));
    }

    let body_str = String::from_utf8_lossy(&body);
    let is_html =
        content_type.contains("text/html") || content_type.contains("application/xhtml");
    let (title, text) = if is_html {
        let document = Html::parse_document(&body_str);
        (page_title(&document), document_text(&document))
    } else {
        (None, body_str.into_owned())
    };

    let truncated = text.len() > max_length;
    let text = if truncated {
        let mut end = max_length;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text[..end].to_string()
    } else {
        text
    };

    Ok(json!({
        "url": url,
        "status": status.as_u16(),
        "content_type": content_type,
        "title": title,
        "text": text,
        "bytes": body.len(),
        "truncated": truncated,
    }))
}

/// Readable text of a page, without scripts and styles
fn document_text(document: &Html) -> String {
    let root = document
        .select(&BODY_SELECTOR)
        .next()
        .unwrap_or_else(|| document.root_element());
    clean_whitespace(&collect_element_text(root).join(" "))
}

fn page_title(document: &Html) -> Option<String> {
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|t| clean_whitespace(&t.text().collect::<String>()))
        .filter(|t| !t.is_empty())
}

fn collect_element_text(element: ElementRef<'_>) -> Vec<String> {
    let tag = element.value().name();
    if SKIP_TAGS.iter().any(|skip| *skip == tag) {
        return Vec::new();
    }

    let mut parts = Vec::new();
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let t = text.trim();
                if !t.is_empty() {
                    parts.push(t.to_string());
                }
            }
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    parts.extend(collect_element_text(child_el));
                }
            }
            _ => {}
        }
    }
    parts
}

/// Collapse runs of spaces; keep at most two consecutive newlines
fn clean_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_was_whitespace = false;
    let mut newline_count = 0;

    for ch in text.chars() {
        if ch == '\n' {
            newline_count += 1;
            if newline_count <= 2 {
                result.push('\n');
            }
            prev_was_whitespace = true;
        } else if ch.is_whitespace() {
            if !prev_was_whitespace {
                result.push(' ');
            }
            prev_was_whitespace = true;
            newline_count = 0;
        } else {
            result.push(ch);
            prev_was_whitespace = false;
            newline_count = 0;
        }
    }

    result.trim().to_string()
}

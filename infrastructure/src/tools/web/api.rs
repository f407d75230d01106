//! `api_call` capability: one HTTP request, JSON-aware

use relay_domain::{ParamMap, ProviderError};
use reqwest::Method;
use serde_json::{Value, json};

use super::fetch::MAX_BODY_SIZE;

/// Parse the `method` parameter; missing means GET
pub fn parse_method(params: &ParamMap) -> Result<Method, ProviderError> {
    match params.get("method").and_then(Value::as_str) {
        None => Ok(Method::GET),
        Some(raw) => match raw.trim().to_uppercase().as_str() {
            "" | "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "PATCH" => Ok(Method::PATCH),
            "DELETE" => Ok(Method::DELETE),
            "HEAD" => Ok(Method::HEAD),
            other => Err(ProviderError::InvalidArguments(format!(
                "Unsupported HTTP method '{}'",
                other
            ))),
        },
    }
}

/// Send the request described by `params`.
///
/// `body` is sent as JSON (strings are sent verbatim as text), `headers`
/// is an optional object of string values. A non-2xx status is a failure
/// and the error carries a preview of the response body.
pub async fn execute_api_call(
    client: &reqwest::Client,
    params: &ParamMap,
) -> Result<Value, ProviderError> {
    let url = params
        .get("url")
        .and_then(Value::as_str)
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ProviderError::InvalidArguments("'url' is required".to_string()))?;
    let method = parse_method(params)?;

    let mut request = client.request(method.clone(), url);

    if let Some(Value::Object(headers)) = params.get("headers") {
        for (name, value) in headers {
            if let Some(value) = value.as_str() {
                request = request.header(name.as_str(), value);
            }
        }
    }

    request = match params.get("body") {
        None | Some(Value::Null) => request,
        Some(Value::String(text)) => request.body(text.clone()),
        Some(json_body) => request.json(json_body),
    };

    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::ExecutionFailed(format!("Request failed: {}", e)))?;

    let status = response.status();
    let bytes = response.bytes().await.map_err(|e| {
        ProviderError::ExecutionFailed(format!("Failed to read response body: {}", e))
    })?;
    if bytes.len() > MAX_BODY_SIZE {
        return Err(ProviderError::ExecutionFailed(format!(
            "Response too large: {} bytes",
            bytes.len()
        )));
    }

    let text = String::from_utf8_lossy(&bytes);
    if !status.is_success() {
        return Err(ProviderError::ExecutionFailed(format!(
            "HTTP error: {} {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown"),
            relay_domain::core::string::truncate(text.trim(), 200)
        )));
    }

    let body = serde_json::from_slice::<Value>(&bytes)
        .unwrap_or_else(|_| Value::String(text.into_owned()));

    Ok(json!({
        "url": url,
        "method": method.as_str(),
        "status": status.as_u16(),
        "body": body,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_method(method: &str) -> ParamMap {
        let mut params = ParamMap::new();
        params.insert("method".to_string(), json!(method));
        params
    }

    #[test]
    fn test_parse_method() {
        assert_eq!(parse_method(&ParamMap::new()).unwrap(), Method::GET);
        assert_eq!(parse_method(&with_method("post")).unwrap(), Method::POST);
        assert_eq!(parse_method(&with_method(" Delete ")).unwrap(), Method::DELETE);
        assert!(matches!(
            parse_method(&with_method("TRACE")),
            Err(ProviderError::InvalidArguments(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_url_is_rejected() {
        let client = reqwest::Client::new();
        let err = execute_api_call(&client, &with_method("GET"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("url"));
    }
}

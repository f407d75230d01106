use async_trait::async_trait;
use relay_domain::tool::catalog::{API_CALL, WEB_SCRAPER, WEB_SEARCH};
use relay_domain::{BackendKind, CapabilityProvider, ParamMap, ProviderError};
use serde_json::Value;
use std::time::Duration;

use super::{api, fetch, search};

/// Priority for the web provider (between external commands and builtin)
pub const WEB_PRIORITY: i32 = 0;

const USER_AGENT: &str = concat!("tool-relay/", env!("CARGO_PKG_VERSION"));

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// HTTP-backed capabilities sharing one `reqwest::Client`
#[derive(Debug, Clone)]
pub struct WebProvider {
    client: reqwest::Client,
}

impl WebProvider {
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout_secs(DEFAULT_HTTP_TIMEOUT_SECS)
    }

    pub fn with_timeout_secs(secs: u64) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(secs))
            .build()
            .map_err(|e| ProviderError::NotAvailable(format!("HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CapabilityProvider for WebProvider {
    fn id(&self) -> &str {
        "web"
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Builtin
    }

    fn priority(&self) -> i32 {
        WEB_PRIORITY
    }

    fn capabilities(&self) -> Vec<String> {
        vec![
            WEB_SCRAPER.to_string(),
            API_CALL.to_string(),
            WEB_SEARCH.to_string(),
        ]
    }

    async fn invoke(&self, capability: &str, params: &ParamMap) -> Result<Value, ProviderError> {
        match capability {
            WEB_SCRAPER => fetch::execute_web_scraper(&self.client, params).await,
            API_CALL => api::execute_api_call(&self.client, params).await,
            WEB_SEARCH => search::execute_web_search(&self.client, params).await,
            other => Err(ProviderError::NotFound(other.to_string())),
        }
    }
}

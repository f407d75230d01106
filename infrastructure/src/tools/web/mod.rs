//! **Web capabilities**: `web_scraper`, `api_call` and `web_search`
//!
//! Gated behind the `web-tools` Cargo feature flag.
//!
//! | Capability | Description | Key Dependency |
//! |------------|-------------|----------------|
//! | `web_scraper` | Fetch a URL, extract readable text from HTML | `reqwest` + `scraper` |
//! | `api_call` | Send one HTTP request, decode a JSON response | `reqwest` |
//! | `web_search` | DuckDuckGo Instant Answer API | `reqwest` |
//!
//! ```toml
//! # cli/Cargo.toml (enabled by default for end users)
//! [features]
//! default = ["web-tools"]
//! web-tools = ["relay-infrastructure/web-tools"]
//! ```

mod api;
mod fetch;
mod provider;
mod search;

pub use provider::{WEB_PRIORITY, WebProvider};

//! Client configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | AYNI_API_URL | http://localhost:3000/api | Backend base URL |
//! | AYNI_REQUEST_TIMEOUT_SECS | 30 | Per-request timeout |
//! | AYNI_NOTICE_TTL_MS | 3000 | How long banners stay visible |
//! | AYNI_TOKEN | unset | Bearer token to start the session with |
//! | AYNI_LOG_JSON | false | Emit logs as JSON |

use std::sync::Arc;
use std::time::Duration;

use crate::{ClientResult, NetworkHttpClient, Session};

/// Client configuration for connecting to the back-office API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "https://shop.example.com/api")
    pub base_url: String,

    /// Bearer token to seed the session with
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Notice banner lifetime in milliseconds
    pub notice_ttl_ms: u64,

    /// Structured JSON logs instead of human-readable lines
    pub log_json: bool,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            notice_ttl_ms: 3000,
            log_json: false,
        }
    }

    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("AYNI_API_URL").unwrap_or(defaults.base_url),
            token: std::env::var("AYNI_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            timeout: std::env::var("AYNI_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout),
            notice_ttl_ms: std::env::var("AYNI_NOTICE_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.notice_ttl_ms),
            log_json: std::env::var("AYNI_LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.log_json),
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set how long notices stay visible
    pub fn with_notice_ttl(mut self, millis: u64) -> Self {
        self.notice_ttl_ms = millis;
        self
    }

    /// Emit structured JSON logs
    pub fn with_log_json(mut self, json: bool) -> Self {
        self.log_json = json;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }

    /// Session seeded with the configured token, if any
    pub fn build_session(&self) -> Arc<Session> {
        Arc::new(match &self.token {
            Some(token) => Session::with_token(token.clone()),
            None => Session::new(),
        })
    }

    /// Create an HTTP client bound to `session`
    pub fn build_http_client(&self, session: Arc<Session>) -> ClientResult<NetworkHttpClient> {
        NetworkHttpClient::new(self, session)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000/api")
    }
}

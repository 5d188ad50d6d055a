//! Authenticator implementation
//!
//! Applies pre-computed credentials to outgoing requests.

use super::types::AuthConfig;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::RequestBuilder;

/// Authenticator handles applying authentication to HTTP requests
#[derive(Clone)]
pub struct Authenticator {
    /// Auth configuration
    config: AuthConfig,
    /// `Authorization` header value, derived once at construction
    header: Option<HeaderValue>,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        let header = match &config {
            AuthConfig::None => None,
            AuthConfig::Basic { username, password } => {
                let encoded = STANDARD.encode(format!("{username}:{password}"));
                HeaderValue::from_str(&format!("Basic {encoded}"))
                    .ok()
                    .map(|mut value| {
                        value.set_sensitive(true);
                        value
                    })
            }
        };

        Self { config, header }
    }

    /// Create a basic auth authenticator
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new(AuthConfig::basic(username, password))
    }

    /// The configuration this authenticator was built from
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Pre-computed `Authorization` header value, if any
    pub fn header_value(&self) -> Option<&HeaderValue> {
        self.header.as_ref()
    }

    /// Apply authentication to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.header {
            Some(value) => req.header(AUTHORIZATION, value.clone()),
            None => req,
        }
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

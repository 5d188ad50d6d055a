//! Tap configuration
//!
//! Settings are read from a JSON or YAML file (or an inline JSON string) and
//! then overridden from `TAP_LEARNUPON_*` environment variables.
//!
//! ```yaml
//! url_base: learnupon.com
//! domain: acme
//! username: api-user
//! password: secret
//! http:
//!   timeout_secs: 30
//!   max_retries: 3
//!   requests_per_second: 5
//! ```

use crate::auth::Authenticator;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RetryPolicy};
use crate::types::{BackoffType, JsonValue, OptionStringExt};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Path appended to the host to reach the v1 API
pub const API_PATH: &str = "/api/v1";

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "TAP_LEARNUPON_";

// ============================================================================
// Tap Config
// ============================================================================

/// Configuration of a tap run
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapConfig {
    /// API host, e.g. `learnupon.com`; a scheme may be given explicitly
    #[serde(default)]
    pub url_base: String,

    /// Account subdomain prefixed to `url_base`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Basic auth username
    #[serde(default)]
    pub username: String,

    /// Basic auth password
    #[serde(default)]
    pub password: String,

    /// Transport settings
    #[serde(default)]
    pub http: HttpSettings,
}

/// HTTP transport settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Retries for 429, 5xx, timeouts and connection errors; `0` disables
    pub max_retries: u32,
    /// Retry backoff strategy
    pub backoff: BackoffType,
    /// Client-side request rate limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests_per_second: Option<u32>,
    /// User agent override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 3,
            backoff: BackoffType::Exponential,
            requests_per_second: None,
            user_agent: None,
        }
    }
}

impl TapConfig {
    /// Create a config from the required settings
    pub fn new(
        url_base: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url_base: url_base.into(),
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Set the account subdomain
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Load a `.json`, `.yaml` or `.yml` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&contents),
            Some("json") | None => Self::from_json_str(&contents),
            Some(other) => Err(Error::config(format!(
                "Unsupported config file extension '.{other}', expected .json, .yaml or .yml"
            ))),
        }
    }

    /// Parse inline JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse inline YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Apply `TAP_LEARNUPON_*` overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup keyed by full variable name
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(val) = var("URL_BASE") {
            self.url_base = val;
        }
        if let Some(val) = var("USERNAME") {
            self.username = val;
        }
        if let Some(val) = var("PASSWORD") {
            self.password = val;
        }
        if let Some(val) = var("DOMAIN") {
            self.domain = val.none_if_empty();
        }
    }

    /// Check that all required settings are present
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("url_base", &self.url_base),
            ("username", &self.username),
            ("password", &self.password),
        ] {
            if value.trim().is_empty() {
                return Err(Error::missing_field(field));
            }
        }

        if self.http.timeout_secs == 0 {
            return Err(Error::invalid_value(
                "http.timeout_secs",
                "must be greater than 0",
            ));
        }
        if self.http.requests_per_second == Some(0) {
            return Err(Error::invalid_value(
                "http.requests_per_second",
                "must be greater than 0",
            ));
        }

        self.base_url().map(|_| ())
    }

    /// API base URL: `https://{domain}.{url_base}/api/v1`
    pub fn base_url(&self) -> Result<Url> {
        let raw = self.url_base.trim().trim_end_matches('/');
        let mut url = if raw.contains("://") {
            Url::parse(raw)?
        } else {
            Url::parse(&format!("https://{raw}"))?
        };

        if let Some(domain) = self.domain.clone().none_if_empty() {
            let domain = domain.trim();
            let host = url
                .host_str()
                .ok_or_else(|| Error::invalid_value("url_base", "URL has no host"))?;
            if !host.starts_with(&format!("{domain}.")) {
                let prefixed = format!("{domain}.{host}");
                url.set_host(Some(&prefixed))?;
            }
        }

        let path = url.path().trim_end_matches('/').to_string();
        if !path.ends_with(API_PATH) {
            url.set_path(&format!("{path}{API_PATH}"));
        }

        Ok(url)
    }

    /// Authenticator for these credentials
    pub fn authenticator(&self) -> Authenticator {
        Authenticator::basic(&self.username, &self.password)
    }

    /// HTTP client configuration
    pub fn http_client_config(&self) -> Result<HttpClientConfig> {
        let mut builder = HttpClientConfig::builder()
            .base_url(self.base_url()?.as_str().trim_end_matches('/'))
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .retry(RetryPolicy {
                max_retries: self.http.max_retries,
                backoff: self.http.backoff,
                ..RetryPolicy::default()
            });

        if let Some(rps) = self.http.requests_per_second {
            builder = builder.requests_per_second(rps);
        }
        if let Some(agent) = self.http.user_agent.clone().none_if_empty() {
            builder = builder.user_agent(agent);
        }

        Ok(builder.build())
    }

    /// Authenticated HTTP client
    pub fn build_client(&self) -> Result<HttpClient> {
        HttpClient::with_auth(self.http_client_config()?, self.authenticator())
    }

    /// JSON Schema of the configuration, published by `spec`
    pub fn json_schema() -> JsonValue {
        json!({
            "type": "object",
            "required": ["url_base", "username", "password"],
            "properties": {
                "url_base": {
                    "type": "string",
                    "description": "Url base for the source endpoint"
                },
                "domain": {
                    "type": "string",
                    "description": "Account subdomain, prefixed to url_base"
                },
                "username": {
                    "type": "string",
                    "description": "Username"
                },
                "password": {
                    "type": "string",
                    "description": "Password",
                    "secret": true
                },
                "http": {
                    "type": "object",
                    "properties": {
                        "timeout_secs": {"type": "integer", "default": 30},
                        "max_retries": {"type": "integer", "default": 3},
                        "backoff": {
                            "type": "string",
                            "enum": ["constant", "linear", "exponential"],
                            "default": "exponential"
                        },
                        "requests_per_second": {"type": "integer"},
                        "user_agent": {"type": "string"}
                    }
                }
            }
        })
    }
}

impl std::fmt::Debug for TapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapConfig")
            .field("url_base", &self.url_base)
            .field("domain", &self.domain)
            .field("username", &self.username)
            .field("password", &"***")
            .field("http", &self.http)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_from_json_str_with_defaults() {
        let config = TapConfig::from_json_str(
            r#"{"url_base": "learnupon.com", "username": "u", "password": "p"}"#,
        )
        .unwrap();

        assert_eq!(config.url_base, "learnupon.com");
        assert_eq!(config.domain, None);
        assert_eq!(config.http, HttpSettings::default());
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.http.max_retries, 3);
        config.validate().unwrap();
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "url_base: learnupon.com\ndomain: acme\nusername: u\npassword: p\n\
             http:\n  max_retries: 0\n  requests_per_second: 4\n  backoff: linear"
        )
        .unwrap();

        let config = TapConfig::from_file(file.path()).unwrap();
        assert_eq!(config.domain.as_deref(), Some("acme"));
        assert_eq!(config.http.max_retries, 0);
        assert_eq!(config.http.requests_per_second, Some(4));
        assert_eq!(config.http.backoff, BackoffType::Linear);
        assert_eq!(config.http.timeout_secs, 30);
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"url_base": "learnupon.com", "username": "u", "password": "p"}}"#
        )
        .unwrap();

        let config = TapConfig::from_file(file.path()).unwrap();
        assert_eq!(config.username, "u");
    }

    #[test]
    fn test_from_file_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        let err = TapConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported config file extension"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = TapConfig::from_file("/nonexistent/tap.json").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_validate_reports_first_missing_field() {
        let err = TapConfig::new("learnupon.com", "", "").validate().unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "username"));

        let err = TapConfig::new(" ", "u", "p").validate().unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "url_base"));
    }

    #[test]
    fn test_validate_rejects_zero_rate() {
        let mut config = TapConfig::new("learnupon.com", "u", "p");
        config.http.requests_per_second = Some(0);
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfigValue { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("TAP_LEARNUPON_USERNAME", "env-user"),
            ("TAP_LEARNUPON_PASSWORD", "env-pass"),
            ("TAP_LEARNUPON_DOMAIN", "globex"),
        ]
        .into_iter()
        .collect();

        let mut config = TapConfig::new("learnupon.com", "file-user", "file-pass");
        config.apply_overrides_from(|key| env.get(key).map(ToString::to_string));

        assert_eq!(config.url_base, "learnupon.com");
        assert_eq!(config.username, "env-user");
        assert_eq!(config.password, "env-pass");
        assert_eq!(config.domain.as_deref(), Some("globex"));
    }

    #[test]
    fn test_empty_domain_override_clears_domain() {
        let mut config = TapConfig::new("learnupon.com", "u", "p").with_domain("acme");
        config.apply_overrides_from(|key| (key == "TAP_LEARNUPON_DOMAIN").then(String::new));
        assert_eq!(config.domain, None);
    }

    #[test]
    fn test_base_url_with_domain() {
        let config = TapConfig::new("learnupon.com", "u", "p").with_domain("acme");
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "https://acme.learnupon.com/api/v1"
        );
    }

    #[test]
    fn test_base_url_without_domain() {
        let config = TapConfig::new("acme.learnupon.com/", "u", "p");
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "https://acme.learnupon.com/api/v1"
        );
    }

    #[test]
    fn test_base_url_keeps_explicit_scheme_and_api_path() {
        let config = TapConfig::new("http://127.0.0.1:8080/api/v1", "u", "p");
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "http://127.0.0.1:8080/api/v1"
        );
    }

    #[test]
    fn test_base_url_does_not_double_domain() {
        let config = TapConfig::new("acme.learnupon.com", "u", "p").with_domain("acme");
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "https://acme.learnupon.com/api/v1"
        );
    }

    #[test]
    fn test_http_client_config() {
        let mut config = TapConfig::new("learnupon.com", "u", "p").with_domain("acme");
        config.http.requests_per_second = Some(2);
        config.http.user_agent = Some("custom/1.0".to_string());
        config.http.timeout_secs = 5;

        let http = config.http_client_config().unwrap();
        assert_eq!(
            http.base_url.as_deref(),
            Some("https://acme.learnupon.com/api/v1")
        );
        assert_eq!(http.timeout, Duration::from_secs(5));
        assert_eq!(http.requests_per_second, Some(2));
        assert_eq!(http.retry.max_retries, 3);
        assert_eq!(http.user_agent, "custom/1.0");
    }

    #[test]
    fn test_build_client_is_authenticated() {
        let client = TapConfig::new("learnupon.com", "u", "p")
            .build_client()
            .unwrap();
        assert!(client.authenticator().header_value().is_some());
        assert!(!client.is_throttled());
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = TapConfig::new("learnupon.com", "admin", "hunter2");
        let debug = format!("{config:?}");
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_json_schema_requires_credentials() {
        let schema = TapConfig::json_schema();
        assert_eq!(
            schema["required"],
            json!(["url_base", "username", "password"])
        );
    }
}

//! Authenticated GET client
//!
//! Every LearnUpon request is a GET against the portal's API base URL. The
//! client attaches credentials, paces requests when a throttle is configured
//! and retries transient failures:
//! - 429, honouring `Retry-After`
//! - 500, 502-504 and the 52x proxy errors
//! - timeouts and connection failures

use super::rate_limit::Throttle;
use crate::auth::{AuthConfig, Authenticator};
use crate::error::{Error, Result};
use crate::types::BackoffType;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Seconds to wait after a 429 without a usable `Retry-After` header
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

// ============================================================================
// Retry Policy
// ============================================================================

/// How often, and how patiently, transient failures are retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; `0` disables retrying
    pub max_retries: u32,
    /// Growth of the delay between attempts
    pub backoff: BackoffType,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound for any computed delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: BackoffType::Exponential,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt + 1`
    pub fn delay(&self, attempt: u32) -> Duration {
        let delay = match self.backoff {
            BackoffType::Constant => self.initial_delay,
            BackoffType::Linear => self.initial_delay.saturating_mul(attempt.saturating_add(1)),
            BackoffType::Exponential => self
                .initial_delay
                .saturating_mul(2u32.saturating_pow(attempt)),
        };
        delay.min(self.max_delay)
    }

    /// Wait before retry number `attempt + 1`
    ///
    /// A server-provided `Retry-After` replaces the computed delay but is
    /// still bounded by `max_delay`.
    pub fn wait(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        retry_after.map_or_else(|| self.delay(attempt), |wait| wait.min(self.max_delay))
    }
}

// ============================================================================
// Client Config
// ============================================================================

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL that relative paths are appended to
    pub base_url: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retry schedule
    pub retry: RetryPolicy,
    /// Client-side pacing, unthrottled when absent
    pub requests_per_second: Option<u32>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            requests_per_second: None,
            user_agent: format!("tap-learnupon/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Debug, Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Replace the retry policy
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    /// Set max retries, keeping the rest of the policy
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.retry.max_retries = retries;
        self
    }

    /// Pace requests client-side
    pub fn requests_per_second(mut self, rps: u32) -> Self {
        self.config.requests_per_second = Some(rps);
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

// ============================================================================
// Client
// ============================================================================

/// Result of one request attempt
enum Attempt {
    Done(Response),
    /// Worth retrying; `wait` overrides the policy delay
    Transient {
        error: Error,
        wait: Option<Duration>,
    },
    Fatal(Error),
}

/// Authenticated GET client with retries and optional pacing
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    base_url: Option<Url>,
    authenticator: Authenticator,
    throttle: Option<Throttle>,
}

impl HttpClient {
    /// Create an unauthenticated client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create an unauthenticated client
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        Self::with_auth(config, Authenticator::new(AuthConfig::None))
    }

    /// Create a client that signs every request
    pub fn with_auth(config: HttpClientConfig, authenticator: Authenticator) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let base_url = config.base_url.as_deref().map(Url::parse).transpose()?;
        let throttle = config.requests_per_second.map(Throttle::per_second);

        Ok(Self {
            client,
            config,
            base_url,
            authenticator,
            throttle,
        })
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Credentials applied to every request
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    /// Whether requests are paced client-side
    pub fn is_throttled(&self) -> bool {
        self.throttle.is_some()
    }

    /// Resolve a path against the base URL
    ///
    /// Absolute URLs are returned unchanged. Relative paths are appended to
    /// the base path, so `/courses` under `.../api/v1` is `.../api/v1/courses`.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        if let Ok(absolute) = Url::parse(path) {
            return Ok(absolute);
        }

        let base = self
            .base_url
            .as_ref()
            .ok_or_else(|| Error::config(format!("No base URL to resolve '{path}' against")))?;

        let mut url = base.clone();
        url.set_path(&format!(
            "{}/{}",
            base.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        ));
        Ok(url)
    }

    /// GET a URL, retrying transient failures
    ///
    /// Non-success statuses that are not retried, and retried ones once the
    /// policy is exhausted, come back as [`Error::HttpStatus`] carrying the
    /// response body.
    pub async fn get(&self, url: Url) -> Result<Response> {
        let policy = self.config.retry;
        let mut attempt = 0;

        loop {
            if let Some(throttle) = &self.throttle {
                throttle.acquire().await;
            }

            match self.attempt(&url).await {
                Attempt::Done(response) => {
                    debug!("GET {} -> {}", url, response.status().as_u16());
                    return Ok(response);
                }
                Attempt::Fatal(error) => return Err(error),
                Attempt::Transient { error, wait } => {
                    if attempt >= policy.max_retries {
                        return Err(error);
                    }
                    let delay = policy.wait(attempt, wait);
                    attempt += 1;
                    warn!(
                        "GET {} failed ({}), attempt {}/{}, retrying in {:?}",
                        url,
                        error,
                        attempt,
                        policy.max_retries + 1,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    async fn attempt(&self, url: &Url) -> Attempt {
        let request = self.authenticator.apply(self.client.get(url.clone()));

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return Attempt::Transient {
                    error: Error::Timeout {
                        timeout_ms: self.config.timeout.as_millis() as u64,
                    },
                    wait: None,
                }
            }
            Err(e) if e.is_connect() => {
                return Attempt::Transient {
                    error: Error::Http(e),
                    wait: None,
                }
            }
            Err(e) => return Attempt::Fatal(Error::Http(e)),
        };

        let status = response.status();
        if status.is_success() {
            return Attempt::Done(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = retry_after_secs(&response);
            return Attempt::Transient {
                error: Error::RateLimited {
                    retry_after_seconds: retry_after,
                },
                wait: Some(Duration::from_secs(retry_after)),
            };
        }

        let body = response.text().await.unwrap_or_default();
        let error = Error::http_status(status.as_u16(), body);
        if is_transient_status(status) {
            Attempt::Transient { error, wait: None }
        } else {
            Attempt::Fatal(error)
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.config.base_url)
            .field("retry", &self.config.retry)
            .field("authenticator", &self.authenticator)
            .field("throttle", &self.throttle)
            .finish_non_exhaustive()
    }
}

fn is_transient_status(status: StatusCode) -> bool {
    matches!(
        status.as_u16(),
        500 | 502 | 503 | 504 | 520 | 521 | 522 | 523 | 524
    )
}

/// Delay-seconds form of `Retry-After`; the HTTP-date form and a missing
/// header both fall back to [`DEFAULT_RETRY_AFTER_SECS`]
fn retry_after_secs(response: &Response) -> u64 {
    let header = response.headers().get(reqwest::header::RETRY_AFTER);
    match header.and_then(|v| v.to_str().ok()).map(str::trim) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            debug!(retry_after = raw, "Unsupported Retry-After value, using default");
            DEFAULT_RETRY_AFTER_SECS
        }),
        None => DEFAULT_RETRY_AFTER_SECS,
    }
}

//! HTTP client module
//!
//! Provides the HTTP transport used by every stream.
//!
//! # Features
//!
//! - **Retries**: transient statuses, timeouts and connection errors are
//!   retried on a [`RetryPolicy`] schedule
//! - **Pacing**: optional governor-backed [`Throttle`]
//! - **Authentication**: Basic auth applied from the auth module

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RetryPolicy};
pub use rate_limit::Throttle;

#[cfg(test)]
mod tests;

//! HTTP client module
//!
//! Transport shared by the v3 and v1 API dialects.
//!
//! # Features
//!
//! - **Automatic Retries**: gateway errors (502/504) retried with backoff
//! - **Rate Limiting**: Token bucket pacing using governor
//! - **Base URL Resolution**: relative endpoint paths joined onto the organization URL

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;

//! Transport for the LiveAgent APIs
//!
//! Every request of a run goes through one [`HttpClient`]. Endpoint paths are
//! relative and resolve against the API root; the key and JSON headers are
//! attached once as client defaults. Throttling (429), gateway errors,
//! timeouts and refused connections are retried with backoff before they
//! surface. Error statuses become `Error::HttpStatus` with the response body.
//! Transport errors never carry the request URL, which holds the v1 key.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::error::{Error, Result};
use crate::types::{BackoffType, StringMap};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Transport settings
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// API root relative paths resolve against; always ends in `/`
    pub base_url: Option<String>,
    pub timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub backoff_type: BackoffType,
    /// Statuses retried by the transport itself
    pub retry_statuses: Vec<u16>,
    pub rate_limit: Option<RateLimiterConfig>,
    /// Sent with every request
    pub headers: Vec<(String, String)>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(300),
            max_backoff: Duration::from_secs(30),
            backoff_type: BackoffType::Exponential,
            retry_statuses: vec![502, 504],
            rate_limit: Some(RateLimiterConfig::default()),
            headers: Vec::new(),
        }
    }
}

impl HttpClientConfig {
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// API root; a trailing slash is added so `v3/agents` nests under `/api/`
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let mut url = url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        self.config.base_url = Some(url);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    pub fn retry_statuses(mut self, statuses: impl Into<Vec<u16>>) -> Self {
        self.config.retry_statuses = statuses.into();
        self
    }

    pub fn rate_limit(mut self, config: Option<RateLimiterConfig>) -> Self {
        self.config.rate_limit = config;
        self
    }

    pub fn no_rate_limit(self) -> Self {
        self.rate_limit(None)
    }

    /// Header sent with every request; a repeated name replaces the earlier value
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.config
            .headers
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.config.headers.push((name, value.into()));
        self
    }

    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Per-request settings
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    pub query: StringMap,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(query: StringMap) -> Self {
        Self { query }
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }
}

/// What one attempt amounted to
enum Attempt {
    Done(Response),
    Retry {
        reason: String,
        wait: Duration,
        error: Error,
    },
    Fail(Error),
}

/// HTTP client with retry and rate limiting
pub struct HttpClient {
    inner: Client,
    config: HttpClientConfig,
    base_url: Option<Url>,
    limiter: Option<RateLimiter>,
}

impl HttpClient {
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let inner = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(header_map(&config.headers)?)
            .build()?;

        let base_url = config.base_url.as_deref().map(Url::parse).transpose()?;
        let limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            inner,
            config,
            base_url,
            limiter,
        })
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    pub fn has_rate_limiter(&self) -> bool {
        self.limiter.is_some()
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        self.get_with_config(path, RequestConfig::new()).await
    }

    /// GET `path` with query parameters, retrying transient failures.
    ///
    /// A retried failure that persists is returned as it was last seen
    /// (`HttpStatus`, `Timeout` or `Http`).
    pub async fn get_with_config(&self, path: &str, request: RequestConfig) -> Result<Response> {
        let url = self.build_url(path)?;
        let attempts = self.config.max_retries.saturating_add(1);

        for attempt in 0..attempts {
            if let Some(limiter) = &self.limiter {
                limiter.wait().await;
            }

            let mut builder = self.inner.get(url.clone());
            if !request.query.is_empty() {
                builder = builder.query(&request.query);
            }

            match self.classify(builder.send().await, attempt).await {
                Attempt::Done(response) => {
                    debug!("GET {} -> {}", url.path(), response.status().as_u16());
                    return Ok(response);
                }
                Attempt::Fail(error) => return Err(error),
                Attempt::Retry { error, .. } if attempt + 1 == attempts => return Err(error),
                Attempt::Retry { reason, wait, .. } => {
                    warn!(
                        "{reason}, attempt {}/{attempts}, retrying in {wait:?}",
                        attempt + 1
                    );
                    tokio::time::sleep(wait).await;
                }
            }
        }

        Err(Error::MaxRetriesExceeded {
            max_retries: self.config.max_retries,
        })
    }

    async fn classify(&self, sent: reqwest::Result<Response>, attempt: u32) -> Attempt {
        let response = match sent {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return Attempt::Retry {
                    reason: "Request timed out".to_string(),
                    wait: self.calculate_backoff(attempt),
                    error: Error::Timeout {
                        timeout_ms: self.config.timeout.as_millis() as u64,
                    },
                }
            }
            Err(e) if e.is_connect() => {
                return Attempt::Retry {
                    reason: "Connection failed".to_string(),
                    wait: self.calculate_backoff(attempt),
                    error: Error::from(e),
                }
            }
            Err(e) => return Attempt::Fail(Error::from(e)),
        };

        let status = response.status();
        if !status.is_client_error() && !status.is_server_error() {
            return Attempt::Done(response);
        }

        let throttled = status == StatusCode::TOO_MANY_REQUESTS;
        let retry_after = throttled.then(|| self.retry_after(&response));
        let body = response.text().await.unwrap_or_default();
        let error = Error::http_status(status.as_u16(), body);

        if let Some(wait) = retry_after {
            Attempt::Retry {
                reason: "Rate limited (429)".to_string(),
                wait,
                error,
            }
        } else if self.config.retry_statuses.contains(&status.as_u16()) {
            Attempt::Retry {
                reason: format!("Request failed with {}", status.as_u16()),
                wait: self.calculate_backoff(attempt),
                error,
            }
        } else {
            Attempt::Fail(error)
        }
    }

    /// Resolve `path` against the API root; absolute URLs pass through
    pub fn build_url(&self, path: &str) -> Result<Url> {
        match (Url::parse(path), &self.base_url) {
            (Ok(absolute), _) => Ok(absolute),
            (Err(url::ParseError::RelativeUrlWithoutBase), Some(base)) => {
                Ok(base.join(path.trim_start_matches('/'))?)
            }
            (Err(url::ParseError::RelativeUrlWithoutBase), None) => Err(Error::config(format!(
                "Cannot resolve relative path '{path}' without a base URL"
            ))),
            (Err(e), _) => Err(e.into()),
        }
    }

    /// Delay before retry number `attempt + 1`, capped at `max_backoff`
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let initial = self.config.initial_backoff;
        let delay = match self.config.backoff_type {
            BackoffType::Constant => Some(initial),
            BackoffType::Linear => initial.checked_mul(attempt.saturating_add(1)),
            BackoffType::Exponential => 2u32
                .checked_pow(attempt)
                .and_then(|factor| initial.checked_mul(factor)),
        };
        delay.map_or(self.config.max_backoff, |d| d.min(self.config.max_backoff))
    }

    /// `Retry-After` in seconds, or the longest backoff when absent
    fn retry_after(&self, response: &Response) -> Duration {
        response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse().ok())
            .map_or(self.config.max_backoff, Duration::from_secs)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // header values include the API key
        let header_names: Vec<&str> = self
            .config
            .headers
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        f.debug_struct("HttpClient")
            .field("base_url", &self.config.base_url)
            .field("headers", &header_names)
            .field("max_retries", &self.config.max_retries)
            .field("rate_limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| Error::config(format!("Invalid header name '{name}'")))?;
        let mut header_value = HeaderValue::from_str(value)
            .map_err(|_| Error::config(format!("Invalid value for header '{name}'")))?;
        header_value.set_sensitive(true);
        map.insert(header_name, header_value);
    }
    Ok(map)
}

//! Paginated fetch loop
//!
//! Drives one pagination protocol to completion for an endpoint and
//! accumulates every page. A fetch either returns all records or fails;
//! partial results are never handed back.

use crate::catalog::Endpoint;
use crate::decode::decode_body;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::types::StringMap;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::types::DEFAULT_PAGE_SIZE;

/// Whole-fetch retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub attempts: u32,
    /// Fixed delay between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries
    pub fn none() -> Self {
        Self {
            attempts: 1,
            delay: Duration::ZERO,
        }
    }
}

/// Fetcher settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetcherConfig {
    /// Records per page for the Page and Cursor protocols
    pub page_size: u32,
    /// Whole-fetch retry policy
    pub retry: RetryPolicy,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            retry: RetryPolicy::default(),
        }
    }
}

/// Paginated fetcher over the shared HTTP client
#[derive(Debug)]
pub struct Fetcher {
    client: HttpClient,
    config: FetcherConfig,
}

impl Fetcher {
    /// Create a fetcher with default settings
    pub fn new(client: HttpClient) -> Self {
        Self::with_config(client, FetcherConfig::default())
    }

    /// Create a fetcher with custom settings
    pub fn with_config(client: HttpClient, config: FetcherConfig) -> Self {
        Self { client, config }
    }

    /// Get the underlying HTTP client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Get the fetcher settings
    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Fetch every page of `endpoint`, merging `query` into each request.
    ///
    /// Any response other than 200 aborts with `Error::Fetch`; a missing
    /// envelope key aborts with `Error::Schema`.
    pub async fn fetch(&self, endpoint: &Endpoint, query: &StringMap) -> Result<Vec<Value>> {
        let mut paginator = endpoint.pagination().paginator(self.config.page_size);
        let mut records = Vec::new();
        let mut page_count = 0usize;

        loop {
            let mut params = query.clone();
            params.extend(paginator.next_params());

            let response = match self
                .client
                .get_with_config(endpoint.path(), RequestConfig::with_query(params))
                .await
            {
                Ok(response) => response,
                Err(Error::HttpStatus { status, body }) => {
                    return Err(Error::fetch(endpoint.path(), status, body));
                }
                Err(e) => return Err(e),
            };

            let status = response.status();
            if status != StatusCode::OK {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::fetch(endpoint.path(), status.as_u16(), body));
            }

            let headers = response.headers().clone();
            let text = response.text().await?;
            let page = decode_body(&text, endpoint.envelope(), endpoint.path())?;

            page_count += 1;
            let records_count = page.len();
            debug!(
                "{} page {page_count}: {records_count} records",
                endpoint.path()
            );
            records.extend(page);

            if paginator
                .process_response(&headers, records_count)
                .is_done()
            {
                break;
            }
        }

        debug!(
            "{}: fetched {} records in {page_count} pages ({} pagination)",
            endpoint.path(),
            records.len(),
            endpoint.pagination().name()
        );
        Ok(records)
    }

    /// Fetch with whole-operation retry.
    ///
    /// Each retry restarts pagination from the beginning. Schema and
    /// configuration errors are returned immediately.
    pub async fn fetch_with_retry(
        &self,
        endpoint: &Endpoint,
        query: &StringMap,
    ) -> Result<Vec<Value>> {
        let attempts = self.config.retry.attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.fetch(endpoint, query).await {
                Ok(records) => return Ok(records),
                Err(e) if attempt < attempts && e.is_retryable() => {
                    warn!(
                        "{}: attempt {attempt}/{attempts} failed: {e}, retrying in {:?}",
                        endpoint.path(),
                        self.config.retry.delay
                    );
                    tokio::time::sleep(self.config.retry.delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

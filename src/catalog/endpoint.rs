//! Endpoint descriptors

use crate::decode::Envelope;
use crate::pagination::Pagination;

/// Immutable description of one collection endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    path: String,
    pagination: Pagination,
    result_key: Option<String>,
    envelope: Envelope,
}

impl Endpoint {
    /// Page-paginated endpoint returning a top-level array
    pub fn page(path: impl Into<String>) -> Self {
        Self::top_level(path, Pagination::Page)
    }

    /// Cursor-paginated endpoint returning a top-level array
    pub fn cursor(path: impl Into<String>) -> Self {
        Self::top_level(path, Pagination::Cursor)
    }

    /// Limit-paginated endpoint with records at `response[result_key]`.
    ///
    /// The only way to build a Limit endpoint, so every one of them has a key.
    pub fn limit(path: impl Into<String>, result_key: impl Into<String>) -> Self {
        let key = result_key.into();
        Self {
            path: path.into(),
            pagination: Pagination::limit(),
            envelope: Envelope::Nested(key.clone()),
            result_key: Some(key),
        }
    }

    fn top_level(path: impl Into<String>, pagination: Pagination) -> Self {
        Self {
            path: path.into(),
            pagination,
            result_key: None,
            envelope: Envelope::Body,
        }
    }

    /// Read records from a different key: `body[key]`, or
    /// `response[key]` for Limit endpoints
    #[must_use]
    pub fn with_result_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.envelope = match self.pagination {
            Pagination::Limit { .. } => Envelope::Nested(key.clone()),
            _ => Envelope::Key(key.clone()),
        };
        self.result_key = Some(key);
        self
    }

    /// Rename the limit/offset query parameters (Limit only)
    #[must_use]
    pub fn with_limit_params(
        mut self,
        limit_param: impl Into<String>,
        offset_param: impl Into<String>,
    ) -> Self {
        if let Pagination::Limit { limit, .. } = self.pagination {
            self.pagination = Pagination::Limit {
                limit,
                limit_param: limit_param.into(),
                offset_param: offset_param.into(),
            };
        }
        self
    }

    /// Override the records per request (Limit only)
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.pagination = self.pagination.with_limit(limit);
        self
    }

    /// Path relative to the API base URL
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn result_key(&self) -> Option<&str> {
        self.result_key.as_deref()
    }

    /// Where the records live in each response body
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

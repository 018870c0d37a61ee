//! Pagination types and traits
//!
//! Defines the protocol selector carried by endpoint descriptors and the
//! trait every protocol state machine implements.

use super::strategies::{CursorPaginator, OffsetPaginator, PageNumberPaginator};
use crate::types::StringMap;
use reqwest::header::HeaderMap;

/// Query parameter carrying the 1-based page number
pub const PAGE_PARAM: &str = "_page";
/// Query parameter carrying the page size
pub const PAGE_SIZE_PARAM: &str = "_perPage";
/// Query parameter carrying the cursor token
pub const CURSOR_PARAM: &str = "_cursor";
/// Response header carrying the next cursor token
pub const CURSOR_HEADER: &str = "next_page_cursor";

/// Records requested per page by the Page and Cursor protocols
pub const DEFAULT_PAGE_SIZE: u32 = 500;
/// Records requested per call by the Limit protocol
pub const DEFAULT_LIMIT: u32 = 1000;
/// Default limit parameter of the v1 report endpoints
pub const DEFAULT_LIMIT_PARAM: &str = "limitcount";
/// Default offset parameter of the v1 report endpoints
pub const DEFAULT_OFFSET_PARAM: &str = "limitfrom";

/// Outcome of inspecting one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// Issue another request
    Continue,
    /// Pagination is complete
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }
}

/// Pagination protocol of an endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pagination {
    /// `_page`/`_perPage`; a short page ends the fetch
    Page,

    /// `_cursor`/`_perPage`; an absent `next_page_cursor` header ends the fetch
    Cursor,

    /// Offset/limit; a batch shorter than `limit` ends the fetch
    Limit {
        /// Records per request
        limit: u32,
        /// Query parameter name for the limit
        limit_param: String,
        /// Query parameter name for the offset
        offset_param: String,
    },
}

impl Pagination {
    /// Limit pagination with the v1 report parameter names
    pub fn limit() -> Self {
        Self::limit_with(DEFAULT_LIMIT_PARAM, DEFAULT_OFFSET_PARAM)
    }

    /// Limit pagination with custom parameter names
    pub fn limit_with(limit_param: impl Into<String>, offset_param: impl Into<String>) -> Self {
        Self::Limit {
            limit: DEFAULT_LIMIT,
            limit_param: limit_param.into(),
            offset_param: offset_param.into(),
        }
    }

    /// Override the records per request of a Limit protocol (no-op otherwise)
    #[must_use]
    pub fn with_limit(mut self, value: u32) -> Self {
        if let Self::Limit { limit, .. } = &mut self {
            *limit = value.max(1);
        }
        self
    }

    /// Fresh state machine for one fetch
    pub fn paginator(&self, page_size: u32) -> Box<dyn Paginator> {
        match self {
            Self::Page => Box::new(PageNumberPaginator::new(page_size)),
            Self::Cursor => Box::new(CursorPaginator::new(page_size)),
            Self::Limit {
                limit,
                limit_param,
                offset_param,
            } => Box::new(OffsetPaginator::new(
                limit_param.as_str(),
                offset_param.as_str(),
                *limit,
            )),
        }
    }

    /// Short protocol name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Cursor => "cursor",
            Self::Limit { .. } => "limit",
        }
    }
}

/// A pagination protocol state machine.
///
/// Each fetch owns one instance; it is discarded when the fetch ends.
pub trait Paginator: Send {
    /// Paging parameters for the next request
    fn next_params(&mut self) -> StringMap;

    /// Record the page just received and decide whether to continue
    fn process_response(&mut self, headers: &HeaderMap, records_count: usize) -> NextPage;
}

//! Pagination strategy implementations
//!
//! Each strategy owns its progress and completion predicate.

use super::types::{NextPage, Paginator, CURSOR_HEADER, CURSOR_PARAM, PAGE_PARAM, PAGE_SIZE_PARAM};
use crate::types::StringMap;
use reqwest::header::HeaderMap;
use std::collections::HashMap;

// ============================================================================
// Page Number Pagination
// ============================================================================

/// Page number pagination (v3 collections)
///
/// The page number starts at 0 and is incremented before every request,
/// so the first request asks for `_page=1`.
#[derive(Debug, Clone)]
pub struct PageNumberPaginator {
    /// Last requested page
    pub page: u32,
    /// Records per page
    pub page_size: u32,
}

impl PageNumberPaginator {
    /// Create a new page number paginator
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
        }
    }
}

impl Paginator for PageNumberPaginator {
    fn next_params(&mut self) -> StringMap {
        self.page += 1;

        let mut params = HashMap::new();
        params.insert(PAGE_SIZE_PARAM.to_string(), self.page_size.to_string());
        params.insert(PAGE_PARAM.to_string(), self.page.to_string());
        params
    }

    fn process_response(&mut self, _headers: &HeaderMap, records_count: usize) -> NextPage {
        // A full last page costs one extra request that comes back empty
        if records_count < self.page_size as usize {
            NextPage::Done
        } else {
            NextPage::Continue
        }
    }
}

// ============================================================================
// Cursor Pagination
// ============================================================================

/// Cursor pagination driven by the `next_page_cursor` response header
///
/// The first request carries no cursor. Empty pages do not stop the fetch
/// while the server still hands out a cursor.
#[derive(Debug, Clone)]
pub struct CursorPaginator {
    /// Cursor for the next request
    pub cursor: Option<String>,
    /// Records per page
    pub page_size: u32,
}

impl CursorPaginator {
    /// Create a new cursor paginator
    pub fn new(page_size: u32) -> Self {
        Self {
            cursor: None,
            page_size: page_size.max(1),
        }
    }
}

impl Paginator for CursorPaginator {
    fn next_params(&mut self) -> StringMap {
        let mut params = HashMap::new();
        if let Some(cursor) = &self.cursor {
            params.insert(CURSOR_PARAM.to_string(), cursor.clone());
        }
        params.insert(PAGE_SIZE_PARAM.to_string(), self.page_size.to_string());
        params
    }

    fn process_response(&mut self, headers: &HeaderMap, _records_count: usize) -> NextPage {
        let next = headers
            .get(CURSOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        match next {
            Some(cursor) => {
                self.cursor = Some(cursor.to_string());
                NextPage::Continue
            }
            None => {
                self.cursor = None;
                NextPage::Done
            }
        }
    }
}

// ============================================================================
// Offset Pagination
// ============================================================================

/// Offset/limit pagination (v1 endpoints)
///
/// Common patterns:
/// - `?limitcount=1000&limitfrom=2000`
/// - `?limit=1000&offset=2000`
#[derive(Debug, Clone)]
pub struct OffsetPaginator {
    /// Query parameter name for offset
    pub offset_param: String,
    /// Query parameter name for limit
    pub limit_param: String,
    /// Number of records per request
    pub limit: u32,
    /// Offset of the next request
    pub offset: u64,
}

impl OffsetPaginator {
    /// Create a new offset paginator
    pub fn new(limit_param: impl Into<String>, offset_param: impl Into<String>, limit: u32) -> Self {
        Self {
            offset_param: offset_param.into(),
            limit_param: limit_param.into(),
            limit: limit.max(1),
            offset: 0,
        }
    }
}

impl Paginator for OffsetPaginator {
    fn next_params(&mut self) -> StringMap {
        let mut params = HashMap::new();
        params.insert(self.limit_param.clone(), self.limit.to_string());
        params.insert(self.offset_param.clone(), self.offset.to_string());
        params
    }

    fn process_response(&mut self, _headers: &HeaderMap, records_count: usize) -> NextPage {
        if records_count < self.limit as usize {
            return NextPage::Done;
        }

        self.offset += u64::from(self.limit);
        NextPage::Continue
    }
}

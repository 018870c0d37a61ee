//! Pagination module
//!
//! Supports the three protocols the LiveAgent APIs use: Page, Cursor, Limit
//!
//! # Overview
//!
//! Every endpoint descriptor selects one `Pagination` variant. The
//! `Fetcher` builds a fresh `Paginator` state machine per fetch, merges its
//! paging parameters into the base query, and loops until the protocol's
//! completion predicate fires.

mod fetcher;
mod strategies;
mod types;

pub use fetcher::{Fetcher, FetcherConfig, RetryPolicy};
pub use strategies::{CursorPaginator, OffsetPaginator, PageNumberPaginator};
pub use types::{
    NextPage, Pagination, Paginator, CURSOR_HEADER, CURSOR_PARAM, DEFAULT_LIMIT,
    DEFAULT_LIMIT_PARAM, DEFAULT_OFFSET_PARAM, DEFAULT_PAGE_SIZE, PAGE_PARAM, PAGE_SIZE_PARAM,
};

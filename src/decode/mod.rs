//! Response decoding
//!
//! The three pagination protocols deliver records inside different
//! envelopes:
//!
//! - the body itself is the record array (most v3 endpoints)
//! - `body[result_key]` holds the array
//! - `body["response"][result_key]` holds the array (v1 endpoints)
//!
//! A missing envelope key is a contract violation and surfaces as
//! `Error::Schema` rather than an empty page.

mod envelope;

pub use envelope::{decode_body, Envelope};

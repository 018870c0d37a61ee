//! Date window module
//!
//! Resolves the configured `date.from`/`date.until` expressions into a
//! concrete window and splits it into the per-day chunks v1 reports are
//! requested in.

mod expression;
mod window;

pub use expression::{parse_date_expression, resolve_date, DATE_FORMAT, DATE_TIME_FORMAT};
pub use window::{DateWindow, DayPartition};

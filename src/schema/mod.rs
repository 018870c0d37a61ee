//! Table schema module
//!
//! A static registry of every output table plus the projection that turns
//! a raw API record into a row of that table.
//!
//! # Projection
//!
//! - Nested objects are flattened to `parent_child` keys
//! - JSON fields are serialized from the unflattened record
//! - Parent values (`date`, `ticket_id`, `message_id`) are merged last
//! - Only the table's source fields are kept, in declaration order

mod flatten;
mod registry;

pub use flatten::flatten;
pub use registry::{TableId, TableSchema};

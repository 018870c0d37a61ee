//! Endpoint catalog
//!
//! Hard-coded knowledge of the LiveAgent collections: which objects exist,
//! where they live, how they paginate and which date field filters them.

mod endpoint;
mod filter;
mod objects;

pub use endpoint::Endpoint;
pub use filter::{FilterExpression, OperatorStyle, FILTER_PARAM};
pub use objects::{ticket_messages_endpoint, DateFilter, ObjectKind, CONVERSATION_CHANNEL_TYPES};

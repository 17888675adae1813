//! Domain models for messages and searches

mod message;
mod search;

pub use message::{Header, Headers, Message, MessageId, MimeKind, NO_SUBJECT, Part, Payload};
pub use search::{MATCH_ALL, SearchCriteria, SearchQuery, SearchResults};

//! Mail source abstraction
//!
//! The search and fetch collaborators the digest runs against.

mod memory;

pub use memory::InMemoryMailSource;

use anyhow::Result;

use crate::models::{Message, MessageId, SearchQuery, SearchResults};

/// Trait for mailbox search and message retrieval
///
/// Implemented by the Gmail client and by an in-memory source used for
/// tests and offline runs.
pub trait MailSource: Send + Sync {
    /// Search the mailbox, returning at most `max_results` message IDs
    fn search(&self, query: &SearchQuery, max_results: u32) -> Result<SearchResults>;

    /// Fetch the full message for an ID
    fn fetch(&self, id: &MessageId) -> Result<Message>;
}

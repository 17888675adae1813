//! Search criteria and the query string derived from them

use serde::{Deserialize, Serialize};
use std::fmt;

use super::MessageId;

/// Display form of the query that matches every message
pub const MATCH_ALL: &str = "All mail";

/// Optional filters for a mailbox search
///
/// A field that is `None` or an empty string does not constrain the search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// Sender address or name, rendered as `from:"..."`
    pub sender: Option<String>,
    /// Label name, rendered as `label:"..."`
    pub label: Option<String>,
    /// Subject text, rendered as `subject:"..."`
    pub subject: Option<String>,
    /// Free-text terms appended verbatim
    pub keywords: Option<String>,
}

impl SearchCriteria {
    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }
}

/// Query string handed to the search collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchQuery {
    /// No criteria given; every message matches
    MatchAll,
    /// Space-joined filter clauses
    Filter(String),
}

impl SearchQuery {
    /// Query text as shown to the user
    pub fn as_str(&self) -> &str {
        match self {
            SearchQuery::MatchAll => MATCH_ALL,
            SearchQuery::Filter(q) => q,
        }
    }

    /// Query text to send to the search API, `None` for match-all
    pub fn filter(&self) -> Option<&str> {
        match self {
            SearchQuery::MatchAll => None,
            SearchQuery::Filter(q) => Some(q),
        }
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self, SearchQuery::MatchAll)
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a mailbox search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Server-side estimate of the total number of matches
    pub estimated_count: u32,
    /// IDs of the matched messages, at most the requested maximum
    pub message_ids: Vec<MessageId>,
}

impl SearchResults {
    /// True when the search matched nothing
    pub fn is_empty(&self) -> bool {
        self.estimated_count == 0 || self.message_ids.is_empty()
    }
}

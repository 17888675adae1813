//! In-memory mail source

use anyhow::{Result, anyhow, bail};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use super::MailSource;
use crate::models::{Message, MessageId, SearchQuery, SearchResults};

/// In-memory implementation of MailSource
///
/// Every search returns the stored messages in insertion order, ignoring
/// the query text; the last query seen is kept for inspection. Fetches of
/// IDs marked with [`InMemoryMailSource::fail_fetch`] return an error.
pub struct InMemoryMailSource {
    order: RwLock<Vec<MessageId>>,
    messages: RwLock<HashMap<MessageId, Message>>,
    failing: RwLock<HashSet<MessageId>>,
    last_query: RwLock<Option<SearchQuery>>,
}

impl InMemoryMailSource {
    /// Create a new empty source
    pub fn new() -> Self {
        Self {
            order: RwLock::new(Vec::new()),
            messages: RwLock::new(HashMap::new()),
            failing: RwLock::new(HashSet::new()),
            last_query: RwLock::new(None),
        }
    }

    /// Create a source holding the given messages, in order
    pub fn with_messages(messages: impl IntoIterator<Item = Message>) -> Self {
        let source = Self::new();
        for message in messages {
            source.insert(message);
        }
        source
    }

    /// Add or replace a message
    pub fn insert(&self, message: Message) {
        let mut order = self.order.write().unwrap();
        if !order.contains(&message.id) {
            order.push(message.id.clone());
        }
        self.messages
            .write()
            .unwrap()
            .insert(message.id.clone(), message);
    }

    /// Make fetches of an ID fail, simulating a network or auth error
    pub fn fail_fetch(&self, id: &MessageId) {
        self.failing.write().unwrap().insert(id.clone());
    }

    /// The most recent query passed to [`MailSource::search`]
    pub fn last_query(&self) -> Option<SearchQuery> {
        self.last_query.read().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.order.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryMailSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MailSource for InMemoryMailSource {
    fn search(&self, query: &SearchQuery, max_results: u32) -> Result<SearchResults> {
        *self.last_query.write().unwrap() = Some(query.clone());

        let order = self.order.read().unwrap();
        Ok(SearchResults {
            estimated_count: order.len() as u32,
            message_ids: order.iter().take(max_results as usize).cloned().collect(),
        })
    }

    fn fetch(&self, id: &MessageId) -> Result<Message> {
        if self.failing.read().unwrap().contains(id) {
            bail!("Simulated fetch failure for {}", id.as_str());
        }
        self.messages
            .read()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("Message {} not found", id.as_str()))
    }
}

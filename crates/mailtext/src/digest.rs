//! Search-and-decode batch
//!
//! Runs a search, fetches each matching message, and decodes it into the
//! `(subject, text)` pairs handed to presentation.

use anyhow::Result;
use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::config::DigestSettings;
use crate::decode::{DecodeOptions, decode_message};
use crate::models::{Message, MessageId, SearchCriteria, SearchQuery};
use crate::query::build_query;
use crate::source::MailSource;

/// One decoded message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigestEntry {
    pub id: MessageId,
    pub subject: String,
    /// Normalized visible text, `None` when the message had none
    pub text: Option<String>,
}

/// Result of a digest run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Digest {
    /// The query that was issued
    pub query: SearchQuery,
    /// Server-side estimate of total matches
    pub estimated_count: u32,
    /// Maximum number of messages requested
    pub max_results: u32,
    /// Decoded messages, in search result order
    pub entries: Vec<DigestEntry>,
    /// Messages whose fetch failed
    pub unavailable: Vec<MessageId>,
}

impl Digest {
    /// True when the search matched no messages
    pub fn is_empty(&self) -> bool {
        self.estimated_count == 0 || (self.entries.is_empty() && self.unavailable.is_empty())
    }

    /// Number of messages actually shown
    pub fn shown(&self) -> usize {
        self.entries.len()
    }
}

/// Search, fetch and decode.
///
/// A failed search is returned as an error. A failed fetch is logged and
/// recorded in [`Digest::unavailable`]; the remaining messages are still
/// processed. Decode failures of individual parts are logged and the
/// message keeps whatever text its other parts produced.
pub fn collect_digest(
    source: &dyn MailSource,
    criteria: &SearchCriteria,
    settings: &DigestSettings,
) -> Result<Digest> {
    let query = build_query(criteria);
    let max_results = settings.effective_max_results();

    let results = source.search(&query, max_results)?;
    info!(
        "Query {:?} matched ~{} messages, fetching {}",
        query.as_str(),
        results.estimated_count,
        results.message_ids.len()
    );

    if results.is_empty() {
        return Ok(Digest {
            query,
            estimated_count: results.estimated_count,
            max_results,
            entries: Vec::new(),
            unavailable: Vec::new(),
        });
    }

    // Fetches stay sequential: the auth layer may prompt or refresh tokens
    let mut fetched = Vec::with_capacity(results.message_ids.len());
    let mut unavailable = Vec::new();
    for id in results.message_ids {
        match source.fetch(&id) {
            Ok(message) => fetched.push(message),
            Err(e) => {
                warn!("Failed to fetch message {}: {:#}", id.as_str(), e);
                unavailable.push(id);
            }
        }
    }

    let entries = decode_all(&fetched, &settings.decode_options());

    Ok(Digest {
        query,
        estimated_count: results.estimated_count,
        max_results,
        entries,
        unavailable,
    })
}

/// Decode messages in parallel, keeping their order
pub fn decode_all(messages: &[Message], options: &DecodeOptions) -> Vec<DigestEntry> {
    messages
        .par_iter()
        .map(|message| {
            let decoded = decode_message(message, options);
            for failure in &decoded.failures {
                warn!(
                    "Skipped {} part {} of message {}: {}",
                    failure.mime_type,
                    failure.index.map_or_else(|| "body".to_string(), |i| i.to_string()),
                    message.id.as_str(),
                    failure.error
                );
            }
            DigestEntry {
                id: message.id.clone(),
                subject: message.subject().to_string(),
                text: decoded.text,
            }
        })
        .collect()
}

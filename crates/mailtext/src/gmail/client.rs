//! Gmail API HTTP client
//!
//! Searches the mailbox and fetches full messages.
//! Uses synchronous HTTP (ureq) to be executor-agnostic.

use anyhow::{Context, Result};
use log::debug;
use std::time::Duration;

use super::GmailAuth;
use super::api::{GmailMessage, ListMessagesResponse};
use super::convert::convert_message;
use crate::models::{Message, MessageId, SearchQuery, SearchResults};
use crate::source::MailSource;

/// Gmail API client
pub struct GmailClient {
    auth: GmailAuth,
    max_retries: u32,
}

impl GmailClient {
    /// Gmail API base URL
    const BASE_URL: &'static str = "https://gmail.googleapis.com/gmail/v1";

    /// Upper bound the API accepts for `maxResults`
    pub const MAX_RESULTS_LIMIT: u32 = 500;

    /// Create a new Gmail client
    pub fn new(auth: GmailAuth) -> Self {
        Self {
            auth,
            max_retries: 3,
        }
    }

    /// Set how many attempts a message fetch gets before failing
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Build the messages.list URL for a query
    fn list_url(query: &SearchQuery, max_results: u32) -> String {
        let mut url = format!(
            "{}/users/me/messages?maxResults={}",
            Self::BASE_URL,
            max_results.clamp(1, Self::MAX_RESULTS_LIMIT)
        );

        if let Some(q) = query.filter() {
            url.push_str(&format!("&q={}", urlencoding::encode(q)));
        }

        url
    }

    /// List message IDs matching a query
    ///
    /// # Arguments
    /// * `query` - Search query; match-all sends no `q` parameter
    /// * `max_results` - Maximum number of messages to return (1-500)
    pub fn list_messages(&self, query: &SearchQuery, max_results: u32) -> Result<ListMessagesResponse> {
        let access_token = self.auth.get_access_token()?;
        let url = Self::list_url(query, max_results);

        let mut response = ureq::get(&url)
            .header("Authorization", &format!("Bearer {}", access_token))
            .call()
            .context("Failed to send list messages request")?;

        let list: ListMessagesResponse = response
            .body_mut()
            .read_json()
            .context("Failed to parse list messages response")?;

        Ok(list)
    }

    /// Get full message details by ID
    pub fn get_message(&self, id: &MessageId) -> Result<GmailMessage> {
        let access_token = self.auth.get_access_token()?;

        let url = format!(
            "{}/users/me/messages/{}?format=full",
            Self::BASE_URL,
            urlencoding::encode(id.as_str())
        );

        let mut response = ureq::get(&url)
            .header("Authorization", &format!("Bearer {}", access_token))
            .call()
            .with_context(|| format!("Failed to send get message request for {}", id.as_str()))?;

        let message: GmailMessage = response
            .body_mut()
            .read_json()
            .context("Failed to parse message response")?;

        Ok(message)
    }

    /// Get a message with exponential backoff retry
    fn get_message_with_retry(&self, id: &MessageId) -> Result<GmailMessage> {
        let mut delay = Duration::from_millis(100);
        let mut attempt = 1;

        loop {
            match self.get_message(id) {
                Ok(msg) => return Ok(msg),
                Err(e) if attempt >= self.max_retries => return Err(e),
                Err(e) => {
                    debug!(
                        "Fetch of {} failed (attempt {}/{}): {:#}",
                        id.as_str(),
                        attempt,
                        self.max_retries,
                        e
                    );
                    std::thread::sleep(delay + Duration::from_millis(rand_jitter()));
                    delay *= 2;
                    attempt += 1;
                }
            }
        }
    }

    /// Check if the client is authenticated
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    /// Clear stored tokens
    pub fn logout(&self) -> Result<()> {
        self.auth.logout()
    }
}

impl MailSource for GmailClient {
    fn search(&self, query: &SearchQuery, max_results: u32) -> Result<SearchResults> {
        let list = self.list_messages(query, max_results)?;

        let message_ids = list
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(|m| MessageId::new(m.id))
            .collect();

        Ok(SearchResults {
            estimated_count: list.result_size_estimate.unwrap_or(0),
            message_ids,
        })
    }

    fn fetch(&self, id: &MessageId) -> Result<Message> {
        let gmail_msg = self.get_message_with_retry(id)?;
        convert_message(gmail_msg)
    }
}

/// Generate a random jitter value (0-100ms)
fn rand_jitter() -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    RandomState::new().build_hasher().finish() % 100
}

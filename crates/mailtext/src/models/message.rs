//! Message model as delivered by the fetch collaborator

use serde::{Deserialize, Serialize};

/// Subject shown when a message carries no `Subject` header
pub const NO_SUBJECT: &str = "No Subject";

/// Unique identifier for a message (Gmail message ID)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Email header (name-value pair)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Ordered header list with lookup by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers(Vec<Header>);

impl Headers {
    pub fn new(headers: Vec<Header>) -> Self {
        Self(headers)
    }

    /// Value of the first header with the given name (ASCII case-insensitive)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Header>> for Headers {
    fn from(headers: Vec<Header>) -> Self {
        Self(headers)
    }
}

/// Content classification driving text extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeKind {
    PlainText,
    Html,
    Unsupported,
}

impl MimeKind {
    /// Classify a declared MIME type.
    ///
    /// Only the type essence is considered, so `text/html; charset=utf-8`
    /// and `TEXT/HTML` both classify as [`MimeKind::Html`].
    pub fn classify(mime_type: &str) -> Self {
        let essence = mime_type.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case("text/plain") {
            MimeKind::PlainText
        } else if essence.eq_ignore_ascii_case("text/html") {
            MimeKind::Html
        } else {
            MimeKind::Unsupported
        }
    }
}

/// A single content node: the whole payload of a single-part message,
/// or one part of a multi-part message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub mime_type: String,
    /// Transport-encoded (URL-safe base64) body, if any
    pub body_data: Option<String>,
}

impl Part {
    pub fn new(mime_type: impl Into<String>, body_data: Option<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            body_data,
        }
    }

    pub fn kind(&self) -> MimeKind {
        MimeKind::classify(&self.mime_type)
    }

    /// Body data, treating an empty string the same as no body
    pub fn body(&self) -> Option<&str> {
        self.body_data.as_deref().filter(|data| !data.is_empty())
    }
}

/// Message content structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    /// Single content node
    Single(Part),
    /// Ordered child parts
    Multipart(Vec<Part>),
}

/// A fetched message; read-only input to decoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub headers: Headers,
    pub payload: Payload,
}

impl Message {
    pub fn new(id: MessageId, headers: Headers, payload: Payload) -> Self {
        Self {
            id,
            headers,
            payload,
        }
    }

    /// Subject header value, or [`NO_SUBJECT`] when absent
    pub fn subject(&self) -> &str {
        self.headers.get("Subject").unwrap_or(NO_SUBJECT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_mime_types() {
        assert_eq!(MimeKind::classify("text/plain"), MimeKind::PlainText);
        assert_eq!(MimeKind::classify("text/html"), MimeKind::Html);
        assert_eq!(MimeKind::classify("application/pdf"), MimeKind::Unsupported);
        assert_eq!(MimeKind::classify("multipart/alternative"), MimeKind::Unsupported);
        assert_eq!(MimeKind::classify(""), MimeKind::Unsupported);
    }

    #[test]
    fn test_classify_ignores_parameters_and_case() {
        assert_eq!(
            MimeKind::classify("text/html; charset=\"UTF-8\""),
            MimeKind::Html
        );
        assert_eq!(MimeKind::classify(" Text/Plain "), MimeKind::PlainText);
        assert_eq!(MimeKind::classify("text/plainish"), MimeKind::Unsupported);
    }

    #[test]
    fn test_header_lookup_case_insensitive() {
        let headers = Headers::new(vec![
            Header::new("From", "test@example.com"),
            Header::new("SUBJECT", "Maintenance window"),
        ]);
        assert_eq!(headers.get("subject"), Some("Maintenance window"));
        assert_eq!(headers.get("from"), Some("test@example.com"));
        assert_eq!(headers.get("Cc"), None);
    }

    #[test]
    fn test_subject_defaults() {
        let message = Message::new(
            MessageId::new("m1"),
            Headers::default(),
            Payload::Single(Part::new("text/plain", None)),
        );
        assert_eq!(message.subject(), NO_SUBJECT);
    }

    #[test]
    fn test_empty_body_is_absent() {
        assert_eq!(Part::new("text/plain", Some(String::new())).body(), None);
        assert_eq!(Part::new("text/plain", None).body(), None);
        assert_eq!(
            Part::new("text/plain", Some("QQ".to_string())).body(),
            Some("QQ")
        );
    }
}

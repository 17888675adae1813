//! Mailtext - visible text extraction for Gmail messages
//!
//! This crate provides:
//! - Domain models (Message, Payload, Part, SearchCriteria)
//! - Search query construction
//! - The decode pipeline: transport decoding, HTML text extraction,
//!   normalization, and multi-part assembly
//! - Gmail API client and OAuth authentication
//! - A search-and-decode batch producing per-message subject and text
//!
//! The decode pipeline is pure and has no I/O; the Gmail client and the
//! digest batch sit around it behind the [`MailSource`] trait.

pub mod config;
pub mod decode;
pub mod digest;
pub mod gmail;
pub mod models;
pub mod query;
pub mod source;

pub use crate::config::{DigestSettings, GMAIL_READONLY_SCOPE, GmailCredentials};
pub use decode::{
    DecodeError, DecodeOptions, DecodedMessage, PART_SEPARATOR, PartFailure, decode_message,
    normalize_text, visible_text,
};
pub use digest::{Digest, DigestEntry, collect_digest, decode_all};
pub use gmail::{GmailAuth, GmailClient, convert_message};
pub use models::{
    Header, Headers, MATCH_ALL, Message, MessageId, MimeKind, NO_SUBJECT, Part, Payload,
    SearchCriteria, SearchQuery, SearchResults,
};
pub use query::build_query;
pub use source::{InMemoryMailSource, MailSource};

//! Message decoding pipeline
//!
//! Turns fetched messages into normalized visible text:
//! - transport decoding of body data (URL-safe base64 → UTF-8)
//! - visible text extraction from HTML
//! - whitespace and invisible-character normalization
//! - assembly of multi-part messages in part order
//!
//! Everything here is pure: no I/O, no logging, no shared state. Callers
//! may decode many messages in parallel.

mod assemble;
mod html;
mod message;
mod mime;
mod normalize;

pub use assemble::{PART_SEPARATOR, assemble_parts};
pub use html::{extract_text, html_to_text};
pub use message::{decode_message, visible_text};
pub use mime::{DecodeError, decode_body};
pub use normalize::normalize_text;

use serde::{Deserialize, Serialize};

use crate::models::{MimeKind, Part};

/// Options controlling how a message is decoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Apply [`normalize_text`] to each extracted text
    pub normalize: bool,
    /// Inserted between texts of different parts
    pub part_separator: String,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            normalize: true,
            part_separator: PART_SEPARATOR.to_string(),
        }
    }
}

/// A part (or single-part payload) whose body could not be decoded
#[derive(Debug, Clone, PartialEq)]
pub struct PartFailure {
    /// Position in the part list, `None` for a single-part payload
    pub index: Option<usize>,
    pub mime_type: String,
    pub error: DecodeError,
}

/// Outcome of decoding one message
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedMessage {
    /// Normalized visible text, `None` when nothing extractable was found
    pub text: Option<String>,
    /// Parts that were skipped because their body failed to decode
    pub failures: Vec<PartFailure>,
}

/// Visible text of one content node.
///
/// `Ok(None)` covers unsupported types, missing bodies, and texts that
/// end up empty.
fn part_text(part: &Part, options: &DecodeOptions) -> Result<Option<String>, DecodeError> {
    let kind = part.kind();
    if kind == MimeKind::Unsupported {
        return Ok(None);
    }

    let Some(content) = decode_body(part.body())? else {
        return Ok(None);
    };

    let text = extract_text(&content, kind).map(|text| {
        if options.normalize {
            normalize_text(&text)
        } else {
            text
        }
    });

    Ok(text.filter(|t| !t.is_empty()))
}

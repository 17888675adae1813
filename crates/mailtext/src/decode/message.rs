//! Per-message decode routing

use super::{DecodeOptions, DecodedMessage, PartFailure, assemble_parts, part_text};
use crate::models::{Message, Payload};

/// Decode a message into its visible text.
///
/// Multi-part payloads go through [`assemble_parts`]; a single-part payload
/// is decoded directly when it is `text/plain` or `text/html`. A body that
/// fails to decode is reported as a failure and yields no text.
pub fn decode_message(message: &Message, options: &DecodeOptions) -> DecodedMessage {
    match &message.payload {
        Payload::Multipart(parts) => assemble_parts(parts, options),
        Payload::Single(part) => match part_text(part, options) {
            Ok(text) => DecodedMessage {
                text,
                failures: Vec::new(),
            },
            Err(error) => DecodedMessage {
                text: None,
                failures: vec![PartFailure {
                    index: None,
                    mime_type: part.mime_type.clone(),
                    error,
                }],
            },
        },
    }
}

/// Visible text with default options, discarding failure details
pub fn visible_text(message: &Message) -> Option<String> {
    decode_message(message, &DecodeOptions::default()).text
}

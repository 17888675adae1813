//! Gmail API response conversion
//!
//! Converts Gmail API responses to the decode models.

use anyhow::{Context, Result};

use super::api::{self, GmailMessage, MessageBody};
use crate::models::{Header, Headers, Message, MessageId, Part, Payload};

/// Convert a Gmail API message to a [`Message`].
///
/// A payload carrying a `parts` array becomes [`Payload::Multipart`] over
/// its top-level parts, in order. Anything else is a single content node.
pub fn convert_message(gmail_msg: GmailMessage) -> Result<Message> {
    let payload = gmail_msg
        .payload
        .with_context(|| format!("Message {} has no payload", gmail_msg.id))?;

    let headers = convert_headers(payload.headers);

    let content = match payload.parts {
        Some(parts) => Payload::Multipart(
            parts
                .into_iter()
                .map(|part| make_part(part.mime_type, part.body))
                .collect(),
        ),
        None => Payload::Single(make_part(payload.mime_type, payload.body)),
    };

    Ok(Message::new(MessageId::new(gmail_msg.id), headers, content))
}

fn convert_headers(headers: Option<Vec<api::Header>>) -> Headers {
    headers
        .unwrap_or_default()
        .into_iter()
        .map(|h| Header::new(h.name, h.value))
        .collect::<Vec<_>>()
        .into()
}

fn make_part(mime_type: Option<String>, body: Option<MessageBody>) -> Part {
    Part::new(mime_type.unwrap_or_default(), body.and_then(|b| b.data))
}

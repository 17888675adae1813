//! Multi-part assembly

use super::{DecodeOptions, DecodedMessage, PartFailure, part_text};
use crate::models::Part;

/// Marks the boundary between texts taken from different MIME parts
pub const PART_SEPARATOR: &str = "\n\n* * * * * * * * * * * * * * * * * * * * * * * * *  PART CHANGE  * * * * * * * * * * * * * * * * * * * * * * * * *\n\n";

/// Extract every eligible part and join the texts in part order.
///
/// Parts without body data, of unsupported types, or that fail to decode
/// contribute nothing; decode failures are reported in
/// [`DecodedMessage::failures`] and do not stop the remaining parts.
pub fn assemble_parts(parts: &[Part], options: &DecodeOptions) -> DecodedMessage {
    let mut texts = Vec::with_capacity(parts.len());
    let mut failures = Vec::new();

    for (index, part) in parts.iter().enumerate() {
        match part_text(part, options) {
            Ok(Some(text)) => texts.push(text),
            Ok(None) => {}
            Err(error) => failures.push(PartFailure {
                index: Some(index),
                mime_type: part.mime_type.clone(),
                error,
            }),
        }
    }

    let text = if texts.is_empty() {
        None
    } else {
        Some(texts.join(&options.part_separator))
    };

    DecodedMessage { text, failures }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::prelude::*;

    fn part(mime_type: &str, body: Option<&str>) -> Part {
        Part::new(mime_type, body.map(|b| BASE64_URL_SAFE.encode(b)))
    }

    #[test]
    fn test_plain_and_html_parts() {
        let parts = vec![part("text/plain", Some("A")), part("text/html", Some("<p>B</p>"))];
        let decoded = assemble_parts(&parts, &DecodeOptions::default());
        assert_eq!(decoded.text, Some(format!("A{}B", PART_SEPARATOR)));
        assert!(decoded.failures.is_empty());
    }

    #[test]
    fn test_order_and_separator_count() {
        let parts = vec![
            part("text/plain", Some("one")),
            part("text/plain", Some("two")),
            part("text/html", Some("<div>three</div>")),
        ];
        let text = assemble_parts(&parts, &DecodeOptions::default()).text.unwrap();
        assert_eq!(text.matches(PART_SEPARATOR).count(), 2);
        let segments: Vec<&str> = text.split(PART_SEPARATOR).collect();
        assert_eq!(segments, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_parts_without_body_are_skipped() {
        let parts = vec![
            part("text/plain", Some("first")),
            part("text/plain", None),
            Part::new("text/html", Some(String::new())),
            part("text/plain", Some("last")),
        ];
        let text = assemble_parts(&parts, &DecodeOptions::default()).text.unwrap();
        assert_eq!(text, format!("first{}last", PART_SEPARATOR));
    }

    #[test]
    fn test_unsupported_parts_are_skipped() {
        let parts = vec![
            part("application/pdf", Some("%PDF-1.4")),
            part("text/plain", Some("body")),
            part("image/png", Some("not really a png")),
        ];
        let decoded = assemble_parts(&parts, &DecodeOptions::default());
        assert_eq!(decoded.text, Some("body".to_string()));
        assert!(decoded.failures.is_empty());
    }

    #[test]
    fn test_no_contributing_parts_is_absent() {
        let parts = vec![part("text/plain", None), part("application/zip", Some("PK"))];
        assert_eq!(assemble_parts(&parts, &DecodeOptions::default()).text, None);
        assert_eq!(assemble_parts(&[], &DecodeOptions::default()).text, None);
    }

    #[test]
    fn test_empty_text_parts_add_no_segment() {
        let parts = vec![
            part("text/plain", Some("A")),
            part("text/html", Some("<style>p {}</style>")),
            part("text/plain", Some("B")),
        ];
        let text = assemble_parts(&parts, &DecodeOptions::default()).text.unwrap();
        assert_eq!(text, format!("A{}B", PART_SEPARATOR));
    }

    #[test]
    fn test_decode_failure_is_isolated() {
        let parts = vec![
            part("text/plain", Some("good")),
            Part::new("text/plain", Some("!!not base64!!".to_string())),
            part("text/plain", Some("also good")),
        ];
        let decoded = assemble_parts(&parts, &DecodeOptions::default());
        assert_eq!(decoded.text, Some(format!("good{}also good", PART_SEPARATOR)));
        assert_eq!(decoded.failures.len(), 1);
        assert_eq!(decoded.failures[0].index, Some(1));
        assert_eq!(decoded.failures[0].mime_type, "text/plain");
    }

    #[test]
    fn test_each_part_normalized() {
        let parts = vec![
            part("text/plain", Some("a  \n\n\n\nb")),
            part("text/plain", Some("c\u{200B}d")),
        ];
        let text = assemble_parts(&parts, &DecodeOptions::default()).text.unwrap();
        assert_eq!(text, format!("a\n\nb{}cd", PART_SEPARATOR));
    }

    #[test]
    fn test_custom_separator_without_normalization() {
        let options = DecodeOptions {
            normalize: false,
            part_separator: "\n---\n".to_string(),
        };
        let parts = vec![part("text/plain", Some("a  \n\n\n")), part("text/plain", Some("b"))];
        let text = assemble_parts(&parts, &options).text.unwrap();
        assert_eq!(text, "a  \n\n\n\n---\nb");
    }
}

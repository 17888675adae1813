//! Visible text extraction

use scraper::{ElementRef, Html};

use crate::models::MimeKind;

/// Elements whose content is never rendered as page text
const HIDDEN_ELEMENTS: &[&str] = &["head", "script", "style", "noscript", "template"];

/// Convert decoded content of the given kind to visible text.
///
/// Plain text passes through unchanged, HTML is rendered with
/// [`html_to_text`], and unsupported kinds yield `None`.
pub fn extract_text(content: &str, kind: MimeKind) -> Option<String> {
    match kind {
        MimeKind::PlainText => Some(content.to_string()),
        MimeKind::Html => Some(html_to_text(content)),
        MimeKind::Unsupported => None,
    }
}

/// Render HTML to its visible text.
///
/// Text nodes are visited in document order, each one trimmed, and the
/// non-empty ones joined with a newline. Markup, attributes, comments and
/// hidden elements (scripts, styles, the document head) are dropped.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut segments = Vec::new();
    collect_text(document.root_element(), &mut segments);
    segments.join("\n")
}

fn collect_text(element: ElementRef<'_>, segments: &mut Vec<String>) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if !HIDDEN_ELEMENTS.contains(&child_element.value().name()) {
                collect_text(child_element, segments);
            }
        } else if let Some(text_node) = child.value().as_text() {
            let text = text_node.trim();
            if !text.is_empty() {
                segments.push(text.to_string());
            }
        }
    }
}

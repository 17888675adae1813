//! Text normalization
//!
//! Produces a canonical, comparable form of extracted text. The passes run
//! in a fixed order and the result is idempotent:
//! `normalize_text(&normalize_text(t)) == normalize_text(t)`.

use regex::Regex;
use std::sync::LazyLock;

// -- Normalization patterns --

/// Invisible characters plus the "Õè" mojibake left behind by mis-decoded
/// newsletters: NBSP, soft hyphen, combining grapheme joiner, zero-width
/// space/non-joiner/joiner, word joiner, byte order mark.
static RE_INVISIBLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("(?:Õè|[\u{00A0}\u{00AD}\u{034F}\u{200B}\u{200C}\u{200D}\u{2060}\u{FEFF}])+")
        .expect("valid invisible character regex")
});
static RE_LINE_EDGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t\r\x0B\x0C]*\n[ \t\r\x0B\x0C]*").expect("valid line edge regex")
});
static RE_BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid blank run regex"));

/// Normalize extracted text.
///
/// 1. Remove invisible characters and the mojibake sequence outright.
/// 2. Collapse horizontal whitespace touching a newline into the newline.
/// 3. Collapse three or more newlines into exactly two.
pub fn normalize_text(text: &str) -> String {
    let visible = strip_invisible(text);
    let trimmed = RE_LINE_EDGE.replace_all(&visible, "\n");
    RE_BLANK_RUN.replace_all(&trimmed, "\n\n").into_owned()
}

/// Removal can join the halves of a new "Õè", so repeat until nothing matches
fn strip_invisible(text: &str) -> String {
    let mut current = text.to_string();
    while RE_INVISIBLE.is_match(&current) {
        current = RE_INVISIBLE.replace_all(&current, "").into_owned();
    }
    current
}

//! Console presentation of digests

use std::io::{self, Write};

use mailtext::{Digest, DigestEntry};

const RULE_WIDTH: usize = 120;

/// Shown in place of a body that yielded no text
pub const NO_VISIBLE_TEXT: &str = "No visible text found.";

/// Write a digest as a console report
pub fn write_digest<W: Write>(out: &mut W, digest: &Digest) -> io::Result<()> {
    let rule = "-".repeat(RULE_WIDTH);

    writeln!(out, "\n{}\n", rule)?;
    writeln!(out, "Query:\t {}", digest.query.as_str().trim())?;
    writeln!(out, "Results: {}", digest.estimated_count)?;
    writeln!(out, "Showing: {}\n", digest.shown())?;

    if digest.is_empty() {
        writeln!(out, "No emails found\n")?;
        writeln!(out, "{}\n", rule)?;
        return Ok(());
    }

    for (count, entry) in digest.entries.iter().enumerate() {
        write_entry(out, count + 1, entry)?;
    }

    if !digest.unavailable.is_empty() {
        writeln!(out, "\nUnavailable messages:")?;
        for id in &digest.unavailable {
            writeln!(out, "  {}", id.as_str())?;
        }
    }

    writeln!(out, "\n{}\n", rule)?;
    Ok(())
}

/// Write one numbered entry
pub fn write_entry<W: Write>(out: &mut W, number: usize, entry: &DigestEntry) -> io::Result<()> {
    writeln!(out, "\n{}) {}\n", number, "- ".repeat(RULE_WIDTH / 2).trim_end())?;
    writeln!(out, "SUBJECT:  {}\n", entry.subject)?;
    match &entry.text {
        Some(text) => {
            writeln!(out, "BODY:\n")?;
            writeln!(out, "{}", text)?;
        }
        None => writeln!(out, "{}", NO_VISIBLE_TEXT)?,
    }
    Ok(())
}

//! Flat text form of a denylist
//!
//! One `vendor:product` per line, for editing in a text box or a file. There
//! is no escaping: a token containing `:` cannot be represented and such
//! lines are rejected.

use crate::entry::{DenylistEntry, EntryError};
use crate::model::Denylist;
use tracing::warn;

/// A line that could not be imported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1-based position in the input
    pub line_number: usize,
    pub line: String,
    pub reason: EntryError,
}

/// Result of decoding flat text lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLines {
    pub denylist: Denylist,
    /// Well-formed lines, duplicates included
    pub accepted: usize,
    pub rejected: Vec<RejectedLine>,
}

/// Decode flat text lines into a fresh denylist
///
/// Malformed lines are skipped with a warning; they never abort the batch.
pub fn parse_lines<I, S>(lines: I) -> ParsedLines
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = ParsedLines::default();

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        match DenylistEntry::parse(line) {
            Ok(entry) => {
                parsed.denylist.insert(entry.vendor_id(), entry.product_id());
                parsed.accepted += 1;
            }
            Err(reason) => {
                warn!("Couldn't understand `{}` (line {}): {}", line, index + 1, reason);
                parsed.rejected.push(RejectedLine {
                    line_number: index + 1,
                    line: line.to_string(),
                    reason,
                });
            }
        }
    }

    parsed
}

/// Split an edited text blob into lines (`\n` or `\r\n`)
pub fn split_text(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
}

/// Join flattened entries into a text blob, one per line
pub fn render_text(lines: &[String]) -> String {
    let mut text = lines.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }
    text
}

//! Transcript normalization.
//!
//! Scraped transcripts arrive with hard line wraps and a trailing attribution
//! block ("Text: ...", "Author: ...", "Source: ..."). Alignment wants one flat
//! line of plain content, so everything here reduces to that.

/// Metadata labels that start a trailing attribution block.
///
/// Matched case-insensitively against the start of a line; the matching line
/// and everything after it is dropped.
const METADATA_LABELS: [&str; 3] = ["text:", "author:", "source:"];

/// Normalize a raw transcript into alignment-ready plain text.
///
/// Drops trailing attribution/metadata lines, collapses all line breaks and
/// whitespace runs to single spaces, and trims. Pure and infallible: always
/// returns a string, possibly empty.
pub fn normalize(raw: &str) -> String {
    let body = strip_trailing_metadata(raw);
    // split_whitespace collapses newlines and space runs in one pass
    body.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate the transcript at the first line that begins with a known
/// metadata label.
fn strip_trailing_metadata(raw: &str) -> &str {
    let mut offset = 0;
    for line in raw.split_inclusive('\n') {
        if starts_with_metadata_label(line) {
            return &raw[..offset];
        }
        offset += line.len();
    }
    raw
}

fn starts_with_metadata_label(line: &str) -> bool {
    let trimmed = line.trim_start();
    METADATA_LABELS.iter().any(|label| {
        trimmed
            .get(..label.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(label))
    })
}

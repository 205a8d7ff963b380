//! Sentence boundary detection over aligned word timings.
//!
//! Takes the ordered word sequence returned by the alignment service and
//! groups it into sentence-level time spans. The trailing marker phrase
//! injected before alignment is located and excluded here.

use crate::defaults::MARKER_WORDS;

/// One word with its aligned time interval, in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedWord {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

impl TimedWord {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }
}

/// A sentence-level time span derived from a contiguous run of words.
///
/// `start` is the first word's start time, `end` the last word's end time,
/// `text` the space-joined word texts, and `index` a 1-based ordinal that
/// increases monotonically within a single audio file.
#[derive(Debug, Clone, PartialEq)]
pub struct SentenceSpan {
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub index: usize,
}

impl SentenceSpan {
    /// Span duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Find the first in-order occurrence of the marker-phrase word triple.
///
/// Returns the index of the triple's first word. The comparison is exact:
/// the service echoes the appended words back verbatim when it aligns them.
pub fn marker_index(words: &[TimedWord]) -> Option<usize> {
    words.windows(MARKER_WORDS.len()).position(|window| {
        window
            .iter()
            .zip(MARKER_WORDS.iter())
            .all(|(word, marker)| word.text == *marker)
    })
}

/// Group an aligned word sequence into sentence spans.
///
/// Words at or after the marker phrase are excluded first. A boundary falls
/// immediately after any word ending in `.`, `!`, or `?`; only the word's own
/// trailing character is inspected, never the following word. Words left
/// unterminated at the end of the input are emitted as one final span so no
/// trailing content is silently dropped.
///
/// If the marker phrase never aligned, the whole sequence is treated as
/// content. Known limitation: should the service fail to align the marker,
/// its words end up in the last span.
pub fn segment(words: &[TimedWord]) -> Vec<SentenceSpan> {
    let content = match marker_index(words) {
        Some(at) => &words[..at],
        None => words,
    };

    let mut spans = Vec::new();
    let mut sentence_start = 0;

    for (i, word) in content.iter().enumerate() {
        if ends_sentence(&word.text) {
            spans.push(make_span(&content[sentence_start..=i], spans.len() + 1));
            sentence_start = i + 1;
        }
    }

    // Trailing words without closing punctuation become the final span
    if sentence_start < content.len() {
        spans.push(make_span(&content[sentence_start..], spans.len() + 1));
    }

    spans
}

fn ends_sentence(word: &str) -> bool {
    word.ends_with('.') || word.ends_with('!') || word.ends_with('?')
}

fn make_span(words: &[TimedWord], index: usize) -> SentenceSpan {
    let text = words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string();
    SentenceSpan {
        text,
        start: words[0].start,
        end: words[words.len() - 1].end,
        index,
    }
}

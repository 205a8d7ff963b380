//! Forced-alignment service client.
//!
//! Wraps the external alignment call behind the `Aligner` trait: raw audio
//! plus transcript in, ordered word timings out. The marker phrase is
//! appended to the outgoing text here and stripped again in `segment`.
//!
//! The `CommandExecutor`-style seam exists for the same reason as in the
//! extractor: the batch runner is tested against a mock aligner, never
//! against the real service.

use crate::defaults::{ALIGNMENT_DUMP_SUFFIX, MARKER_PHRASE};
use crate::error::{CorpuscutError, Result};
use crate::segment::TimedWord;
use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Produces word-level timings for an (audio, transcript) pair.
#[async_trait]
pub trait Aligner: Send + Sync {
    /// Align `clean_text` against the audio at `audio_path`.
    ///
    /// Implementations are expected to return the words in audio order.
    /// No retry policy lives at this layer; a failed call is reported and the
    /// caller decides what to do with the work item.
    async fn align(&self, audio_path: &Path, clean_text: &str) -> Result<Vec<TimedWord>>;
}

/// Append the fixed marker phrase to the transcript sent for alignment.
///
/// Stabilizes timing at the trailing edge of the real content; the phrase is
/// excluded again during segmentation.
pub fn augment_transcript(clean_text: &str) -> String {
    format!("{clean_text} {MARKER_PHRASE}")
}

/// Path of the raw alignment dump kept next to the source audio.
///
/// The full response body is persisted here verbatim, independent of whether
/// segmentation succeeds, so items can be inspected or reprocessed without
/// calling the service again.
pub fn dump_path(audio_path: &Path) -> PathBuf {
    let mut path = audio_path.as_os_str().to_os_string();
    path.push(ALIGNMENT_DUMP_SUFFIX);
    PathBuf::from(path)
}

/// One word record as returned by the service.
#[derive(Debug, Deserialize)]
struct RawWord {
    word: String,
    start: f64,
    end: f64,
}

/// The two accepted top-level response shapes.
///
/// The service has returned both over time: an object wrapping the word list
/// under `wordstamps`, and the bare list itself. Decoded into a single
/// canonical word sequence right here at the boundary; shape ambiguity never
/// propagates past this module.
#[derive(Deserialize)]
#[serde(untagged)]
enum AlignmentResponse {
    Wrapped { wordstamps: Vec<RawWord> },
    Bare(Vec<RawWord>),
}

/// Parse a raw response body into timed words.
///
/// Any shape other than the two accepted ones is a hard
/// [`CorpuscutError::AlignmentFormat`] failure.
pub fn parse_wordstamps(body: &str) -> Result<Vec<TimedWord>> {
    let response: AlignmentResponse =
        serde_json::from_str(body).map_err(|e| CorpuscutError::AlignmentFormat {
            message: format!("expected wordstamps object or bare word array: {e}"),
        })?;

    let raw = match response {
        AlignmentResponse::Wrapped { wordstamps } => wordstamps,
        AlignmentResponse::Bare(words) => words,
    };

    Ok(raw
        .into_iter()
        .map(|w| TimedWord::new(w.word, w.start, w.end))
        .collect())
}

/// HTTP implementation of [`Aligner`].
///
/// Posts the audio bytes and augmented transcript as a multipart form and
/// persists the raw response body next to the audio before parsing it.
pub struct HttpAligner {
    endpoint: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpAligner {
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Aligner for HttpAligner {
    async fn align(&self, audio_path: &Path, clean_text: &str) -> Result<Vec<TimedWord>> {
        let augmented = augment_transcript(clean_text);
        let audio_bytes = fs::read(audio_path)?;
        let file_name = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());

        debug!(
            "aligning {} ({} bytes, {} transcript chars)",
            audio_path.display(),
            audio_bytes.len(),
            augmented.len()
        );

        let form = reqwest::multipart::Form::new()
            .part(
                "audio_file",
                reqwest::multipart::Part::bytes(audio_bytes).file_name(file_name),
            )
            .text("transcript", augmented);

        let mut request = self.client.post(&self.endpoint).multipart(form);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CorpuscutError::AlignmentService {
                message: format!("request to {} failed: {e}", self.endpoint),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CorpuscutError::AlignmentService {
                message: format!("failed to read response body: {e}"),
            })?;

        if !status.is_success() {
            return Err(CorpuscutError::AlignmentService {
                message: format!("service returned {status}: {}", truncate(&body, 200)),
            });
        }

        // Persist the raw response before parsing so a format failure still
        // leaves the dump behind for inspection.
        let dump = dump_path(audio_path);
        fs::write(&dump, &body)?;
        info!("saved alignment dump to {}", dump.display());

        parse_wordstamps(&body)
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((at, _)) => &s[..at],
        None => s,
    }
}

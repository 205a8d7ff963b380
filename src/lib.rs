//! corpuscut - sentence-level speech corpus builder
//!
//! Turns long-form narrated audio plus its transcript into short
//! sentence-level clips with aligned text: word timings come from an
//! external forced-alignment service, sentence boundaries from punctuation,
//! and ffmpeg cuts the audio losslessly. Results land in an append-only
//! manifest so interrupted batches resume where they left off.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod align;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod defaults;
pub mod diagnostics;
pub mod error;
pub mod extract;
pub mod manifest;
pub mod runner;
pub mod segment;
pub mod transcript;

// Core seams (align → segment → cut → record)
pub use align::{Aligner, HttpAligner};
pub use extract::{ClipExtractor, CommandExecutor, SystemCommandExecutor};

// Pipeline data
pub use corpus::{CorpusWalker, TranscriptSource, WorkItem};
pub use manifest::{ManifestRecord, ManifestWriter};
pub use segment::{segment, SentenceSpan, TimedWord};

// Batch runner
pub use runner::Segmenter;

// Error handling
pub use error::{CorpuscutError, Result};

// Config
pub use config::Config;

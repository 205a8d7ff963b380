//! Shared constants for corpuscut.
//!
//! Single home for the fixed names and conventions used across modules so the
//! walker, the aligner, and the runner never disagree about them.

/// Marker phrase appended to every transcript before forced alignment.
///
/// The alignment service tends to drift on the last second or two of real
/// content; a known trailing phrase absorbs that drift and is stripped back
/// out during segmentation.
pub const MARKER_PHRASE: &str = "Generalitat de Catalunya";

/// The marker phrase as its three component words, in order.
///
/// Segmentation scans the aligned word sequence for this triple and excludes
/// everything at or after its first occurrence.
pub const MARKER_WORDS: [&str; 3] = ["Generalitat", "de", "Catalunya"];

/// Filename of the hierarchical corpus index produced by the scraper.
pub const INDEX_FILENAME: &str = "master_data.json";

/// Filename of the append-only segment manifest.
pub const MANIFEST_FILENAME: &str = "segments.csv";

/// Manifest field delimiter.
///
/// Transcript text routinely contains commas, so the manifest is
/// pipe-delimited rather than comma-delimited.
pub const MANIFEST_DELIMITER: char = '|';

/// Suffix appended to an audio file's path for the raw alignment dump.
pub const ALIGNMENT_DUMP_SUFFIX: &str = "_alignment.json";

/// Suffix appended to an audio file's path for the completion marker.
///
/// Presence of this sidecar is the sole signal that an item was fully
/// processed; a missing marker forces reprocessing even if partial output
/// exists from an interrupted run.
pub const DONE_MARKER_SUFFIX: &str = ".done";

/// Transcript file extension recognized during directory scanning.
pub const TRANSCRIPT_EXTENSION: &str = "txt";

/// Audio file extension recognized during directory scanning.
pub const AUDIO_EXTENSION: &str = "mp3";

/// Filename substring that marks a fast speaking-pace audio variant.
///
/// Rapid variants are preferred: faster speech per clip means fewer clips and
/// less silence per clip in the resulting corpus.
pub const RAPID_VARIANT_KEYWORD: &str = "rapid";

/// Name of the subdirectory (under the output directory) that holds clips.
pub const AUDIO_OUTPUT_SUBDIR: &str = "audio";

/// External tool used to cut audio losslessly.
pub const DEFAULT_EXTRACTION_TOOL: &str = "ffmpeg";

/// Default alignment service endpoint.
pub const DEFAULT_ALIGN_ENDPOINT: &str = "http://localhost:9037/align";

/// Environment variable holding the alignment service token.
pub const ALIGN_TOKEN_ENV: &str = "CORPUSCUT_ALIGN_TOKEN";

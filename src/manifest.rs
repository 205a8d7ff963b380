//! Append-only segment manifest.
//!
//! One shared pipe-delimited file mapping each clip filename to its
//! transcript text. Rows are only ever appended; nothing is rewritten or
//! deduplicated after the fact. Single-process, sequential access.

use crate::defaults::MANIFEST_DELIMITER;
use crate::error::{CorpuscutError, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One manifest row: clip filename plus its transcript.
///
/// Filename uniqueness is the caller's responsibility; names are derived
/// deterministically from level, topic, and sentence ordinal upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestRecord {
    pub filename: String,
    pub transcript: String,
}

/// Writer for the shared segment manifest file.
pub struct ManifestWriter {
    path: PathBuf,
}

impl ManifestWriter {
    /// Open the manifest at `path`, writing the header row if the file does
    /// not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            let header = format!("filename{MANIFEST_DELIMITER}transcript\n");
            std::fs::write(&path, header).map_err(|e| CorpuscutError::ManifestWrite {
                message: format!("failed to initialize {}: {e}", path.display()),
            })?;
        }
        Ok(Self { path })
    }

    /// Append records to the manifest. Additive only.
    pub fn append(&self, records: &[ManifestRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| CorpuscutError::ManifestWrite {
                message: format!("failed to open {}: {e}", self.path.display()),
            })?;
        for record in records {
            writeln!(
                file,
                "{}{}{}",
                record.filename, MANIFEST_DELIMITER, record.transcript
            )
            .map_err(|e| CorpuscutError::ManifestWrite {
                message: format!("failed to append to {}: {e}", self.path.display()),
            })?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

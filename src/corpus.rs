//! Corpus discovery and per-item completion tracking.
//!
//! The scraper leaves behind a `<root>/<level>/<topic>/` tree of transcripts
//! and audio variants, usually accompanied by a `master_data.json` index.
//! The walker turns that layout into an ordered list of work items, reading
//! the index when it has the expected structure and scanning the directory
//! tree otherwise. The index has shipped in more than one shape over time,
//! so both known variants are tolerated.
//!
//! Idempotency is a sidecar file per audio path: `is_done` / `mark_done`
//! consult nothing else, so a run interrupted mid-item is simply redone.

use crate::defaults::{
    AUDIO_EXTENSION, DONE_MARKER_SUFFIX, INDEX_FILENAME, RAPID_VARIANT_KEYWORD,
    TRANSCRIPT_EXTENSION,
};
use crate::error::{CorpuscutError, Result};
use log::{debug, info, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Where a work item's transcript comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptSource {
    /// Transcript text carried inline by the index.
    Inline(String),
    /// Path to a transcript file on disk.
    File(PathBuf),
}

/// One (audio, transcript, level, topic) unit of processing.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItem {
    pub audio_path: PathBuf,
    pub transcript: TranscriptSource,
    pub level: String,
    pub topic: String,
}

impl WorkItem {
    /// Identity string used in logs: `level/topic/filename`.
    pub fn identity(&self) -> String {
        let filename = self
            .audio_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{}/{}/{}", self.level, self.topic, filename)
    }
}

/// Path of the completion marker for an audio file.
pub fn marker_path(audio_path: &Path) -> PathBuf {
    let mut path = audio_path.as_os_str().to_os_string();
    path.push(DONE_MARKER_SUFFIX);
    PathBuf::from(path)
}

// ---------------------------------------------------------------------------
// Index file shapes
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct CorpusIndex {
    // BTreeMap keeps level iteration order deterministic across runs
    levels: BTreeMap<String, LevelEntry>,
}

/// A level's topic list, in either of the two shapes the scraper has
/// produced: wrapped under a `topics` key, or the level entry being the
/// list itself.
#[derive(Deserialize)]
#[serde(untagged)]
enum LevelEntry {
    Keyed { topics: Vec<TopicEntry> },
    Bare(Vec<TopicEntry>),
}

impl LevelEntry {
    fn topics(self) -> Vec<TopicEntry> {
        match self {
            LevelEntry::Keyed { topics } => topics,
            LevelEntry::Bare(topics) => topics,
        }
    }
}

#[derive(Deserialize)]
struct TopicEntry {
    path: Option<PathBuf>,
    topic: Option<String>,
    transcript: Option<TranscriptEntry>,
    audio_files: Option<Vec<AudioEntry>>,
}

#[derive(Deserialize)]
struct TranscriptEntry {
    content: Option<String>,
    path: Option<PathBuf>,
}

#[derive(Deserialize)]
struct AudioEntry {
    path: PathBuf,
}

// ---------------------------------------------------------------------------
// Walker
// ---------------------------------------------------------------------------

/// Discovers work items under a corpus root and tracks per-item completion.
pub struct CorpusWalker {
    root: PathBuf,
}

impl CorpusWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Enumerate work items, index first, directory scan as fallback.
    ///
    /// A missing corpus root is the only hard failure; everything else
    /// degrades to skipping the affected topic with a warning.
    pub fn discover(&self) -> Result<Vec<WorkItem>> {
        if !self.root.is_dir() {
            return Err(CorpuscutError::CorpusRootMissing {
                path: self.root.display().to_string(),
            });
        }

        match self.load_index() {
            Some(index) => {
                info!("using {} for discovery", INDEX_FILENAME);
                Ok(self.discover_from_index(index))
            }
            None => {
                info!("no usable {}, scanning directory tree", INDEX_FILENAME);
                self.discover_by_scan()
            }
        }
    }

    /// A work item is done when its completion marker exists.
    pub fn is_done(&self, item: &WorkItem) -> bool {
        marker_path(&item.audio_path).exists()
    }

    /// Record that a work item was fully processed.
    ///
    /// The marker content is a unix timestamp; only its presence matters.
    pub fn mark_done(&self, item: &WorkItem) -> Result<()> {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs().to_string())
            .unwrap_or_default();
        fs::write(marker_path(&item.audio_path), stamp)?;
        Ok(())
    }

    /// Load and parse the index, or None when it is absent or structurally
    /// unusable (both cases fall back to scanning).
    fn load_index(&self) -> Option<CorpusIndex> {
        let path = self.root.join(INDEX_FILENAME);
        let contents = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(index) => Some(index),
            Err(e) => {
                warn!("{} has unexpected structure ({e}), falling back to scan", path.display());
                None
            }
        }
    }

    fn discover_from_index(&self, index: CorpusIndex) -> Vec<WorkItem> {
        let mut items = Vec::new();

        for (level, entry) in index.levels {
            debug!("indexed level {level}");
            for topic_entry in entry.topics() {
                let Some(topic) = topic_entry.topic.clone() else {
                    warn!("topic entry without a name in level {level}, skipping");
                    continue;
                };
                let Some(topic_dir) = topic_entry.path.clone() else {
                    warn!("no path for {level}/{topic}, skipping");
                    continue;
                };
                if !topic_dir.is_dir() {
                    warn!("topic directory not found: {}", topic_dir.display());
                    continue;
                }

                let Some(transcript) = self.resolve_transcript(&topic_entry, &topic_dir) else {
                    warn!("no transcript found for {level}/{topic}");
                    continue;
                };

                let audio_files = self.resolve_audio(&topic_entry, &topic_dir);
                if audio_files.is_empty() {
                    warn!("no audio files found for {level}/{topic}");
                    continue;
                }

                for audio_path in audio_files {
                    items.push(WorkItem {
                        audio_path,
                        transcript: transcript.clone(),
                        level: level.clone(),
                        topic: topic.clone(),
                    });
                }
            }
        }

        items
    }

    /// Transcript for an indexed topic: inline content first, then the
    /// indexed file path, then any transcript file in the topic directory.
    fn resolve_transcript(
        &self,
        entry: &TopicEntry,
        topic_dir: &Path,
    ) -> Option<TranscriptSource> {
        if let Some(transcript) = &entry.transcript {
            if let Some(content) = &transcript.content {
                return Some(TranscriptSource::Inline(content.clone()));
            }
            if let Some(path) = &transcript.path {
                if path.is_file() {
                    return Some(TranscriptSource::File(path.clone()));
                }
            }
        }
        files_with_extension(topic_dir, TRANSCRIPT_EXTENSION)
            .into_iter()
            .next()
            .map(TranscriptSource::File)
    }

    /// Audio variants for an indexed topic: the index's file list when it
    /// has existing entries, else a directory scan. Either way the rapid
    /// variants win.
    fn resolve_audio(&self, entry: &TopicEntry, topic_dir: &Path) -> Vec<PathBuf> {
        let from_index: Vec<PathBuf> = entry
            .audio_files
            .iter()
            .flatten()
            .map(|a| a.path.clone())
            .filter(|p| p.is_file())
            .collect();

        if !from_index.is_empty() {
            return prefer_rapid_variants(from_index);
        }
        prefer_rapid_variants(files_with_extension(topic_dir, AUDIO_EXTENSION))
    }

    fn discover_by_scan(&self) -> Result<Vec<WorkItem>> {
        let mut items = Vec::new();

        for level_dir in visible_subdirectories(&self.root)? {
            let level = directory_name(&level_dir);

            for topic_dir in visible_subdirectories(&level_dir)? {
                let topic = directory_name(&topic_dir);

                let Some(transcript_path) =
                    files_with_extension(&topic_dir, TRANSCRIPT_EXTENSION)
                        .into_iter()
                        .next()
                else {
                    warn!("no transcript file found for {level}/{topic}");
                    continue;
                };

                let audio_files =
                    prefer_rapid_variants(files_with_extension(&topic_dir, AUDIO_EXTENSION));
                if audio_files.is_empty() {
                    warn!("no audio files found for {level}/{topic}");
                    continue;
                }

                for audio_path in audio_files {
                    items.push(WorkItem {
                        audio_path,
                        transcript: TranscriptSource::File(transcript_path.clone()),
                        level: level.clone(),
                        topic: topic.clone(),
                    });
                }
            }
        }

        Ok(items)
    }
}

/// Keep only the preferred speaking-pace class: rapid variants when any
/// exist, everything else otherwise. Lexicographic order within the class
/// keeps selection deterministic regardless of directory listing order.
fn prefer_rapid_variants(mut files: Vec<PathBuf>) -> Vec<PathBuf> {
    let has_rapid = files.iter().any(|p| is_rapid_variant(p));
    if has_rapid {
        files.retain(|p| is_rapid_variant(p));
    }
    files.sort();
    files
}

fn is_rapid_variant(path: &Path) -> bool {
    path.file_name()
        .map(|n| {
            n.to_string_lossy()
                .to_lowercase()
                .contains(RAPID_VARIANT_KEYWORD)
        })
        .unwrap_or(false)
}

/// Subdirectories of `dir`, sorted, excluding dot-prefixed (hidden) names.
fn visible_subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter(|path| !directory_name(path).starts_with('.'))
        .collect();
    dirs.sort();
    Ok(dirs)
}

/// Files in `dir` with the given extension, sorted. Unreadable directories
/// yield an empty list; the caller treats that the same as "nothing found".
fn files_with_extension(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .map(|e| e.eq_ignore_ascii_case(extension))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}

fn directory_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

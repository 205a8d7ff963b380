//! Batch segmentation runner.
//!
//! Composition root for one corpus pass: walker → normalize → align →
//! segment → cut clips → manifest → completion marker, one work item at a
//! time. Failures are contained per item; the batch always moves on.

use crate::align::Aligner;
use crate::corpus::{CorpusWalker, TranscriptSource, WorkItem};
use crate::defaults::{AUDIO_EXTENSION, AUDIO_OUTPUT_SUBDIR, MANIFEST_FILENAME};
use crate::error::{CorpuscutError, Result};
use crate::extract::{ClipExtractor, CommandExecutor};
use crate::manifest::{ManifestRecord, ManifestWriter};
use crate::segment::segment;
use crate::transcript::normalize;
use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Drives segmentation of discovered work items into a corpus of clips.
pub struct Segmenter<A: Aligner, E: CommandExecutor> {
    aligner: A,
    extractor: ClipExtractor<E>,
    manifest: ManifestWriter,
    audio_dir: PathBuf,
}

impl<A: Aligner, E: CommandExecutor> Segmenter<A, E> {
    /// Create a segmenter writing clips and the manifest under `output_dir`.
    ///
    /// Creates the output layout on construction so the first append cannot
    /// fail on a missing directory.
    pub fn new(aligner: A, extractor: ClipExtractor<E>, output_dir: &Path) -> Result<Self> {
        let audio_dir = output_dir.join(AUDIO_OUTPUT_SUBDIR);
        fs::create_dir_all(&audio_dir)?;
        let manifest = ManifestWriter::open(output_dir.join(MANIFEST_FILENAME))?;
        Ok(Self {
            aligner,
            extractor,
            manifest,
            audio_dir,
        })
    }

    pub fn manifest_path(&self) -> &Path {
        self.manifest.path()
    }

    pub fn audio_dir(&self) -> &Path {
        &self.audio_dir
    }

    /// Process one work item: align, segment, cut, record.
    ///
    /// Returns the number of clips written to the manifest. A failed cut
    /// drops that clip from the manifest but the remaining spans continue.
    pub async fn process_item(&self, item: &WorkItem) -> Result<usize> {
        info!("processing {}", item.identity());

        let raw = self.read_transcript(item)?;
        let clean = normalize(&raw);
        if clean.is_empty() {
            return Err(CorpuscutError::InputMissing {
                item: item.identity(),
            });
        }

        let words = self.aligner.align(&item.audio_path, &clean).await?;
        let spans = segment(&words);
        info!("{}: {} sentence spans", item.identity(), spans.len());

        let mut records = Vec::new();
        for span in &spans {
            let filename = clip_filename(&item.level, &item.topic, span.index);
            let destination = self.audio_dir.join(&filename);
            match self
                .extractor
                .extract(&item.audio_path, span, &destination)
            {
                Ok(()) => records.push(ManifestRecord {
                    filename,
                    transcript: span.text.clone(),
                }),
                Err(e) => warn!(
                    "failed to cut {} sentence {}: {e}",
                    item.identity(),
                    span.index
                ),
            }
        }

        self.manifest.append(&records)?;
        Ok(records.len())
    }

    /// Process every not-yet-done work item under the walker's root.
    ///
    /// Returns the number of items successfully processed. Per-item failures
    /// are logged with the item's identity and never abort the batch; only a
    /// missing corpus root is fatal. With `once` the run stops after the
    /// first successfully processed item.
    pub async fn run(&self, walker: &CorpusWalker, once: bool) -> Result<usize> {
        let items = walker.discover()?;
        info!("discovered {} work items under {}", items.len(), walker.root().display());

        let mut processed = 0;
        for item in &items {
            if walker.is_done(item) {
                info!("skipping already processed {}", item.identity());
                continue;
            }

            match self.process_item(item).await {
                Ok(clips) => {
                    if let Err(e) = walker.mark_done(item) {
                        // Without a marker the item is redone next run;
                        // counting it as processed would misreport that.
                        error!(
                            "failed to write completion marker for {}: {e}",
                            item.identity()
                        );
                        continue;
                    }
                    processed += 1;
                    info!("processed {} ({} clips)", item.identity(), clips);
                    if once {
                        info!("stopping after first processed item");
                        break;
                    }
                }
                Err(CorpuscutError::InputMissing { item }) => {
                    warn!("skipping {item}: no transcript or audio");
                }
                Err(e) => {
                    error!("failed to process {}: {e}", item.identity());
                }
            }
        }

        info!("batch complete: {processed} items processed");
        Ok(processed)
    }

    fn read_transcript(&self, item: &WorkItem) -> Result<String> {
        match &item.transcript {
            TranscriptSource::Inline(text) => Ok(text.clone()),
            TranscriptSource::File(path) => {
                if !path.is_file() {
                    return Err(CorpuscutError::InputMissing {
                        item: item.identity(),
                    });
                }
                Ok(fs::read_to_string(path)?)
            }
        }
    }
}

/// Deterministic clip filename: `<level>_<topic>_sentence<N>.mp3` with
/// non-alphanumeric topic characters flattened to underscores.
pub fn clip_filename(level: &str, topic: &str, index: usize) -> String {
    format!(
        "{level}_{}_sentence{index}.{AUDIO_EXTENSION}",
        sanitize_topic(topic)
    )
}

fn sanitize_topic(topic: &str) -> String {
    topic
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

use anyhow::{bail, Context, Result};
use clap::Parser;
use corpuscut::align::HttpAligner;
use corpuscut::cli::{Cli, Commands};
use corpuscut::config::Config;
use corpuscut::corpus::{CorpusWalker, TranscriptSource, WorkItem};
use corpuscut::diagnostics::check_dependencies;
use corpuscut::extract::ClipExtractor;
use corpuscut::runner::Segmenter;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let mut config = load_config(cli.config.as_deref())?.with_env_overrides();
    if let Some(dir) = &cli.data_dir {
        config.corpus.data_dir = dir.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.corpus.output_dir = dir.clone();
    }

    match cli.command {
        Some(Commands::Check) => {
            if !check_dependencies(&config) {
                bail!("missing dependencies");
            }
            Ok(())
        }
        Some(Commands::File {
            audio,
            transcript,
            level,
            topic,
        }) => run_single_file(&config, audio.as_path(), transcript.as_path(), level, topic).await,
        None => run_batch(&config, cli.once, cli.quiet).await,
    }
}

/// Process the whole corpus tree.
async fn run_batch(config: &Config, once: bool, quiet: bool) -> Result<()> {
    let segmenter = build_segmenter(config)?;
    let walker = CorpusWalker::new(&config.corpus.data_dir);

    let processed = segmenter.run(&walker, once).await?;

    if !quiet {
        println!("Processed {processed} audio files");
        println!("Clips saved to: {}", segmenter.audio_dir().display());
        println!("Manifest: {}", segmenter.manifest_path().display());
    }
    Ok(())
}

/// Process one explicit audio/transcript pair (validation mode).
async fn run_single_file(
    config: &Config,
    audio: &Path,
    transcript: &Path,
    level: String,
    topic: String,
) -> Result<()> {
    if !audio.is_file() {
        bail!("audio file not found: {}", audio.display());
    }
    if !transcript.is_file() {
        bail!("transcript file not found: {}", transcript.display());
    }

    let segmenter = build_segmenter(config)?;
    let item = WorkItem {
        audio_path: audio.to_path_buf(),
        transcript: TranscriptSource::File(transcript.to_path_buf()),
        level,
        topic,
    };

    let clips = segmenter
        .process_item(&item)
        .await
        .with_context(|| format!("failed to process {}", item.identity()))?;
    println!("Segmented {} into {clips} clips", audio.display());
    println!("Manifest: {}", segmenter.manifest_path().display());
    Ok(())
}

fn build_segmenter(config: &Config) -> Result<Segmenter<HttpAligner, corpuscut::SystemCommandExecutor>> {
    let aligner = HttpAligner::new(
        config.alignment.endpoint.clone(),
        config.alignment.token.clone(),
    );
    let extractor = ClipExtractor::system(config.extraction.tool.clone());
    let segmenter = Segmenter::new(aligner, extractor, &config.corpus.output_dir)
        .context("failed to prepare output directory")?;
    Ok(segmenter)
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            Config::load(path).with_context(|| format!("failed to load {}", path.display()))
        }
        None => {
            let default = Config::default_path();
            Config::load_or_default(&default)
                .with_context(|| format!("failed to load {}", default.display()))
        }
    }
}

/// Route log level through RUST_LOG unless the operator already set one.
fn init_logging(quiet: bool, verbose: u8) {
    if std::env::var_os("RUST_LOG").is_none() {
        let level = if quiet {
            "error"
        } else {
            match verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        };
        std::env::set_var("RUST_LOG", format!("corpuscut={level}"));
    }
    pretty_env_logger::init();
}

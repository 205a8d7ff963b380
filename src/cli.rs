//! Command-line interface for corpuscut
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sentence-level speech corpus builder driven by forced alignment
#[derive(Parser, Debug)]
#[command(
    name = "corpuscut",
    version,
    about = "Cut narrated audio into sentence clips with aligned transcripts"
)]
pub struct Cli {
    /// Subcommand to execute (default: process the whole corpus)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: debug, -vv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Directory containing the scraped audio/transcript tree
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory for clips and the segment manifest
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Stop after the first successfully processed item (for validation)
    #[arg(long)]
    pub once: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check external dependencies (ffmpeg, alignment service credentials)
    Check,

    /// Process a single explicit audio/transcript pair
    File {
        /// Audio file to segment
        #[arg(long, value_name = "PATH")]
        audio: PathBuf,

        /// Transcript file for the audio
        #[arg(long, value_name = "PATH")]
        transcript: PathBuf,

        /// Level code attached to clip filenames (e.g. b1)
        #[arg(long, value_name = "CODE")]
        level: String,

        /// Topic name attached to clip filenames
        #[arg(long, value_name = "NAME")]
        topic: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_args_means_batch_run() {
        let cli = Cli::parse_from(["corpuscut"]);
        assert!(cli.command.is_none());
        assert!(!cli.once);
        assert!(cli.data_dir.is_none());
    }

    #[test]
    fn test_batch_flags() {
        let cli = Cli::parse_from([
            "corpuscut",
            "--data-dir",
            "/srv/in",
            "--output-dir",
            "/srv/out",
            "--once",
            "-vv",
        ]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/srv/in")));
        assert_eq!(cli.output_dir, Some(PathBuf::from("/srv/out")));
        assert!(cli.once);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_check_subcommand() {
        let cli = Cli::parse_from(["corpuscut", "check"]);
        assert!(matches!(cli.command, Some(Commands::Check)));
    }

    #[test]
    fn test_file_subcommand() {
        let cli = Cli::parse_from([
            "corpuscut",
            "file",
            "--audio",
            "a.mp3",
            "--transcript",
            "t.txt",
            "--level",
            "b1",
            "--topic",
            "el_temps",
        ]);
        match cli.command {
            Some(Commands::File {
                audio,
                transcript,
                level,
                topic,
            }) => {
                assert_eq!(audio, PathBuf::from("a.mp3"));
                assert_eq!(transcript, PathBuf::from("t.txt"));
                assert_eq!(level, "b1");
                assert_eq!(topic, "el_temps");
            }
            _ => panic!("expected file subcommand"),
        }
    }

    #[test]
    fn test_file_subcommand_requires_all_parts() {
        let result = Cli::try_parse_from(["corpuscut", "file", "--audio", "a.mp3"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_verifies() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

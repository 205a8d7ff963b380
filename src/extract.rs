//! Lossless audio clip extraction with testable command execution.
//!
//! Cutting is delegated to ffmpeg with stream copy (no re-encoding). The
//! `CommandExecutor` trait enables full testability without invoking the
//! real tool.

use crate::error::{CorpuscutError, Result};
use crate::segment::SentenceSpan;
use std::path::Path;
use std::process::Command;

/// Trait for executing system commands.
///
/// Object-safe, Send + Sync for use behind shared references.
/// Enables testability by allowing mock implementations.
pub trait CommandExecutor: Send + Sync {
    /// Execute a command with arguments.
    ///
    /// Returns the stdout of the command on success.
    /// Returns an error if the command fails or is not found.
    fn execute(&self, command: &str, args: &[&str]) -> Result<String>;
}

/// Production command executor using std::process::Command.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandExecutor;

impl SystemCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for SystemCommandExecutor {
    fn execute(&self, command: &str, args: &[&str]) -> Result<String> {
        let output = Command::new(command).args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CorpuscutError::ExtractionToolNotFound {
                    tool: command.to_string(),
                }
            } else {
                CorpuscutError::ExtractionTool {
                    message: format!("Failed to execute {}: {}", command, e),
                }
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CorpuscutError::ExtractionTool {
                message: format!(
                    "{} failed with status {:?}: {}",
                    command, output.status, stderr
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Clip extractor that cuts sentence spans out of a source audio file.
pub struct ClipExtractor<E: CommandExecutor> {
    tool: String,
    executor: E,
}

impl<E: CommandExecutor> ClipExtractor<E> {
    /// Create a ClipExtractor invoking `tool` through the given executor.
    pub fn new(tool: impl Into<String>, executor: E) -> Self {
        Self {
            tool: tool.into(),
            executor,
        }
    }

    /// Cut one sentence span from `source` to `destination`, losslessly.
    ///
    /// Invokes the tool with a start offset and a duration in seconds, codec
    /// copy, overwriting any existing file at the destination. Synchronous
    /// and blocking relative to the work item being processed.
    pub fn extract(&self, source: &Path, span: &SentenceSpan, destination: &Path) -> Result<()> {
        let source = source.to_string_lossy();
        let destination = destination.to_string_lossy();
        let start = span.start.to_string();
        let duration = span.duration().to_string();

        self.executor.execute(
            &self.tool,
            &[
                "-i",
                &source,
                "-ss",
                &start,
                "-t",
                &duration,
                "-c:a",
                "copy", // stream copy, no re-encoding
                "-y",   // overwrite existing output
                &destination,
            ],
        )?;
        Ok(())
    }
}

impl ClipExtractor<SystemCommandExecutor> {
    /// Create a ClipExtractor backed by the system command executor.
    pub fn system(tool: impl Into<String>) -> Self {
        Self::new(tool, SystemCommandExecutor::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Mock command executor for testing.
    ///
    /// Records all command executions and returns configured responses.
    #[derive(Debug, Default)]
    pub struct MockCommandExecutor {
        calls: Mutex<Vec<(String, Vec<String>)>>,
        responses: Mutex<VecDeque<Result<String>>>,
    }

    impl MockCommandExecutor {
        pub fn new() -> Self {
            Self::default()
        }

        /// Add an error response to the queue.
        pub fn with_error(self, error: CorpuscutError) -> Self {
            self.responses.lock().unwrap().push_back(Err(error));
            self
        }

        /// Get all recorded calls.
        pub fn calls(&self) -> Vec<(String, Vec<String>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CommandExecutor for MockCommandExecutor {
        fn execute(&self, command: &str, args: &[&str]) -> Result<String> {
            self.calls.lock().unwrap().push((
                command.to_string(),
                args.iter().map(|s| s.to_string()).collect(),
            ));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }

    fn span(start: f64, end: f64) -> SentenceSpan {
        SentenceSpan {
            text: "Bon dia.".to_string(),
            start,
            end,
            index: 1,
        }
    }

    #[test]
    fn test_extract_builds_lossless_cut_command() {
        let extractor = ClipExtractor::new("ffmpeg", MockCommandExecutor::new());

        extractor
            .extract(
                Path::new("/in/episode.mp3"),
                &span(1.5, 4.0),
                Path::new("/out/b1_tema_sentence1.mp3"),
            )
            .unwrap();

        let calls = extractor.executor.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "ffmpeg");
        assert_eq!(
            calls[0].1,
            vec![
                "-i",
                "/in/episode.mp3",
                "-ss",
                "1.5",
                "-t",
                "2.5",
                "-c:a",
                "copy",
                "-y",
                "/out/b1_tema_sentence1.mp3",
            ]
        );
    }

    #[test]
    fn test_extract_passes_zero_start() {
        let extractor = ClipExtractor::new("ffmpeg", MockCommandExecutor::new());
        extractor
            .extract(Path::new("a.mp3"), &span(0.0, 3.0), Path::new("out.mp3"))
            .unwrap();

        let calls = extractor.executor.calls();
        assert_eq!(calls[0].1[3], "0");
        assert_eq!(calls[0].1[5], "3");
    }

    #[test]
    fn test_extract_propagates_tool_failure() {
        let mock = MockCommandExecutor::new().with_error(CorpuscutError::ExtractionTool {
            message: "exit status 1".to_string(),
        });
        let extractor = ClipExtractor::new("ffmpeg", mock);

        let result = extractor.extract(Path::new("a.mp3"), &span(0.0, 1.0), Path::new("out.mp3"));
        assert!(matches!(result, Err(CorpuscutError::ExtractionTool { .. })));
    }

    #[test]
    fn test_extract_propagates_tool_not_found() {
        let mock = MockCommandExecutor::new().with_error(CorpuscutError::ExtractionToolNotFound {
            tool: "ffmpeg".to_string(),
        });
        let extractor = ClipExtractor::new("ffmpeg", mock);

        let result = extractor.extract(Path::new("a.mp3"), &span(0.0, 1.0), Path::new("out.mp3"));
        assert!(matches!(
            result,
            Err(CorpuscutError::ExtractionToolNotFound { .. })
        ));
    }

    #[test]
    fn test_configured_tool_name_is_used() {
        let extractor = ClipExtractor::new("avconv", MockCommandExecutor::new());
        extractor
            .extract(Path::new("a.mp3"), &span(0.0, 1.0), Path::new("out.mp3"))
            .unwrap();
        assert_eq!(extractor.executor.calls()[0].0, "avconv");
    }

    #[test]
    fn test_system_executor_nonexistent_command() {
        let executor = SystemCommandExecutor::new();
        let result = executor.execute("nonexistent-command-xyz-12345", &[]);
        assert!(matches!(
            result,
            Err(CorpuscutError::ExtractionToolNotFound { .. })
        ));
    }

    #[test]
    fn test_command_executor_is_object_safe() {
        let executor: Box<dyn CommandExecutor> = Box::new(MockCommandExecutor::new());
        assert!(executor.execute("echo", &["test"]).is_ok());
    }

    #[test]
    fn test_command_executor_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<Box<dyn CommandExecutor>>();
        assert_sync::<Box<dyn CommandExecutor>>();
    }
}

//! Error types for corpuscut.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CorpuscutError {
    // Configuration errors
    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Corpus discovery errors
    #[error("Corpus root directory not found: {path}")]
    CorpusRootMissing { path: String },

    #[error("No transcript or audio for {item}")]
    InputMissing { item: String },

    // Alignment errors
    #[error("Alignment service error: {message}")]
    AlignmentService { message: String },

    #[error("Unrecognized alignment response shape: {message}")]
    AlignmentFormat { message: String },

    // Clip extraction errors
    #[error("Extraction tool not found: {tool}")]
    ExtractionToolNotFound { tool: String },

    #[error("Extraction tool failed: {message}")]
    ExtractionTool { message: String },

    // Manifest errors
    #[error("Manifest write failed: {message}")]
    ManifestWrite { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, CorpuscutError>;

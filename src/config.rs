//! Configuration loading.

use crate::defaults::{DEFAULT_ALIGN_ENDPOINT, DEFAULT_EXTRACTION_TOOL};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub corpus: CorpusConfig,
    pub alignment: AlignmentConfig,
    pub extraction: ExtractionConfig,
}

/// Corpus location configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CorpusConfig {
    /// Root of the scraped (level/topic) tree.
    pub data_dir: PathBuf,
    /// Where clips and the manifest are written.
    pub output_dir: PathBuf,
}

/// Forced-alignment service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlignmentConfig {
    pub endpoint: String,
    /// Bearer token; usually supplied via CORPUSCUT_ALIGN_TOKEN instead.
    pub token: Option<String>,
}

/// Audio cutting configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractionConfig {
    pub tool: String,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/downloaded_audio"),
            output_dir: PathBuf::from("data/corpus"),
        }
    }
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ALIGN_ENDPOINT.to_string(),
            token: None,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            tool: DEFAULT_EXTRACTION_TOOL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file, or return defaults if the file is
    /// missing. Invalid TOML is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - CORPUSCUT_DATA_DIR → corpus.data_dir
    /// - CORPUSCUT_OUTPUT_DIR → corpus.output_dir
    /// - CORPUSCUT_ALIGN_ENDPOINT → alignment.endpoint
    /// - CORPUSCUT_ALIGN_TOKEN → alignment.token
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var("CORPUSCUT_DATA_DIR") {
            if !dir.is_empty() {
                self.corpus.data_dir = PathBuf::from(dir);
            }
        }

        if let Ok(dir) = std::env::var("CORPUSCUT_OUTPUT_DIR") {
            if !dir.is_empty() {
                self.corpus.output_dir = PathBuf::from(dir);
            }
        }

        if let Ok(endpoint) = std::env::var("CORPUSCUT_ALIGN_ENDPOINT") {
            if !endpoint.is_empty() {
                self.alignment.endpoint = endpoint;
            }
        }

        if let Ok(token) = std::env::var(crate::defaults::ALIGN_TOKEN_ENV) {
            if !token.is_empty() {
                self.alignment.token = Some(token);
            }
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/corpuscut/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("corpuscut")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to serialize tests that modify environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_corpuscut_env() {
        std::env::remove_var("CORPUSCUT_DATA_DIR");
        std::env::remove_var("CORPUSCUT_OUTPUT_DIR");
        std::env::remove_var("CORPUSCUT_ALIGN_ENDPOINT");
        std::env::remove_var("CORPUSCUT_ALIGN_TOKEN");
    }

    #[test]
    fn test_default_config_has_correct_values() {
        let config = Config::default();

        assert_eq!(config.corpus.data_dir, PathBuf::from("data/downloaded_audio"));
        assert_eq!(config.corpus.output_dir, PathBuf::from("data/corpus"));
        assert_eq!(config.alignment.endpoint, "http://localhost:9037/align");
        assert_eq!(config.alignment.token, None);
        assert_eq!(config.extraction.tool, "ffmpeg");
    }

    #[test]
    fn test_load_from_toml_file() {
        let toml_content = r#"
            [corpus]
            data_dir = "/srv/scraped"
            output_dir = "/srv/corpus"

            [alignment]
            endpoint = "https://align.example.com/v1"
            token = "secret"

            [extraction]
            tool = "/usr/local/bin/ffmpeg"
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.corpus.data_dir, PathBuf::from("/srv/scraped"));
        assert_eq!(config.corpus.output_dir, PathBuf::from("/srv/corpus"));
        assert_eq!(config.alignment.endpoint, "https://align.example.com/v1");
        assert_eq!(config.alignment.token, Some("secret".to_string()));
        assert_eq!(config.extraction.tool, "/usr/local/bin/ffmpeg");
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let toml_content = r#"
            [corpus]
            data_dir = "/elsewhere"
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.corpus.data_dir, PathBuf::from("/elsewhere"));
        assert_eq!(config.corpus.output_dir, PathBuf::from("data/corpus"));
        assert_eq!(config.extraction.tool, "ffmpeg");
    }

    #[test]
    fn test_env_overrides() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_corpuscut_env();

        std::env::set_var("CORPUSCUT_DATA_DIR", "/env/data");
        std::env::set_var("CORPUSCUT_ALIGN_TOKEN", "env-token");
        let config = Config::default().with_env_overrides();

        assert_eq!(config.corpus.data_dir, PathBuf::from("/env/data"));
        assert_eq!(config.alignment.token, Some("env-token".to_string()));
        // not overridden
        assert_eq!(config.corpus.output_dir, PathBuf::from("data/corpus"));

        clear_corpuscut_env();
    }

    #[test]
    fn test_env_override_empty_string_ignored() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_corpuscut_env();

        std::env::set_var("CORPUSCUT_ALIGN_ENDPOINT", "");
        let config = Config::default().with_env_overrides();
        assert_eq!(config.alignment.endpoint, "http://localhost:9037/align");

        clear_corpuscut_env();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let invalid_toml = r#"
            [corpus
            data_dir = "broken
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(invalid_toml.as_bytes()).unwrap();

        assert!(Config::load(temp_file.path()).is_err());
    }

    #[test]
    fn test_load_or_default_returns_default_for_missing_file() {
        let missing_path = Path::new("/tmp/nonexistent_corpuscut_config_12345.toml");
        let config = Config::load_or_default(missing_path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_or_default_errors_on_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[corpus\nbroken").unwrap();
        assert!(Config::load_or_default(temp_file.path()).is_err());
    }

    #[test]
    fn test_default_path_is_xdg_compliant() {
        let path = Config::default_path();
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("corpuscut"));
        assert!(path_str.ends_with("config.toml"));
    }
}

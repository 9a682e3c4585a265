use std::path::{Path, PathBuf};

use poster_ocr::{NormalizerParams, PreprocessError};
use serde::Deserialize;
use thiserror::Error;

/// File name the extracted row is saved under unless configured otherwise.
pub const DEFAULT_OUTPUT: &str = "hackathon_data.csv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(#[from] PreprocessError),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Fallback filter when `RUST_LOG` is not set.
    pub log_level: String,
    pub output: PathBuf,
    pub normalizer: NormalizerParams,
    pub ocr: OcrSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            normalizer: NormalizerParams::default(),
            ocr: OcrSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OcrSettings {
    /// Tesseract language code(s), e.g. `eng` or `eng+hin`.
    pub language: String,
    /// Directory holding `*.traineddata`; the engine default when unset.
    pub data_path: Option<String>,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self { language: "eng".to_string(), data_path: None }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let config = Self::from_toml(&content)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    /// Explicit path first, then the per-user config file if it exists, then defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }
        match default_path() {
            Some(path) if path.is_file() => Self::load_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.normalizer.validate()?;
        Ok(())
    }
}

/// `<platform config dir>/config.toml`, e.g. `~/.config/poster-scraper/config.toml` on Linux.
pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "poster-scraper", "poster-scraper")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

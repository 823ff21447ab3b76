use std::default::Default;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application configuration module
/// This module handles the editor configuration including loading,
/// validating and saving configuration settings.
/// Represents the editor configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Transcript language used to pick the dictionary wordlist
    #[serde(default = "default_language")]
    pub transcript_language: String,

    /// Directory holding one pre-sorted wordlist per language code
    #[serde(default = "default_dictionary_dir")]
    pub dictionary_dir: PathBuf,

    /// Directory the corrected-words files are written to
    #[serde(default = "default_corrected_words_dir")]
    pub corrected_words_dir: PathBuf,

    /// Whether the session saves on a timer
    #[serde(default)]
    pub autosave: bool,

    /// Seconds between autosaves
    #[serde(default = "default_autosave_interval_secs")]
    pub autosave_interval_secs: u64,

    /// Language code sent to the transliteration service
    #[serde(default = "default_transliteration_language")]
    pub transliteration_language: String,

    /// Milliseconds to wait for a transliteration reply
    #[serde(default = "default_reply_timeout_ms")]
    pub reply_timeout_ms: u64,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log level for application logging
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    // @level: Error only
    Error,
    // @level: Warnings and errors
    Warn,
    // @level: Standard informational output
    #[default]
    Info,
    // @level: Debugging detail
    Debug,
    // @level: Full tracing
    Trace,
}

impl LogLevel {
    // @returns: log crate filter for this level
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_language() -> String {
    "english".to_string()
}

fn default_dictionary_dir() -> PathBuf {
    PathBuf::from("wordlists")
}

fn default_corrected_words_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_autosave_interval_secs() -> u64 {
    20
}

fn default_transliteration_language() -> String {
    "en".to_string()
}

fn default_reply_timeout_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Config {
            transcript_language: default_language(),
            dictionary_dir: default_dictionary_dir(),
            corrected_words_dir: default_corrected_words_dir(),
            autosave: false,
            autosave_interval_secs: default_autosave_interval_secs(),
            transliteration_language: default_transliteration_language(),
            reply_timeout_ms: default_reply_timeout_ms(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults when
    /// the file does not exist.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write the configuration back as pretty-printed JSON.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}

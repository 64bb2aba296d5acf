//! Configuration management for keytrail
//!
//! Settings are read from a platform-specific config file when present and
//! fall back to defaults otherwise. Command line flags override them.
//!
//! ## Config File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/keytrail/config.toml` |
//!
//! ## Example
//!
//! ```no_run
//! use keytrail::Config;
//!
//! let mut config = Config::load().unwrap_or_default();
//! config.transcript.mirror_to_console = false;
//! config.save().expect("Failed to save config");
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine config directory
    #[error("Could not determine config directory")]
    NoConfigDir,
    /// IO error reading or writing config file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Failed to parse config file
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize config
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Returns the path to the config file.
///
/// Creates the config directory if it doesn't exist.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    let app_dir = config_dir.join("keytrail");

    if !app_dir.exists() {
        fs::create_dir_all(&app_dir)?;
    }

    Ok(app_dir.join("config.toml"))
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Transcript output settings
    #[serde(default)]
    pub transcript: TranscriptConfig,
    /// Input device settings
    #[serde(default)]
    pub device: DeviceConfig,
    /// Startup confirmation settings
    #[serde(default)]
    pub consent: ConsentConfig,
}

/// Transcript output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptConfig {
    /// File the transcript is appended to
    pub path: PathBuf,
    /// Echo every line to standard output
    pub mirror_to_console: bool,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("keystrokes.log"),
            mirror_to_console: true,
        }
    }
}

/// Input device configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeviceConfig {
    /// Event device used when none is given on the command line
    pub path: Option<PathBuf>,
}

/// Startup confirmation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsentConfig {
    /// Phrase the operator must type before logging starts
    pub phrase: String,
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            phrase: "confirm".to_string(),
        }
    }
}

impl ConsentConfig {
    /// Whether an answer matches the phrase (trimmed, case-insensitive)
    pub fn accepts(&self, answer: &str) -> bool {
        let answer = answer.trim();
        !answer.is_empty() && answer.eq_ignore_ascii_case(self.phrase.trim())
    }
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default config file.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

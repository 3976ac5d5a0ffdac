//! Lizard configuration.
//!
//! Stored in `~/.lizard/config.toml`. Every field has a default, so a missing
//! file or a partial file is fine.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::crypto::{KdfParams, PasswordError};

/// Content type marking an encrypted body.
pub const DEFAULT_ENCRYPTED_CONTENT_TYPE: &str = "application/octet-stream+encrypted";

/// Default maximum carrier file size (50 MiB).
pub const DEFAULT_MAX_CARRIER_BYTES: u64 = 50 * 1024 * 1024;

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found. Unable to determine home directory.")]
    NoConfigDir,

    #[error("Invalid KDF parameters: {0}")]
    InvalidKdf(#[from] PasswordError),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
}

/// Envelope metadata defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeConfig {
    /// Content type written for encrypted bodies.
    pub encrypted_content_type: String,
    /// Filename used for inline text payloads.
    pub text_filename: String,
    /// Content type used for inline text payloads.
    pub text_content_type: String,
    /// Content type used for file payloads when none is given.
    pub file_content_type: String,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            encrypted_content_type: DEFAULT_ENCRYPTED_CONTENT_TYPE.to_string(),
            text_filename: "message.txt".to_string(),
            text_content_type: "text/plain".to_string(),
            file_content_type: "application/octet-stream".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest carrier file accepted, in bytes.
    pub max_carrier_bytes: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_carrier_bytes: DEFAULT_MAX_CARRIER_BYTES,
        }
    }
}

/// Default output file names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub image_name: String,
    pub audio_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            image_name: "lizard_stego.png".to_string(),
            audio_name: "lizard_stego.wav".to_string(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LizardConfig {
    pub kdf: KdfParams,
    pub envelope: EnvelopeConfig,
    pub limits: LimitsConfig,
    pub output: OutputConfig,
}

impl LizardConfig {
    /// Load the configuration from the default location.
    ///
    /// Returns defaults if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load and validate the configuration at `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: LizardConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Get the path to the default configuration file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(get_config_dir()?.join("config.toml"))
    }

    /// Checks values the rest of the crate relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.kdf.validate()?;
        if self.envelope.encrypted_content_type.is_empty() {
            return Err(ConfigError::Invalid(
                "envelope.encrypted_content_type must not be empty".to_string(),
            ));
        }
        if self.limits.max_carrier_bytes == 0 {
            return Err(ConfigError::Invalid(
                "limits.max_carrier_bytes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Get the Lizard config directory (`~/.lizard`).
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".lizard"))
        .ok_or(ConfigError::NoConfigDir)
}

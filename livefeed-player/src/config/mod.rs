//! Configuration module for livefeed-player.
//!
//! Handles loading configuration from the TOML file and CLI overrides.

pub mod file;

pub use file::{FileConfig, RendererConfig};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    input_override: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, input_override: Option<PathBuf>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            input_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file, falling back to defaults if it does not exist
    /// 2. Apply CLI overrides
    /// 3. Validate the configuration
    pub fn load(&self) -> Result<FileConfig, ConfigError> {
        let mut file_config = match std::fs::read_to_string(&self.config_path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => return Err(e.into()),
        };

        if let Some(input) = &self.input_override {
            file_config.input.path = Some(input.clone());
        }

        self.validate(&file_config)?;
        Ok(file_config)
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<FileConfig, ConfigError> {
        self.load()
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    fn validate(&self, config: &FileConfig) -> Result<(), ConfigError> {
        if config.renderer.animation_ms == 0 {
            return Err(ConfigError::ValidationError(
                "renderer.animation_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

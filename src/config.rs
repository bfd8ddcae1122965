//! Project configuration (toggle.toml).
//!
//! Names the two input tables and the output directories. Every key is
//! optional: built-in defaults sit below the file, and CLI flags override
//! both.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

/// Config file looked up when no `-c` flag is given.
pub const DEFAULT_CONFIG_PATH: &str = "toggle.toml";

/// Error types for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// `[tables]` section: where the two input tables live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TablesSection {
    pub defaults: String,
    pub characterizations: String,
}

impl Default for TablesSection {
    fn default() -> Self {
        Self {
            defaults: "csv/defaults.csv".to_string(),
            characterizations: "csv/char_ids.csv".to_string(),
        }
    }
}

/// `[output]` section: where generated artifacts go.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub include_dir: String,
    pub source_dir: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            include_dir: "include".to_string(),
            source_dir: "src".to_string(),
        }
    }
}

/// Generator configuration from toggle.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub tables: TablesSection,
    pub output: OutputSection,
}

impl GeneratorConfig {
    /// Load and parse config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    /// Parse config from a TOML string.
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let paths = [
            ("tables.defaults", &self.tables.defaults),
            ("tables.characterizations", &self.tables.characterizations),
            ("output.include_dir", &self.output.include_dir),
            ("output.source_dir", &self.output.source_dir),
        ];
        for (key, value) in paths {
            if value.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "'{key}' must not be empty"
                )));
            }
        }
        Ok(())
    }

    /// Load an explicitly named file, or the default path when present,
    /// or fall back to the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

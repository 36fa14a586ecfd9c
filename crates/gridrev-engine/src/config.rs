//! Configuration loading and typed config structures for the engine.
//!
//! The canonical configuration lives in `gridrev-config.yaml`. This module
//! defines strongly-typed structs mirroring the YAML structure and a loader
//! that reads the file, with an environment-variable override for the
//! control channel (`GRIDREV_CHANNEL`).

use std::path::Path;

use serde::Deserialize;
use uuid::Uuid;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The `GRIDREV_CHANNEL` override is not a valid channel number.
    #[error("invalid GRIDREV_CHANNEL value: {value}")]
    BadChannel {
        /// The rejected value.
        value: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GridConfig {
    /// Control-channel and privilege settings.
    #[serde(default)]
    pub control: ControlConfig,

    /// The regions to bring under management at startup.
    #[serde(default)]
    pub regions: Vec<RegionEntry>,
}

/// Control-channel and privilege settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ControlConfig {
    /// The chat channel the controller listens on for commands.
    #[serde(default = "default_channel")]
    pub channel: i32,

    /// Avatar IDs holding estate-manager privilege.
    #[serde(default)]
    pub managers: Vec<Uuid>,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            channel: default_channel(),
            managers: Vec::new(),
        }
    }
}

/// One region definition: a name and its cell on the simulation grid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegionEntry {
    /// Human-readable region name.
    pub name: String,
    /// Column on the simulation grid.
    pub grid_x: i32,
    /// Row on the simulation grid.
    pub grid_y: i32,
}

const fn default_channel() -> i32 {
    18
}

impl GridConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `GRIDREV_CHANNEL` in the environment overrides `control.channel`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if it cannot be parsed, or
    /// [`ConfigError::BadChannel`] if the override is not an integer.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&raw)?;

        if let Ok(value) = std::env::var("GRIDREV_CHANNEL") {
            config.control.channel = value
                .parse()
                .map_err(|_| ConfigError::BadChannel { value })?;
        }
        Ok(config)
    }
}

//! # Protocol Configuration
//!
//! Node-level settings the protocol needs to build and check Status
//! messages and to bound message sizes.
//!
//! ## Config File Format
//!
//! ```toml
//! [protocol]
//! network_id = 9000
//! location = [0, 1]
//! versions = [66, 65]
//! max_message_size = 4194304
//! ```
//!
//! Every key is optional; missing keys take the [`WireConfig::default`]
//! value.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use shared_types::Location;
use thiserror::Error;

use crate::domain::{ProtocolVersion, MAX_MESSAGE_SIZE};

/// Errors that can occur while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {error}")]
    Io { path: String, error: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Wire protocol settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireConfig {
    /// Network identifier advertised in Status (mainnet=1).
    pub network_id: u64,
    /// Chain segment this node serves.
    pub location: Location,
    /// Versions offered during negotiation, newest first.
    pub supported_versions: Vec<ProtocolVersion>,
    /// Inbound and outbound message cap. May be lowered below the
    /// protocol limit, never raised above it.
    pub max_message_size: usize,
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            network_id: 1,
            location: Location::default(),
            supported_versions: ProtocolVersion::SUPPORTED.to_vec(),
            max_message_size: MAX_MESSAGE_SIZE,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    protocol: ProtocolSection,
}

#[derive(Debug, Default, Deserialize)]
struct ProtocolSection {
    network_id: Option<u64>,
    location: Option<Vec<u8>>,
    versions: Option<Vec<u32>>,
    max_message_size: Option<usize>,
}

impl WireConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed or validated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let section = file.protocol;
        let defaults = Self::default();

        let supported_versions = match section.versions {
            Some(numbers) => numbers
                .into_iter()
                .map(|n| {
                    ProtocolVersion::try_from(n)
                        .map_err(|_| ConfigError::Invalid(format!("unsupported version {n}")))
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => defaults.supported_versions,
        };

        let config = Self {
            network_id: section.network_id.unwrap_or(defaults.network_id),
            location: section.location.map(Location).unwrap_or(defaults.location),
            supported_versions,
            max_message_size: section.max_message_size.unwrap_or(defaults.max_message_size),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the settings are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if no version is offered, a version
    /// is listed twice, or the size cap is zero or above the protocol limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.supported_versions.is_empty() {
            return Err(ConfigError::Invalid("no protocol versions".into()));
        }
        for (i, version) in self.supported_versions.iter().enumerate() {
            if self.supported_versions[..i].contains(version) {
                return Err(ConfigError::Invalid(format!("duplicate version {version}")));
            }
        }
        if self.max_message_size == 0 || self.max_message_size > MAX_MESSAGE_SIZE {
            return Err(ConfigError::Invalid(format!(
                "max_message_size {} outside 1..={MAX_MESSAGE_SIZE}",
                self.max_message_size
            )));
        }
        Ok(())
    }
}

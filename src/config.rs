//! YAML Configuration File Support for AUFP
//!
//! This module lets deployments define the fingerprint and matcher stage
//! settings in a single YAML file and load them at runtime.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! # AUFP Pipeline Configuration
//! version: "1.0"
//!
//! fingerprint:
//!   algorithm: 1
//!   silence_threshold: 100
//!
//! matcher:
//!   min_overlap: 80
//!   max_offset_error: 14.4
//!   segment_threshold: 8.0
//!   smoothing_window: 8
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use fingerprint::Algorithm;
use matcher::MatcherConfig;

/// Errors that can occur when loading YAML configuration files.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration for the AUFP pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AufpConfig {
    /// Configuration format version.
    pub version: String,

    /// Optional configuration name/description.
    #[serde(default)]
    pub name: Option<String>,

    /// Fingerprint stage configuration.
    #[serde(default)]
    pub fingerprint: FingerprintYamlConfig,

    /// Matcher stage configuration.
    #[serde(default)]
    pub matcher: MatcherConfig,
}

impl AufpConfig {
    /// Load a YAML configuration file from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: AufpConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.fingerprint.validate()?;
        self.matcher
            .validate()
            .map_err(|e| ConfigLoadError::Validation(e.to_string()))?;

        Ok(())
    }

    /// Resolve the configured algorithm id.
    pub fn algorithm(&self) -> Algorithm {
        Algorithm::from_id(self.fingerprint.algorithm)
            .expect("validated algorithm id is always known")
    }
}

impl Default for AufpConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            fingerprint: FingerprintYamlConfig::default(),
            matcher: MatcherConfig::default(),
        }
    }
}

/// Fingerprint stage YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FingerprintYamlConfig {
    /// Algorithm id (0..=4).
    #[serde(default = "default_algorithm_id")]
    pub algorithm: u8,

    /// Silence removal threshold (0..=32767); absent disables removal.
    #[serde(default)]
    pub silence_threshold: Option<u16>,
}

impl FingerprintYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if Algorithm::from_id(self.algorithm).is_err() {
            return Err(ConfigLoadError::Validation(format!(
                "fingerprint.algorithm must be 0..=4 (got {})",
                self.algorithm
            )));
        }
        if let Some(threshold) = self.silence_threshold {
            if threshold > 32767 {
                return Err(ConfigLoadError::Validation(format!(
                    "fingerprint.silence_threshold must be 0..=32767 (got {threshold})"
                )));
            }
        }
        Ok(())
    }
}

impl Default for FingerprintYamlConfig {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm_id(),
            silence_threshold: None,
        }
    }
}

fn default_algorithm_id() -> u8 {
    Algorithm::default().id()
}

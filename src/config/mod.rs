//! Configuration management module
//!
//! Handles loading and validation of probe settings. The config file is
//! optional; a missing file yields the defaults.

use crate::{ProbeError, Result, APP_NAME, CONFIG_ENV, CONFIG_FILE, DEFAULT_SAMPLE_COUNT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod persistence;

pub use persistence::ReportStorage;

const MIN_BLOCK_SIZE: u64 = 512;
const MAX_BLOCK_SIZE: u64 = 1024 * 1024; // 1 MiB

/// Probe configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Size of each random read (in bytes)
    pub block_size: u64,
    /// Sample count used when the prompt is left blank
    pub default_sample_count: u64,
    /// Open devices with O_DIRECT to bypass the page cache
    pub direct_io: bool,
    /// Root of the sysfs mount used for device enumeration
    pub sysfs_root: PathBuf,
    /// Directory for JSON probe reports; reports are not written when unset
    pub report_dir: Option<PathBuf>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            block_size: 4 * 1024, // 4 KiB
            default_sample_count: DEFAULT_SAMPLE_COUNT,
            direct_io: true,
            sysfs_root: PathBuf::from("/sys"),
            report_dir: None,
        }
    }
}

impl ProbeConfig {
    /// Create a new probe configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(ProbeError::ConfigError(
                "Block size must be greater than 0".to_string(),
            ));
        }

        if !self.block_size.is_power_of_two() {
            return Err(ProbeError::ConfigError(
                "Block size must be a power of 2".to_string(),
            ));
        }

        if self.block_size < MIN_BLOCK_SIZE || self.block_size > MAX_BLOCK_SIZE {
            return Err(ProbeError::ConfigError(format!(
                "Block size must be between {} and {} bytes",
                MIN_BLOCK_SIZE, MAX_BLOCK_SIZE
            )));
        }

        if self.default_sample_count == 0 {
            return Err(ProbeError::ConfigError(
                "Default sample count must be greater than 0".to_string(),
            ));
        }

        if let Some(dir) = &self.report_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(ProbeError::ConfigError(format!(
                    "Report path is not a directory: {}",
                    dir.display()
                )));
            }
        }

        Ok(())
    }

    /// Set the block size for reads
    pub fn with_block_size(mut self, size: u64) -> Self {
        self.block_size = size;
        self
    }

    /// Set the default sample count
    pub fn with_default_sample_count(mut self, count: u64) -> Self {
        self.default_sample_count = count;
        self
    }

    /// Enable or disable O_DIRECT
    pub fn with_direct_io(mut self, direct: bool) -> Self {
        self.direct_io = direct;
        self
    }

    /// Set the sysfs root
    pub fn with_sysfs_root(mut self, root: PathBuf) -> Self {
        self.sysfs_root = root;
        self
    }

    /// Set the report directory
    pub fn with_report_dir(mut self, dir: PathBuf) -> Self {
        self.report_dir = Some(dir);
        self
    }

    /// Load configuration from the standard config file location
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;
        Self::load_from(&config_path)
    }

    /// Like [`ProbeConfig::load`], but a missing, unreadable or invalid
    /// config file yields the defaults together with the error that caused
    /// the fallback.
    pub fn load_or_default() -> (Self, Option<ProbeError>) {
        Self::fallback(Self::load())
    }

    /// Like [`ProbeConfig::load_from`], falling back to defaults on error
    pub fn load_or_default_from(config_path: &Path) -> (Self, Option<ProbeError>) {
        Self::fallback(Self::load_from(config_path))
    }

    fn fallback(loaded: Result<Self>) -> (Self, Option<ProbeError>) {
        match loaded {
            Ok(config) => (config, None),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring config file, using defaults");
                (Self::default(), Some(e))
            }
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| {
            ProbeError::ConfigError(format!(
                "Failed to read config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            ProbeError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        config.validate()?;
        tracing::debug!(path = %config_path.display(), ?config, "loaded config");

        Ok(config)
    }

    /// Get the configuration file path
    /// `$DRIVE_PROBE_CONFIG` wins, otherwise `$CONFIG_HOME/drive-probe/drive-probe.toml`
    pub fn config_file_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_dir = dirs::config_dir().ok_or_else(|| {
            ProbeError::ConfigError("Unable to determine config directory".to_string())
        })?;

        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Report storage for this configuration, if reports are enabled
    pub fn report_storage(&self) -> Option<ReportStorage> {
        self.report_dir.clone().map(ReportStorage::new)
    }
}

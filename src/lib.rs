//! drive-probe - physical drive lister and random-read probe
//!
//! Enumerates the physical block devices on the machine and runs a quick
//! random-read check against one of them, reporting per-read latency and
//! an aggregate success rate, latency and throughput.

use std::fmt;

pub mod config;
pub mod devices;
pub mod io;
pub mod menu;
pub mod models;
pub mod probe;
pub mod util;

// Common error types
#[derive(Debug)]
pub enum ProbeError {
    /// I/O operation failed
    IoError(std::io::Error),
    /// Physical devices could not be listed
    EnumerationError(String),
    /// User input was not a valid number or was out of range
    InvalidInputError(String),
    /// A single block read failed
    ReadError {
        /// Block index that was being read
        block: u64,
        /// Underlying I/O failure
        source: std::io::Error,
    },
    /// Permission denied for device access
    PermissionDenied(String),
    /// Configuration validation or parsing error
    ConfigError(String),
    /// Probe report could not be written
    ReportError(String),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::IoError(err) => write!(f, "I/O error: {}", err),
            ProbeError::EnumerationError(msg) => write!(f, "Device enumeration failed: {}", msg),
            ProbeError::InvalidInputError(msg) => write!(f, "Invalid input: {}", msg),
            ProbeError::ReadError { block, source } => {
                write!(f, "Read of block {} failed: {}", block, source)
            }
            ProbeError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            ProbeError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            ProbeError::ReportError(msg) => write!(f, "Report error: {}", msg),
        }
    }
}

impl std::error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProbeError::IoError(err) => Some(err),
            ProbeError::ReadError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ProbeError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                ProbeError::PermissionDenied(format!("Access denied: {}", err))
            }
            _ => ProbeError::IoError(err),
        }
    }
}

impl From<serde_json::Error> for ProbeError {
    fn from(err: serde_json::Error) -> Self {
        ProbeError::ReportError(format!("JSON serialization error: {}", err))
    }
}

impl From<toml::de::Error> for ProbeError {
    fn from(err: toml::de::Error) -> Self {
        ProbeError::ConfigError(format!("TOML parsing error: {}", err))
    }
}

/// Result type alias for drive-probe operations
pub type Result<T> = std::result::Result<T, ProbeError>;

/// Error handling utilities
pub mod error {
    use super::ProbeError;

    /// Convert error to user-friendly message with suggestions
    pub fn user_friendly_message(error: &ProbeError) -> String {
        match error {
            ProbeError::PermissionDenied(_) => {
                "Permission denied. Raw device access requires root; try running with sudo."
                    .to_string()
            }
            ProbeError::EnumerationError(msg) => {
                format!("Could not list physical drives: {}", msg)
            }
            ProbeError::ReadError { source, .. }
                if source.kind() == std::io::ErrorKind::PermissionDenied =>
            {
                "Permission denied while reading. Raw device access requires root.".to_string()
            }
            ProbeError::ConfigError(msg) => {
                format!("Configuration error: {}. Check your settings.", msg)
            }
            ProbeError::ReportError(_) => {
                "Failed to save probe report. Check the report directory and permissions."
                    .to_string()
            }
            _ => error.to_string(),
        }
    }
}

// Common types and constants
pub const APP_NAME: &str = "drive-probe";
pub const CONFIG_FILE: &str = "drive-probe.toml";
pub const CONFIG_ENV: &str = "DRIVE_PROBE_CONFIG";
pub const LOG_ENV: &str = "DRIVE_PROBE_LOG";
pub const REPORT_FILE_PREFIX: &str = "probe-";
/// Default number of random reads per probe
pub const DEFAULT_SAMPLE_COUNT: u64 = 25;
/// sysfs reports device sizes in 512-byte sectors regardless of the hardware sector size
pub const SYSFS_SECTOR_SIZE: u64 = 512;

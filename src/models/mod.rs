//! Data models module
//!
//! Contains the device description, per-read samples, the aggregated
//! probe summary and the serializable probe report.

pub mod device;
pub mod result;

// Re-export commonly used types
pub use device::{Device, InterfaceType};
pub use result::{location_percent, ProbeReport, ReadSample, Summary};

//! Utility functions module
//!
//! Contains helper functions for units formatting and throughput maths.

pub mod units;

// Re-export commonly used functions
pub use units::{format_bytes, format_duration, format_millis, read_rate_mbps};

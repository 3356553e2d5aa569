//! Probe engine module
//!
//! Contains the random-read health probe.

pub mod random;

pub use random::{validate_sample_count, RandomReadProbe};

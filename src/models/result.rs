//! Probe result data models
//!
//! Contains per-read samples, the summary folded from them and the
//! report written after a finished probe.

use crate::util::units::read_rate_mbps;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of a single random read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadSample {
    /// 1-based attempt number within the run
    pub attempt: u64,
    /// Block index that was read
    pub block_index: u64,
    /// Position of the block on the device, 0 to 100
    pub location_percent: f64,
    /// Bytes returned by the read, 0 on failure
    pub bytes_read: u64,
    /// Wall-clock time spent on the seek and read
    #[serde(with = "duration_serde")]
    pub elapsed: Duration,
    /// Whether the read completed without error
    pub success: bool,
    /// Error message for failed reads
    pub error: Option<String>,
}

impl ReadSample {
    /// Latency in milliseconds
    pub fn latency_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    /// Throughput of this read in MB/s, `None` for failed or untimed reads
    pub fn throughput_mbps(&self) -> Option<f64> {
        if !self.success {
            return None;
        }
        read_rate_mbps(self.bytes_read, self.elapsed)
    }
}

/// Position of `block_index` as a percentage of `block_count`, clamped to [0, 100]
pub fn location_percent(block_index: u64, block_count: u64) -> f64 {
    if block_count == 0 {
        return 0.0;
    }
    (block_index as f64 / block_count as f64 * 100.0).clamp(0.0, 100.0)
}

/// Aggregate statistics over all samples of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of read attempts
    pub sample_count: u64,
    /// Reads that completed
    pub successes: u64,
    /// Reads that failed
    pub failures: u64,
    /// successes / sample_count, 0.0 for an empty run
    pub success_rate: f64,
    /// Total bytes returned by successful reads
    pub bytes_read: u64,
    /// Mean latency over every attempt
    #[serde(with = "option_duration_serde")]
    pub mean_latency: Option<Duration>,
    /// Mean of the per-read throughput over successful reads with a measured duration
    pub mean_throughput_mbps: Option<f64>,
}

impl Summary {
    /// Fold a list of samples into a summary
    pub fn from_samples(samples: &[ReadSample]) -> Self {
        let sample_count = samples.len() as u64;
        let successes = samples.iter().filter(|s| s.success).count() as u64;
        let bytes_read = samples.iter().map(|s| s.bytes_read).sum();

        let success_rate = if sample_count > 0 {
            successes as f64 / sample_count as f64
        } else {
            0.0
        };

        let mean_latency = if sample_count > 0 {
            let total: u128 = samples.iter().map(|s| s.elapsed.as_nanos()).sum();
            Some(Duration::from_nanos((total / sample_count as u128) as u64))
        } else {
            None
        };

        let rates: Vec<f64> = samples.iter().filter_map(ReadSample::throughput_mbps).collect();
        let mean_throughput_mbps = if rates.is_empty() {
            None
        } else {
            Some(rates.iter().sum::<f64>() / rates.len() as f64)
        };

        Self {
            sample_count,
            successes,
            failures: sample_count - successes,
            success_rate,
            bytes_read,
            mean_latency,
            mean_throughput_mbps,
        }
    }

    /// Success rate as a percentage
    pub fn success_percent(&self) -> f64 {
        self.success_rate * 100.0
    }

    /// Mean latency in milliseconds, if any read was attempted
    pub fn mean_latency_ms(&self) -> Option<f64> {
        self.mean_latency.map(|d| d.as_secs_f64() * 1000.0)
    }
}

/// Complete record of a finished probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeReport {
    /// When the probe finished
    pub timestamp: DateTime<Utc>,
    /// Device node that was probed
    pub device: PathBuf,
    /// Read size in bytes
    pub block_size: u64,
    /// Addressable blocks on the device
    pub block_count: u64,
    /// Every read attempt in order
    pub samples: Vec<ReadSample>,
    /// Aggregated statistics
    pub summary: Summary,
}

impl ProbeReport {
    pub fn new(device: PathBuf, block_size: u64, block_count: u64, samples: Vec<ReadSample>) -> Self {
        let summary = Summary::from_samples(&samples);
        Self {
            timestamp: Utc::now(),
            device,
            block_size,
            block_count,
            samples,
            summary,
        }
    }
}

// Custom serde modules for Duration serialization
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_nanos() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nanos = u64::deserialize(deserializer)?;
        Ok(Duration::from_nanos(nanos))
    }
}

mod option_duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.map(|d| d.as_nanos() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nanos = Option::<u64>::deserialize(deserializer)?;
        Ok(nanos.map(Duration::from_nanos))
    }
}

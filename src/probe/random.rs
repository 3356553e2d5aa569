//! Random-read probe
//!
//! Reads single blocks at uniformly random positions on a device, timing
//! each read. A failed read is recorded as an unsuccessful sample and the
//! run carries on; nothing is retried.

use crate::{
    io::buffer::AlignedBuffer,
    io::disk::RawDevice,
    models::{location_percent, ProbeReport, ReadSample},
    ProbeError, Result,
};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::io::SeekFrom;
use std::path::Path;
use std::time::Instant;

const MAX_RESERVED_SAMPLES: u64 = 4096;

/// Random-read probe executor
pub struct RandomReadProbe {
    block_size: u64,
    rng: SmallRng,
}

impl RandomReadProbe {
    /// Create a probe that reads `block_size` bytes per sample
    pub fn new(block_size: u64) -> Result<Self> {
        Self::with_rng(block_size, SmallRng::from_entropy())
    }

    /// Create a probe with a fixed seed, for reproducible block selection
    pub fn with_seed(block_size: u64, seed: u64) -> Result<Self> {
        Self::with_rng(block_size, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(block_size: u64, rng: SmallRng) -> Result<Self> {
        if block_size == 0 {
            return Err(ProbeError::ConfigError(
                "Block size must be greater than 0".to_string(),
            ));
        }
        Ok(Self { block_size, rng })
    }

    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    /// Perform exactly `sample_count` random reads on an open device.
    ///
    /// `on_sample` is called after every read, in order.
    pub fn run<F>(
        &mut self,
        device: &mut dyn RawDevice,
        block_count: u64,
        sample_count: u64,
        mut on_sample: F,
    ) -> Result<Vec<ReadSample>>
    where
        F: FnMut(&ReadSample),
    {
        validate_sample_count(sample_count, block_count)?;

        let mut buffer = AlignedBuffer::for_block(self.block_size)?;
        // Counts up to the block count are valid, so only reserve a bounded prefix
        let reserve = usize::try_from(sample_count.min(MAX_RESERVED_SAMPLES)).unwrap_or(0);
        let mut samples = Vec::with_capacity(reserve);

        tracing::info!(
            block_count,
            sample_count,
            block_size = self.block_size,
            direct = device.is_direct(),
            "starting random-read probe"
        );

        for attempt in 1..=sample_count {
            let block_index = self.rng.gen_range(0..block_count);
            // block_index < size / block_size, so the product stays within the device
            let offset = block_index * self.block_size;

            let start = Instant::now();
            let outcome = device
                .seek_direct(SeekFrom::Start(offset))
                .and_then(|_| device.read_direct(buffer.as_mut_slice()));
            let elapsed = start.elapsed();

            let sample = match outcome {
                Ok(bytes) => ReadSample {
                    attempt,
                    block_index,
                    location_percent: location_percent(block_index, block_count),
                    bytes_read: bytes as u64,
                    elapsed,
                    success: true,
                    error: None,
                },
                Err(source) => {
                    let message = source.to_string();
                    let err = ProbeError::ReadError {
                        block: block_index,
                        source,
                    };
                    tracing::debug!(attempt, "{}", err);
                    ReadSample {
                        attempt,
                        block_index,
                        location_percent: location_percent(block_index, block_count),
                        bytes_read: 0,
                        elapsed,
                        success: false,
                        error: Some(message),
                    }
                }
            };

            on_sample(&sample);
            samples.push(sample);
        }

        tracing::info!(
            successes = samples.iter().filter(|s| s.success).count(),
            sample_count,
            "random-read probe finished"
        );

        Ok(samples)
    }

    /// Probe an already open device and fold the samples into a report.
    ///
    /// The handle stays borrowed for the whole run; the caller releases it.
    pub fn probe_device<F>(
        &mut self,
        device: &mut dyn RawDevice,
        path: &Path,
        block_count: u64,
        sample_count: u64,
        on_sample: F,
    ) -> Result<ProbeReport>
    where
        F: FnMut(&ReadSample),
    {
        let samples = self.run(device, block_count, sample_count, on_sample)?;
        Ok(ProbeReport::new(
            path.to_path_buf(),
            self.block_size,
            block_count,
            samples,
        ))
    }
}

/// Check a requested sample count against the device's block count
pub fn validate_sample_count(sample_count: u64, block_count: u64) -> Result<()> {
    if block_count == 0 {
        return Err(ProbeError::InvalidInputError(
            "device is smaller than one block".to_string(),
        ));
    }
    if sample_count == 0 || sample_count > block_count {
        return Err(ProbeError::InvalidInputError(format!(
            "sample count must be between 1 and {}, got {}",
            block_count, sample_count
        )));
    }
    Ok(())
}

use crate::{ProbeError, Result};

/// Alignment that satisfies O_DIRECT for both 512-byte and 4K-native drives
pub const DIRECT_IO_ALIGNMENT: usize = 4096;

/// Heap buffer whose usable slice starts on an `align`-byte boundary.
///
/// Unbuffered reads require the destination address to be aligned to the
/// device's logical sector size; a plain `Vec<u8>` gives no such guarantee,
/// so the buffer over-allocates and hands out an aligned window.
pub struct AlignedBuffer {
    storage: Vec<u8>,
    offset: usize,
    len: usize,
}

impl AlignedBuffer {
    /// Create a zeroed buffer of `len` bytes aligned to `align`
    pub fn new(len: usize, align: usize) -> Result<Self> {
        if len == 0 {
            return Err(ProbeError::ConfigError(
                "Buffer size must be greater than 0".to_string(),
            ));
        }
        if !align.is_power_of_two() {
            return Err(ProbeError::ConfigError(format!(
                "Buffer alignment must be a power of 2, got {}",
                align
            )));
        }

        let storage = vec![0u8; len + align];
        let offset = storage.as_ptr().align_offset(align);
        if offset > align {
            return Err(ProbeError::ConfigError(format!(
                "Unable to align buffer to {} bytes",
                align
            )));
        }

        Ok(Self {
            storage,
            offset,
            len,
        })
    }

    /// Create a buffer for one block, aligned for direct I/O
    pub fn for_block(block_size: u64) -> Result<Self> {
        let len = usize::try_from(block_size).map_err(|_| {
            ProbeError::ConfigError(format!("Block size too large: {}", block_size))
        })?;
        Self::new(len, DIRECT_IO_ALIGNMENT)
    }

    /// Get mutable access to the aligned window
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.storage[self.offset..self.offset + self.len]
    }

    /// Get immutable access to the aligned window
    pub fn as_slice(&self) -> &[u8] {
        &self.storage[self.offset..self.offset + self.len]
    }

    /// Get the buffer size
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_is_aligned() {
        for align in [512usize, 4096, 65536] {
            let mut buf = AlignedBuffer::new(4096, align).unwrap();
            assert_eq!(buf.len(), 4096);
            assert_eq!(buf.as_slice().as_ptr() as usize % align, 0);
            assert_eq!(buf.as_mut_slice().as_ptr() as usize % align, 0);
        }
    }

    #[test]
    fn test_buffer_starts_zeroed_and_is_writable() {
        let mut buf = AlignedBuffer::for_block(512).unwrap();
        assert!(buf.as_slice().iter().all(|&b| b == 0));
        buf.as_mut_slice()[511] = 7;
        assert_eq!(buf.as_slice()[511], 7);
        assert!(!buf.is_empty());
    }

    #[test]
    fn test_buffer_rejects_bad_parameters() {
        assert!(AlignedBuffer::new(0, 4096).is_err());
        assert!(AlignedBuffer::new(4096, 3000).is_err());
    }
}

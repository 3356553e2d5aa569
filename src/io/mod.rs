//! I/O operations module
//!
//! Contains raw device access and the aligned buffer used for
//! unbuffered reads.

pub mod buffer;
pub mod disk;

pub use buffer::{AlignedBuffer, DIRECT_IO_ALIGNMENT};
pub use disk::{create_disk_io, DiskIO, PlatformDevice, PlatformDiskIO, RawDevice};

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// Opens devices for raw reads
pub trait DiskIO {
    /// Open a device or file read-only for raw block reads
    fn open_raw_read(&self, path: &Path) -> io::Result<Box<dyn RawDevice>>;
}

/// Read-only handle to a block device
pub trait RawDevice {
    /// Seek to position
    fn seek_direct(&mut self, pos: SeekFrom) -> io::Result<u64>;

    /// Read data directly from the device
    fn read_direct(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Size of the device in bytes
    fn device_size(&mut self) -> io::Result<u64>;

    /// Whether reads bypass the OS page cache
    fn is_direct(&self) -> bool;
}

/// Raw device handle backed by a `File`
pub struct PlatformDevice {
    file: File,
    direct: bool,
}

impl PlatformDevice {
    pub fn new(file: File, direct: bool) -> Self {
        Self { file, direct }
    }
}

impl RawDevice for PlatformDevice {
    fn seek_direct(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }

    fn read_direct(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }

    fn device_size(&mut self) -> io::Result<u64> {
        // Block devices report a zero metadata length; the end offset is the size.
        let len = self.file.metadata()?.len();
        if len > 0 {
            return Ok(len);
        }
        let current = self.file.stream_position()?;
        let end = self.file.seek(SeekFrom::End(0))?;
        self.file.seek(SeekFrom::Start(current))?;
        Ok(end)
    }

    fn is_direct(&self) -> bool {
        self.direct
    }
}

/// Platform-specific disk I/O implementation
#[derive(Debug, Clone)]
pub struct PlatformDiskIO {
    direct_io: bool,
}

impl PlatformDiskIO {
    pub fn new(direct_io: bool) -> Self {
        Self { direct_io }
    }
}

impl Default for PlatformDiskIO {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(target_os = "linux")]
impl DiskIO for PlatformDiskIO {
    fn open_raw_read(&self, path: &Path) -> io::Result<Box<dyn RawDevice>> {
        use std::os::unix::fs::OpenOptionsExt;

        if self.direct_io {
            // Try O_DIRECT first, fall back to a buffered open
            match OpenOptions::new()
                .read(true)
                .custom_flags(libc::O_DIRECT)
                .open(path)
            {
                Ok(file) => return Ok(Box::new(PlatformDevice::new(file, true))),
                Err(err) if err.kind() == io::ErrorKind::PermissionDenied => return Err(err),
                Err(err) => {
                    tracing::debug!(
                        path = %path.display(),
                        error = %err,
                        "O_DIRECT open refused, falling back to buffered reads"
                    );
                }
            }
        }

        let file = OpenOptions::new().read(true).open(path)?;
        Ok(Box::new(PlatformDevice::new(file, false)))
    }
}

#[cfg(not(target_os = "linux"))]
impl DiskIO for PlatformDiskIO {
    fn open_raw_read(&self, path: &Path) -> io::Result<Box<dyn RawDevice>> {
        let file = OpenOptions::new().read(true).open(path)?;
        Ok(Box::new(PlatformDevice::new(file, false)))
    }
}

/// Create a new platform-specific disk I/O instance
pub fn create_disk_io(direct_io: bool) -> impl DiskIO {
    PlatformDiskIO::new(direct_io)
}

//! Physical device enumeration
//!
//! Lists whole-disk block devices from sysfs. Partitions never appear at the
//! top of `/sys/block`, and virtual devices (loop, ram, device-mapper, md)
//! have no backing `device` link, so both are left out.

use crate::config::ProbeConfig;
use crate::models::{Device, InterfaceType};
use crate::{ProbeError, Result, SYSFS_SECTOR_SIZE};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Kernel name prefixes that never refer to a physical disk
const VIRTUAL_PREFIXES: &[&str] = &["loop", "ram", "zram", "dm-", "md", "nbd", "sr"];

/// Enumerates physical block devices below a sysfs root
#[derive(Debug, Clone)]
pub struct DeviceEnumerator {
    sysfs_root: PathBuf,
    dev_root: PathBuf,
}

impl DeviceEnumerator {
    pub fn new(sysfs_root: impl Into<PathBuf>) -> Self {
        Self {
            sysfs_root: sysfs_root.into(),
            dev_root: PathBuf::from("/dev"),
        }
    }

    pub fn from_config(config: &ProbeConfig) -> Self {
        Self::new(config.sysfs_root.clone())
    }

    /// Directory device nodes are resolved against
    pub fn with_dev_root(mut self, dev_root: impl Into<PathBuf>) -> Self {
        self.dev_root = dev_root.into();
        self
    }

    /// List the physical devices, sorted by path
    pub fn enumerate(&self) -> Result<Vec<Device>> {
        let block_dir = self.sysfs_root.join("block");
        let entries = fs::read_dir(&block_dir).map_err(|e| enumeration_error(&block_dir, e))?;

        let mut devices = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| enumeration_error(&block_dir, e))?;
            let name = entry.file_name().to_string_lossy().to_string();

            if !is_physical_name(&name) {
                tracing::debug!(%name, "skipping virtual block device");
                continue;
            }

            let base = entry.path();
            if !base.join("device").exists() {
                tracing::debug!(%name, "skipping block device without backing hardware");
                continue;
            }

            match self.read_device(&name, &base) {
                Some(device) => devices.push(device),
                None => tracing::debug!(%name, "skipping block device with no usable size"),
            }
        }

        devices.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::info!(count = devices.len(), "enumerated physical drives");
        Ok(devices)
    }

    fn read_device(&self, name: &str, base: &Path) -> Option<Device> {
        let sectors: u64 = read_sys(&base.join("size"))?.parse().ok()?;
        let size_bytes = sectors.checked_mul(SYSFS_SECTOR_SIZE)?;
        if size_bytes == 0 {
            return None;
        }

        let logical_sector_size = read_sys(&base.join("queue/logical_block_size"))
            .and_then(|s| s.parse().ok())
            .filter(|&s: &u64| s > 0)
            .unwrap_or(SYSFS_SECTOR_SIZE);

        let rotational = read_sys(&base.join("queue/rotational")).and_then(|s| match s.as_str() {
            "1" => Some(true),
            "0" => Some(false),
            _ => None,
        });

        Some(Device {
            name: name.to_string(),
            // cciss-style names encode a subdirectory with '!'
            path: self.dev_root.join(name.replace('!', "/")),
            size_bytes,
            model: read_sys(&base.join("device/model")).unwrap_or_default(),
            interface: InterfaceType::from_kernel_name(name),
            logical_sector_size,
            rotational,
        })
    }
}

/// Enumerate the physical drives of this machine
pub fn enumerate_physical_drives(config: &ProbeConfig) -> Result<Vec<Device>> {
    if cfg!(target_os = "linux") {
        DeviceEnumerator::from_config(config).enumerate()
    } else {
        Err(ProbeError::EnumerationError(format!(
            "unsupported platform: {}",
            std::env::consts::OS
        )))
    }
}

/// Whether a kernel block device name can refer to a physical disk
pub fn is_physical_name(name: &str) -> bool {
    !name.is_empty() && !VIRTUAL_PREFIXES.iter().any(|p| name.starts_with(p))
}

fn read_sys(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
}

fn enumeration_error(path: &Path, err: io::Error) -> ProbeError {
    match err.kind() {
        io::ErrorKind::PermissionDenied => {
            ProbeError::EnumerationError(format!("access denied to {}: {}", path.display(), err))
        }
        io::ErrorKind::NotFound => ProbeError::EnumerationError(format!(
            "{} not found; is sysfs mounted?",
            path.display()
        )),
        _ => ProbeError::EnumerationError(format!("cannot read {}: {}", path.display(), err)),
    }
}

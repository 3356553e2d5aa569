//! Physical device description

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A physical block device as reported by the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Kernel name, e.g. `sda` or `nvme0n1`
    pub name: String,
    /// Device node used to open the device
    pub path: PathBuf,
    /// Total capacity in bytes
    pub size_bytes: u64,
    /// Model string reported by the device, may be empty
    pub model: String,
    /// Bus the device is attached through
    pub interface: InterfaceType,
    /// Logical sector size in bytes
    pub logical_sector_size: u64,
    /// Spinning media, when the kernel knows
    pub rotational: Option<bool>,
}

impl Device {
    /// Number of whole `block_size` blocks addressable on the device
    pub fn block_count(&self, block_size: u64) -> u64 {
        if block_size == 0 {
            0
        } else {
            self.size_bytes / block_size
        }
    }

    /// Capacity in GiB, as shown in the device listing
    pub fn size_gb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0 * 1024.0)
    }

    /// Model string, or a placeholder when the device reports none
    pub fn model_or_unknown(&self) -> &str {
        if self.model.is_empty() {
            "Unknown model"
        } else {
            &self.model
        }
    }
}

/// Attachment bus, inferred from the kernel device name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterfaceType {
    Nvme,
    SataScsi,
    VirtIo,
    Mmc,
    Xen,
    Unknown,
}

impl InterfaceType {
    /// Infer the interface from a kernel block device name
    pub fn from_kernel_name(name: &str) -> Self {
        if name.starts_with("nvme") {
            InterfaceType::Nvme
        } else if name.starts_with("sd") || name.starts_with("hd") {
            InterfaceType::SataScsi
        } else if name.starts_with("vd") {
            InterfaceType::VirtIo
        } else if name.starts_with("mmcblk") {
            InterfaceType::Mmc
        } else if name.starts_with("xvd") {
            InterfaceType::Xen
        } else {
            InterfaceType::Unknown
        }
    }

    /// Get a human-readable description of the interface
    pub fn description(&self) -> &'static str {
        match self {
            InterfaceType::Nvme => "NVMe",
            InterfaceType::SataScsi => "SATA/SCSI",
            InterfaceType::VirtIo => "VirtIO",
            InterfaceType::Mmc => "MMC",
            InterfaceType::Xen => "Xen",
            InterfaceType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

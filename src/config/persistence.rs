//! Probe report persistence
//!
//! Writes each finished probe as a standalone JSON file when a report
//! directory is configured. Reports are never read back by the tool.

use crate::models::result::ProbeReport;
use crate::{ProbeError, Result, REPORT_FILE_PREFIX};
use std::fs;
use std::path::{Path, PathBuf};

/// Report storage manager
#[derive(Debug, Clone)]
pub struct ReportStorage {
    report_dir: PathBuf,
}

impl ReportStorage {
    pub fn new(report_dir: PathBuf) -> Self {
        Self { report_dir }
    }

    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    /// File name for a report, e.g. `probe-20261017T101500.123Z-sda.json`
    pub fn report_file_name(report: &ProbeReport) -> String {
        let device = report
            .device
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "device".to_string());
        format!(
            "{}{}-{}.json",
            REPORT_FILE_PREFIX,
            report.timestamp.format("%Y%m%dT%H%M%S%.3fZ"),
            device
        )
    }

    /// Write a report and return its path
    pub fn write_report(&self, report: &ProbeReport) -> Result<PathBuf> {
        fs::create_dir_all(&self.report_dir).map_err(|e| {
            ProbeError::ReportError(format!(
                "Failed to create report directory {}: {}",
                self.report_dir.display(),
                e
            ))
        })?;

        let path = self.report_dir.join(Self::report_file_name(report));
        let content = serde_json::to_string_pretty(report)?;

        fs::write(&path, content).map_err(|e| {
            ProbeError::ReportError(format!(
                "Failed to write report file {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(path = %path.display(), "wrote probe report");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReadSample;
    use std::time::Duration;
    use tempfile::TempDir;

    fn create_test_report() -> ProbeReport {
        let samples = vec![ReadSample {
            attempt: 1,
            block_index: 12,
            location_percent: 1.2,
            bytes_read: 4096,
            elapsed: Duration::from_micros(150),
            success: true,
            error: None,
        }];
        ProbeReport::new(PathBuf::from("/dev/nvme0n1"), 4096, 1000, samples)
    }

    #[test]
    fn test_write_report_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ReportStorage::new(temp_dir.path().join("reports").join("nested"));
        let report = create_test_report();

        let path = storage.write_report(&report).unwrap();
        assert!(path.exists());
        assert!(path.starts_with(storage.report_dir()));

        let content = fs::read_to_string(&path).unwrap();
        let loaded: ProbeReport = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded.device, report.device);
        assert_eq!(loaded.summary, report.summary);
        assert_eq!(loaded.samples.len(), 1);
    }

    #[test]
    fn test_report_file_name() {
        let report = create_test_report();
        let name = ReportStorage::report_file_name(&report);
        assert!(name.starts_with(REPORT_FILE_PREFIX));
        assert!(name.ends_with("-nvme0n1.json"));
    }

    #[test]
    fn test_write_into_file_path_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();

        let storage = ReportStorage::new(blocker);
        let err = storage.write_report(&create_test_report()).unwrap_err();
        assert!(matches!(err, ProbeError::ReportError(_)));
    }
}

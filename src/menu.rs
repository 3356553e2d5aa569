//! Interactive numbered menu
//!
//! Lists drives, runs the random-read probe on a selected drive and prints
//! per-read lines followed by a summary. Input and output are generic so the
//! whole dialogue can be driven from tests.

use std::io::{BufRead, Write};
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

use crate::config::ProbeConfig;
use crate::error::user_friendly_message;
use crate::io::disk::DiskIO;
use crate::models::{Device, ReadSample, Summary};
use crate::probe::RandomReadProbe;
use crate::util::units::{format_bytes, format_duration, format_millis};
use crate::{ProbeError, Result};

/// Top-level menu selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ListDrives,
    ProbeDrive,
    Exit,
    Invalid,
}

/// Parse the top-level menu input
pub fn parse_choice(input: &str) -> MenuChoice {
    match input.trim() {
        "1" => MenuChoice::ListDrives,
        "2" => MenuChoice::ProbeDrive,
        "3" => MenuChoice::Exit,
        _ => MenuChoice::Invalid,
    }
}

/// Parse a sample count answer. Blank input selects `default`.
pub fn parse_sample_count(input: &str, default: u64, max: u64) -> Result<u64> {
    let trimmed = input.trim();
    let count = if trimmed.is_empty() {
        default
    } else {
        match trimmed.parse::<u64>() {
            Ok(n) => n,
            // a negative integer is a range problem, not a format problem
            Err(_) if trimmed.parse::<i64>().is_ok() => return Err(out_of_range(max)),
            Err(_) => {
                return Err(ProbeError::InvalidInputError(
                    "Invalid number. Please enter an integer.".to_string(),
                ))
            }
        }
    };

    if count < 1 || count > max {
        return Err(out_of_range(max));
    }
    Ok(count)
}

fn out_of_range(max: u64) -> ProbeError {
    ProbeError::InvalidInputError(format!("Please enter a number between 1 and {}.", max))
}

/// Parse a 1-based drive selection into an index into `len` drives
pub fn parse_selection(input: &str, len: usize) -> Option<usize> {
    let n: usize = input.trim().parse().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}

/// One line of per-read output
pub fn format_sample_line(sample: &ReadSample, total: u64) -> String {
    let prefix = format!(
        "[{}/{}] Block {} (~{:.1}%)",
        sample.attempt, total, sample.block_index, sample.location_percent
    );
    if sample.success {
        format!(
            "{}: Read {} bytes in {} ms",
            prefix,
            sample.bytes_read,
            format_millis(sample.elapsed)
        )
    } else {
        format!(
            "{}: Error reading block: {}",
            prefix,
            sample.error.as_deref().unwrap_or("unknown error")
        )
    }
}

/// Print the aggregate statistics of a run
pub fn write_summary<W: Write>(out: &mut W, summary: &Summary) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "Success rate: {}/{} ({:.1}%)",
        summary.successes,
        summary.sample_count,
        summary.success_percent()
    )?;
    match summary.mean_latency {
        Some(latency) => writeln!(out, "Average latency: {} ms", format_millis(latency))?,
        None => writeln!(out, "Average latency: no data")?,
    }
    match summary.mean_throughput_mbps {
        Some(mbps) => writeln!(out, "Average throughput: {:.2} MB/s", mbps)?,
        None => writeln!(out, "Average throughput: no data")?,
    }
    writeln!(out, "Bytes read: {}", format_bytes(summary.bytes_read))
}

enum Flow {
    Continue,
    Exit,
}

/// Interactive menu over a fixed list of drives
pub struct Menu<R, W, D> {
    input: R,
    output: W,
    config: ProbeConfig,
    devices: Vec<Device>,
    disk_io: D,
}

impl<R: BufRead, W: Write, D: DiskIO> Menu<R, W, D> {
    pub fn new(input: R, output: W, config: ProbeConfig, devices: Vec<Device>, disk_io: D) -> Self {
        Self {
            input,
            output,
            config,
            devices,
            disk_io,
        }
    }

    /// Give back the output sink
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until the user exits or input ends
    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "\nSelect an option:")?;
            writeln!(self.output, "1) List physical drives")?;
            writeln!(self.output, "2) Quick random-read test on a drive")?;
            writeln!(self.output, "3) Exit")?;

            let Some(line) = self.prompt("Enter choice [1-3]: ")? else {
                return Ok(());
            };

            let flow = match parse_choice(&line) {
                MenuChoice::ListDrives => {
                    self.list_devices()?;
                    Flow::Continue
                }
                MenuChoice::ProbeDrive => self.probe_drive()?,
                MenuChoice::Exit => Flow::Exit,
                MenuChoice::Invalid => {
                    writeln!(self.output, "Invalid option, try again.")?;
                    Flow::Continue
                }
            };

            if let Flow::Exit = flow {
                writeln!(self.output, "Exiting.")?;
                return Ok(());
            }
        }
    }

    /// Print every drive with its size and interface
    pub fn list_devices(&mut self) -> Result<()> {
        if self.devices.is_empty() {
            writeln!(self.output, "No physical drives found.")?;
            return Ok(());
        }
        for (idx, d) in self.devices.iter().enumerate() {
            writeln!(
                self.output,
                "{}) {} - {} - {:.2} GB - {}",
                idx + 1,
                d.path.display(),
                d.model_or_unknown(),
                d.size_gb(),
                d.interface
            )?;
        }
        Ok(())
    }

    /// Ask for a sample count until a valid one is given. `None` on end of input.
    pub fn prompt_sample_count(&mut self, block_count: u64) -> Result<Option<u64>> {
        let default = self.config.default_sample_count;
        let question = format!(
            "Enter number of random-read tests [default {}, max {}]: ",
            default, block_count
        );
        loop {
            let Some(line) = self.prompt(&question)? else {
                return Ok(None);
            };
            match parse_sample_count(&line, default, block_count) {
                Ok(count) => return Ok(Some(count)),
                Err(ProbeError::InvalidInputError(msg)) => writeln!(self.output, "{}", msg)?,
                Err(e) => return Err(e),
            }
        }
    }

    fn probe_drive(&mut self) -> Result<Flow> {
        if self.devices.is_empty() {
            writeln!(self.output, "No physical drives found.")?;
            return Ok(Flow::Continue);
        }

        for (idx, d) in self.devices.iter().enumerate() {
            writeln!(
                self.output,
                "{}) {} - {}",
                idx + 1,
                d.path.display(),
                d.model_or_unknown()
            )?;
        }
        let question = format!("Select drive [1-{}]: ", self.devices.len());
        let Some(line) = self.prompt(&question)? else {
            return Ok(Flow::Exit);
        };
        let Some(index) = parse_selection(&line, self.devices.len()) else {
            writeln!(self.output, "Invalid selection.")?;
            return Ok(Flow::Continue);
        };
        let target = self.devices[index].clone();
        let block_size = self.config.block_size;

        // The handle stays open from sizing until the last read.
        let mut device = match self.disk_io.open_raw_read(&target.path) {
            Ok(device) => device,
            Err(e) => {
                let err = ProbeError::from(e);
                writeln!(self.output, "Error opening device: {}", user_friendly_message(&err))?;
                return Ok(Flow::Continue);
            }
        };

        let size = match device.device_size() {
            Ok(size) if size > 0 => size,
            Ok(_) => target.size_bytes,
            Err(e) => {
                tracing::debug!(error = %e, "device size query failed, using enumerated size");
                target.size_bytes
            }
        };
        let block_count = size / block_size;
        writeln!(self.output, "Drive total blocks available: {}", block_count)?;
        if block_count == 0 {
            writeln!(self.output, "Drive is too small for the configured block size.")?;
            return Ok(Flow::Continue);
        }
        if device.is_direct() && block_size < target.logical_sector_size {
            writeln!(
                self.output,
                "Note: block size {} is below the drive's {}-byte sector size; direct reads may fail.",
                block_size, target.logical_sector_size
            )?;
        }

        let Some(sample_count) = self.prompt_sample_count(block_count)? else {
            return Ok(Flow::Exit);
        };

        let mut probe = RandomReadProbe::new(block_size)?;
        let progress = progress_bar(sample_count);
        let started = Instant::now();
        let mut write_error = None;
        let output = &mut self.output;

        let report = probe.probe_device(
            device.as_mut(),
            &target.path,
            block_count,
            sample_count,
            |sample| {
                if write_error.is_none() {
                    let line = format_sample_line(sample, sample_count);
                    if let Err(e) = progress.suspend(|| writeln!(output, "{}", line)) {
                        write_error = Some(e);
                    }
                }
                progress.inc(1);
            },
        )?;
        progress.finish_and_clear();
        drop(device);

        if let Some(e) = write_error {
            return Err(e.into());
        }

        write_summary(&mut self.output, &report.summary)?;
        writeln!(
            self.output,
            "Probe finished in {}",
            format_duration(started.elapsed())
        )?;

        if let Some(storage) = self.config.report_storage() {
            match storage.write_report(&report) {
                Ok(path) => writeln!(self.output, "Report saved to {}", path.display())?,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to save probe report");
                    writeln!(self.output, "{}", user_friendly_message(&e))?;
                }
            }
        }

        Ok(Flow::Continue)
    }

    fn prompt(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line))
    }
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} reads ({eta})")
    {
        pb.set_style(style);
    }
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("1\n"), MenuChoice::ListDrives);
        assert_eq!(parse_choice(" 2 "), MenuChoice::ProbeDrive);
        assert_eq!(parse_choice("3"), MenuChoice::Exit);
        assert_eq!(parse_choice("4"), MenuChoice::Invalid);
        assert_eq!(parse_choice(""), MenuChoice::Invalid);
    }

    #[test]
    fn test_parse_sample_count_default_and_valid() {
        assert_eq!(parse_sample_count("\n", 25, 1000).unwrap(), 25);
        assert_eq!(parse_sample_count("   ", 25, 1000).unwrap(), 25);
        assert_eq!(parse_sample_count("25\n", 25, 1000).unwrap(), 25);
        assert_eq!(parse_sample_count("1000", 25, 1000).unwrap(), 1000);
        assert_eq!(parse_sample_count("1", 25, 1000).unwrap(), 1);
    }

    #[test]
    fn test_parse_sample_count_rejections() {
        let cases = ["abc", "12.5", "0", "-3", "1001", "99999999999999999999999"];
        for case in cases {
            assert!(
                matches!(
                    parse_sample_count(case, 25, 1000),
                    Err(ProbeError::InvalidInputError(_))
                ),
                "{:?} should be rejected",
                case
            );
        }
    }

    #[test]
    fn test_default_larger_than_device_is_rejected() {
        assert!(parse_sample_count("", 25, 10).is_err());
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("1", 2), Some(0));
        assert_eq!(parse_selection("2\n", 2), Some(1));
        assert_eq!(parse_selection("0", 2), None);
        assert_eq!(parse_selection("3", 2), None);
        assert_eq!(parse_selection("x", 2), None);
    }

    #[test]
    fn test_format_sample_line() {
        let mut sample = ReadSample {
            attempt: 3,
            block_index: 500,
            location_percent: 50.0,
            bytes_read: 4096,
            elapsed: Duration::from_micros(1250),
            success: true,
            error: None,
        };
        assert_eq!(
            format_sample_line(&sample, 25),
            "[3/25] Block 500 (~50.0%): Read 4096 bytes in 1.25 ms"
        );

        sample.success = false;
        sample.bytes_read = 0;
        sample.error = Some("Input/output error (os error 5)".to_string());
        assert_eq!(
            format_sample_line(&sample, 25),
            "[3/25] Block 500 (~50.0%): Error reading block: Input/output error (os error 5)"
        );
    }

    #[test]
    fn test_write_summary_without_successes() {
        let summary = Summary::from_samples(&[]);
        let mut out = Vec::new();
        write_summary(&mut out, &summary).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Success rate: 0/0 (0.0%)"));
        assert!(text.contains("Average latency: no data"));
        assert!(text.contains("Average throughput: no data"));
    }
}

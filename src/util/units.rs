//! Human-readable sizes, durations and read rates

use std::time::Duration;

const BINARY_UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];
const BYTES_PER_MB: f64 = (1u64 << 20) as f64;

/// Format a byte count with binary (1024-based) units
///
/// # Examples
/// ```
/// use drive_probe::util::units::format_bytes;
///
/// assert_eq!(format_bytes(1023), "1023 B");
/// assert_eq!(format_bytes(12_800), "12.5 KiB");
/// assert_eq!(format_bytes(4 << 30), "4.0 GiB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    // Every unit is a further 2^10, so the unit index is the bit length / 10
    let exponent = match bytes.checked_ilog2() {
        Some(bits) => (bits / 10) as usize,
        None => 0,
    }
    .min(BINARY_UNITS.len() - 1);

    if exponent == 0 {
        return format!("{} B", bytes);
    }
    let scaled = bytes as f64 / (1u64 << (10 * exponent)) as f64;
    format!("{:.1} {}", scaled, BINARY_UNITS[exponent])
}

/// Format an elapsed wall-clock time for the end-of-run line
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use drive_probe::util::units::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(420)), "420ms");
/// assert_eq!(format_duration(Duration::from_millis(2250)), "2.25s");
/// assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    match secs {
        0 => format!("{}ms", duration.as_millis()),
        1..=59 => format!("{:.2}s", duration.as_secs_f64()),
        60..=3599 => format!("{}m {}s", secs / 60, secs % 60),
        _ => format!("{}h {}m {}s", secs / 3600, secs % 3600 / 60, secs % 60),
    }
}

/// Read rate in MB/s (MB = 2^20 bytes).
///
/// `None` when no time was measured, so a read too fast for the clock does
/// not count as a zero-rate read.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use drive_probe::util::units::read_rate_mbps;
///
/// let rate = read_rate_mbps(2 << 20, Duration::from_millis(500)).unwrap();
/// assert!((rate - 4.0).abs() < 1e-9);
/// assert_eq!(read_rate_mbps(4096, Duration::ZERO), None);
/// ```
pub fn read_rate_mbps(bytes: u64, elapsed: Duration) -> Option<f64> {
    if elapsed.is_zero() {
        return None;
    }
    Some(bytes as f64 / BYTES_PER_MB / elapsed.as_secs_f64())
}

/// Format a duration as milliseconds with two decimals, without a unit
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use drive_probe::util::units::format_millis;
///
/// assert_eq!(format_millis(Duration::from_micros(1500)), "1.50");
/// ```
pub fn format_millis(duration: Duration) -> String {
    format!("{:.2}", duration.as_secs_f64() * 1000.0)
}

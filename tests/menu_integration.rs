//! Integration tests for the interactive menu

use drive_probe::config::ProbeConfig;
use drive_probe::io::PlatformDiskIO;
use drive_probe::menu::Menu;
use drive_probe::models::{Device, InterfaceType};
use std::io::Cursor;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const BLOCK_SIZE: u64 = 512;
const BLOCK_COUNT: u64 = 1000;

fn fake_drive() -> (TempDir, Device) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sdz");
    std::fs::write(&path, vec![0u8; (BLOCK_SIZE * BLOCK_COUNT) as usize]).unwrap();
    let device = Device {
        name: "sdz".to_string(),
        path,
        size_bytes: BLOCK_SIZE * BLOCK_COUNT,
        model: "Test Disk".to_string(),
        interface: InterfaceType::SataScsi,
        logical_sector_size: 512,
        rotational: Some(false),
    };
    (dir, device)
}

fn run_menu(input: &str, devices: Vec<Device>, config: ProbeConfig) -> String {
    let mut menu = Menu::new(
        Cursor::new(input.as_bytes().to_vec()),
        Vec::new(),
        config,
        devices,
        PlatformDiskIO::new(false),
    );
    menu.run().unwrap();
    String::from_utf8(menu.into_output()).unwrap()
}

fn config() -> ProbeConfig {
    ProbeConfig::new()
        .with_block_size(BLOCK_SIZE)
        .with_direct_io(false)
}

/// Counts per-sample lines. Piped input is not echoed, so the first sample
/// line shares a line with the count prompt and cannot be matched by prefix.
fn sample_lines(output: &str) -> usize {
    output.matches("] Block ").count()
}

#[test]
fn test_list_drives_then_exit() {
    let (_dir, device) = fake_drive();
    let output = run_menu("1\n3\n", vec![device], config());

    assert!(output.contains("1) List physical drives"));
    assert!(output.contains("sdz - Test Disk - 0.00 GB - SATA/SCSI"));
    assert!(output.trim_end().ends_with("Exiting."));
}

#[test]
fn test_non_numeric_count_reprompts_then_runs() {
    let (_dir, device) = fake_drive();
    let output = run_menu("2\n1\nabc\n25\n3\n", vec![device], config());

    assert!(output.contains("Drive total blocks available: 1000"));
    assert!(output.contains("Invalid number. Please enter an integer."));
    assert_eq!(
        output
            .matches("Enter number of random-read tests [default 25, max 1000]: ")
            .count(),
        2
    );
    assert_eq!(sample_lines(&output), 25);
    assert!(output.contains("[25/25] Block "));
    assert!(output.contains("Success rate: 25/25 (100.0%)"));
    assert!(output.contains("Average latency: "));
    assert!(output.contains(" MB/s"));
}

#[test]
fn test_count_above_block_count_reprompts() {
    let (_dir, device) = fake_drive();
    let output = run_menu("2\n1\n1001\n0\n5\n3\n", vec![device], config());

    assert_eq!(
        output
            .matches("Please enter a number between 1 and 1000.")
            .count(),
        2
    );
    assert_eq!(sample_lines(&output), 5);
    assert!(output.contains("Success rate: 5/5 (100.0%)"));
}

#[test]
fn test_blank_count_uses_default() {
    let (_dir, device) = fake_drive();
    let output = run_menu(
        "2\n1\n\n3\n",
        vec![device],
        config().with_default_sample_count(7),
    );
    assert_eq!(sample_lines(&output), 7);
    assert!(output.contains("Success rate: 7/7 (100.0%)"));
}

#[test]
fn test_invalid_option_and_selection() {
    let (_dir, device) = fake_drive();
    let output = run_menu("9\n2\n5\n3\n", vec![device], config());
    assert!(output.contains("Invalid option, try again."));
    assert!(output.contains("Invalid selection."));
    assert_eq!(sample_lines(&output), 0);
}

#[test]
fn test_device_smaller_than_block() {
    let (_dir, device) = fake_drive();
    let output = run_menu(
        "2\n1\n3\n",
        vec![device],
        config().with_block_size(1024 * 1024),
    );
    assert!(output.contains("Drive total blocks available: 0"));
    assert!(output.contains("Drive is too small for the configured block size."));
}

#[test]
fn test_open_failure_returns_to_menu() {
    let (dir, mut device) = fake_drive();
    device.path = dir.path().join("missing");
    let output = run_menu("2\n1\n3\n", vec![device], config());
    assert!(output.contains("Error opening device:"));
    assert!(output.trim_end().ends_with("Exiting."));
}

#[test]
fn test_end_of_input_exits_cleanly() {
    let (_dir, device) = fake_drive();
    let output = run_menu("", vec![device.clone()], config());
    assert!(output.contains("Enter choice [1-3]: "));

    // input ending in the middle of the count prompt
    let output = run_menu("2\n1\nabc\n", vec![device], config());
    assert_eq!(sample_lines(&output), 0);
}

#[test]
fn test_report_written_when_configured() {
    let (_dir, device) = fake_drive();
    let reports = tempdir().unwrap();
    let output = run_menu(
        "2\n1\n3\n3\n",
        vec![device],
        config().with_report_dir(reports.path().to_path_buf()),
    );

    assert!(output.contains("Report saved to "));
    let files: Vec<_> = std::fs::read_dir(reports.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);
    assert!(has_json_extension(&files[0]));
}

fn has_json_extension(path: &Path) -> bool {
    path.extension().map(|e| e == "json").unwrap_or(false)
}

#[test]
fn test_no_drives() {
    let output = run_menu("1\n2\n3\n", Vec::new(), config());
    assert_eq!(output.matches("No physical drives found.").count(), 2);
}

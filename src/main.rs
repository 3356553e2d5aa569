use drive_probe::config::ProbeConfig;
use drive_probe::devices::enumerate_physical_drives;
use drive_probe::error::user_friendly_message;
use drive_probe::io::create_disk_io;
use drive_probe::menu::Menu;
use drive_probe::LOG_ENV;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();

    let (config, config_error) = ProbeConfig::load_or_default();
    if let Some(e) = config_error {
        eprintln!("Warning: {}", user_friendly_message(&e));
        eprintln!("Continuing with default settings.");
    }

    // Enumeration failure is the only fatal startup error
    let devices = match enumerate_physical_drives(&config) {
        Ok(devices) => devices,
        Err(e) => {
            eprintln!("Error: {}", user_friendly_message(&e));
            return ExitCode::FAILURE;
        }
    };
    if devices.is_empty() {
        println!("No physical drives found.");
        return ExitCode::SUCCESS;
    }

    let disk_io = create_disk_io(config.direct_io);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut menu = Menu::new(stdin.lock(), stdout.lock(), config, devices, disk_io);

    match menu.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", user_friendly_message(&e));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

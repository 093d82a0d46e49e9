//! Capture ICM-20948 telemetry from a serial port into a CSV file.
//!
//! Subcommands:
//! - `list`: enumerate available serial ports
//! - `capture`: decode the frame stream and append one CSV row per frame

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use imu_logger::driver::CaptureDriver;
use imu_logger::sink::CsvSink;
use imu_logger::source::SerialSource;
use serialport::{SerialPortInfo, SerialPortType};
use tracing::info;

/// Baud rate the firmware configures for its CDC link.
const DEFAULT_BAUD: u32 = 9600;

/// Per-read timeout; transient silence on the link is retried.
const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// ICM-20948 serial telemetry logger
#[derive(Parser, Debug)]
#[command(name = "imu_log")]
#[command(about = "ICM-20948 serial telemetry logger")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available serial ports
    List,

    /// Capture telemetry frames into a CSV file
    Capture {
        /// Serial port path (prompts interactively when omitted)
        #[arg(short, long)]
        port: Option<String>,

        /// Baud rate
        #[arg(short, long, default_value_t = DEFAULT_BAUD)]
        baud: u32,

        /// Per-read timeout in milliseconds
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
        timeout_ms: u64,

        /// Output CSV path (default: imu_<timestamp>.csv)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    match args.command {
        Command::List => cmd_list(),
        Command::Capture {
            port,
            baud,
            timeout_ms,
            output,
        } => cmd_capture(port, baud, timeout_ms, output),
    }
}

// ==================== List Command ====================

fn cmd_list() -> Result<()> {
    let ports = serialport::available_ports().context("failed to enumerate serial ports")?;
    if ports.is_empty() {
        bail!("no serial ports found");
    }

    for (idx, port) in ports.iter().enumerate() {
        println!("{}: {} {}", idx + 1, port.port_name, describe_port(port));
    }
    Ok(())
}

/// USB product description when the port has one.
fn describe_port(port: &SerialPortInfo) -> String {
    match &port.port_type {
        SerialPortType::UsbPort(usb) => match &usb.product {
            Some(product) => format!("({product})"),
            None => String::from("(USB)"),
        },
        _ => String::new(),
    }
}

// ==================== Capture Command ====================

fn cmd_capture(
    port: Option<String>,
    baud: u32,
    timeout_ms: u64,
    output: Option<String>,
) -> Result<()> {
    let port_name = match port {
        Some(name) => name,
        None => prompt_for_port()?,
    };
    let output = output.unwrap_or_else(default_output_name);

    info!("Connecting to {} at {} baud...", port_name, baud);
    let source = SerialSource::open(&port_name, baud, Duration::from_millis(timeout_ms))
        .with_context(|| format!("failed to open {port_name}"))?;

    info!("Writing rows to {}", output);
    let sink = CsvSink::create(&output).with_context(|| format!("failed to create {output}"))?;

    let mut driver = CaptureDriver::new(source, sink);
    let result = driver.run();
    info!("Capture ended after {} frames", driver.frames_written());
    result.map_err(Into::into)
}

/// `imu_20240101_123000.csv` from the current local time.
fn default_output_name() -> String {
    Local::now().format("imu_%Y%m%d_%H%M%S.csv").to_string()
}

fn prompt_for_port() -> Result<String> {
    let ports = serialport::available_ports().context("failed to enumerate serial ports")?;
    if ports.is_empty() {
        bail!("no serial ports found");
    }

    println!("Available ports:");
    for (idx, port) in ports.iter().enumerate() {
        println!("  {}: {} {}", idx + 1, port.port_name, describe_port(port));
    }

    print!("Select port [1-{}]: ", ports.len());
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let choice: usize = line
        .trim()
        .parse()
        .context("expected a port number from the list")?;
    if choice == 0 || choice > ports.len() {
        bail!("port number {choice} is out of range");
    }

    Ok(ports[choice - 1].port_name.clone())
}

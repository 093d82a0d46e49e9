//! Decode a raw telemetry dump into a CSV file.
//!
//! Runs the same frame decoder used for live capture over a byte dump
//! (e.g. `cat /dev/ttyACM0 > dump.bin`), writing one row per well-formed
//! frame and counting what had to be discarded.

use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};
use clap::Parser;
use imu_logger::icm20948::{DecodeError, FrameDecoder};
use imu_logger::sink::{CsvSink, RowSink};
use imu_logger::source::{ReaderSource, SourceError};

/// Decode a raw ICM-20948 telemetry dump into CSV
#[derive(Parser, Debug)]
#[command(name = "decode_dump")]
#[command(about = "Decode a raw ICM-20948 telemetry dump into CSV")]
struct Args {
    /// Raw dump file
    dump: String,

    /// Output CSV path
    output: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let file = File::open(&args.dump).with_context(|| format!("failed to open {}", args.dump))?;
    let mut decoder = FrameDecoder::new(ReaderSource::new(BufReader::new(file)));
    let mut sink =
        CsvSink::create(&args.output).with_context(|| format!("failed to create {}", args.output))?;

    let mut decoded = 0u64;
    let mut discarded = 0u64;

    loop {
        match decoder.read_frame() {
            Ok(frame) => {
                sink.write_row(&frame)?;
                decoded += 1;
            }
            // End of the dump, possibly mid-frame.
            Err(DecodeError::Source(SourceError::Disconnected)) => break,
            Err(DecodeError::Source(e)) => return Err(e.into()),
            Err(e) => {
                eprintln!("discarding frame: {e}");
                discarded += 1;
            }
        }
    }
    sink.flush()?;

    println!(
        "Decoded {decoded} frames ({discarded} discarded) from {}",
        args.dump
    );
    println!("Wrote {}", args.output);
    Ok(())
}

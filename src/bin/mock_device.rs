//! Emit synthetic ICM-20948 telemetry frames to stdout.
//!
//! Produces the same wire format as the firmware, for exercising the
//! decoder and capture pipeline without hardware:
//!
//! ```text
//! mock_device --frames 100 > dump.bin
//! decode_dump dump.bin out.csv
//! ```

use std::io::{self, BufWriter, Write};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

/// Emit synthetic ICM-20948 telemetry frames
#[derive(Parser, Debug)]
#[command(name = "mock_device")]
#[command(about = "Emit synthetic ICM-20948 telemetry frames")]
struct Args {
    /// Number of frames to emit (0 = run until killed)
    #[arg(short = 'n', long, default_value_t = 10)]
    frames: u64,

    /// Delay between frames in milliseconds
    #[arg(long, default_value_t = 0)]
    interval_ms: u64,

    /// Corrupt every Nth frame's accel segment (0 = never)
    #[arg(long, default_value_t = 0)]
    corrupt_every: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let mut epoch = 0u64;
    loop {
        if args.frames > 0 && epoch >= args.frames {
            break;
        }

        let corrupt = args.corrupt_every > 0 && (epoch + 1) % args.corrupt_every == 0;
        write_frame(&mut out, epoch, corrupt)?;
        out.flush()?;

        epoch += 1;
        if args.interval_ms > 0 {
            thread::sleep(Duration::from_millis(args.interval_ms));
        }
    }

    Ok(())
}

/// One wire frame with slow sinusoid readings, one frame per second of
/// simulated clock.
fn write_frame(out: &mut impl Write, epoch: u64, corrupt: bool) -> io::Result<()> {
    let t = epoch as f64 * 0.1;
    let clock = format!(
        "2024-01-01 {:02}:{:02}:{:02}",
        epoch / 3600 % 24,
        epoch / 60 % 60,
        epoch % 60
    );
    let elapsed = format!("{:02}:{:02}", epoch / 60, epoch % 60);

    write!(out, "#{epoch}&{clock}&{clock}&{elapsed}&")?;

    if corrupt {
        // Drop the x value so the capture side exercises its fallback.
        write!(
            out,
            "x_accel = /y_accel = {:.4}/z_accel = {:.4}&",
            (t + 1.0).sin() * 0.05,
            0.98 + t.sin() * 0.01
        )?;
    } else {
        write!(
            out,
            "x_accel = {:.4}/y_accel = {:.4}/z_accel = {:.4}&",
            t.sin() * 0.05,
            (t + 1.0).sin() * 0.05,
            0.98 + t.sin() * 0.01
        )?;
    }

    write!(
        out,
        "x_gyro = {:.4}/y_gyro = {:.4}/z_gyro =  {:.4}&",
        t.cos() * 2.0,
        (t + 1.0).cos() * 2.0,
        (t + 2.0).cos() * 2.0
    )?;
    write!(
        out,
        "x_mag = {:.4}/y_mag = {:.4}/z_mag = {:.4}&\r\n",
        22.0 + t.sin() * 3.0,
        -4.0 + t.cos() * 3.0,
        43.0 + (t + 1.0).sin() * 3.0
    )?;

    Ok(())
}

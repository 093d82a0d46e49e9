//! The capture loop.
//!
//! [`CaptureDriver`] owns the decoder and the sink for the lifetime of a
//! capture: decode one frame, hand it to the sink, flush, discard any
//! residual serial input, repeat. Frame-level decode errors cost one
//! frame; source-level errors end the run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::icm20948::{DecodeError, FrameDecoder, TelemetryFrame};
use crate::sink::{RowSink, SinkError};
use crate::source::{DelimitedRead, SourceError};

/// Errors that end a capture run.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The byte source failed in a non-retryable way.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The row sink failed; rows can no longer be persisted.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Drives frame decoding against a live byte source.
///
/// Single-threaded and blocking: frame boundaries are positional, so
/// correctness depends on one consumer reading the stream in order. Each
/// decoded frame is written and flushed before the next read begins,
/// trading throughput for durability against an abrupt disconnect.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use imu_logger::driver::CaptureDriver;
/// use imu_logger::sink::CsvSink;
/// use imu_logger::source::SerialSource;
///
/// let source = SerialSource::open("/dev/ttyACM0", 9_600, Duration::from_secs(1))?;
/// let sink = CsvSink::create("imu.csv")?;
/// let mut driver = CaptureDriver::new(source, sink);
/// driver.run()?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct CaptureDriver<S, K> {
    decoder: FrameDecoder<S>,
    sink: K,
    shutdown: Arc<AtomicBool>,
    frames_written: u64,
}

impl<S: DelimitedRead, K: RowSink> CaptureDriver<S, K> {
    pub fn new(source: S, sink: K) -> Self {
        Self {
            decoder: FrameDecoder::new(source),
            sink,
            shutdown: Arc::new(AtomicBool::new(false)),
            frames_written: 0,
        }
    }

    /// Flag that stops the loop at the next cycle boundary.
    ///
    /// Checked only between frames: a cycle in progress completes or
    /// fails whole, so no partial record is ever emitted.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Frames forwarded to the sink so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Run until the source disconnects, the sink fails, or the
    /// shutdown flag is set.
    ///
    /// Read timeouts are retried: transient silence on a serial link is
    /// expected and does not end the run.
    pub fn run(&mut self) -> Result<(), CaptureError> {
        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                info!(
                    "shutdown requested, stopping after {} frames",
                    self.frames_written
                );
                return Ok(());
            }

            match self.cycle() {
                Ok(()) => {}
                Err(CaptureError::Source(e)) if e.is_retryable() => {
                    debug!("link idle: {e}, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One cycle: decode, persist, flush, discard residual input.
    fn cycle(&mut self) -> Result<(), CaptureError> {
        match self.decoder.read_frame() {
            Ok(frame) => {
                self.write_frame(&frame)?;
                self.discard_residual()?;
                Ok(())
            }
            Err(DecodeError::Source(e)) => Err(e.into()),
            Err(e) => {
                // Fatal to this cycle only; resync at the next `#`.
                warn!("frame discarded: {e}");
                self.discard_residual()?;
                Ok(())
            }
        }
    }

    fn write_frame(&mut self, frame: &TelemetryFrame) -> Result<(), CaptureError> {
        self.sink.write_row(frame)?;
        self.sink.flush()?;
        self.frames_written += 1;
        debug!("frame {} written, epoch {}", self.frames_written, frame.epoch);
        Ok(())
    }

    fn discard_residual(&mut self) -> Result<(), CaptureError> {
        self.decoder.source_mut().discard_input()?;
        Ok(())
    }
}

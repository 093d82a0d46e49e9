//! Byte sources with delimiter-bounded reads.
//!
//! The frame decoder needs exactly two things from its transport: a
//! blocking read bounded by a sentinel byte, and a way to drop whatever
//! unread input has accumulated. [`SerialSource`] provides both over a
//! serial port; [`ReaderSource`] adapts any [`Read`] implementation for
//! offline dumps and tests.

use std::io::{self, Read};
use std::time::Duration;

use serialport::{ClearBuffer, SerialPort};
use thiserror::Error;
use tracing::trace;

/// Errors from a byte source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to open the serial port.
    #[error("failed to open serial port: {0}")]
    Open(String),

    /// No delimiter arrived within the source's timeout. Transient
    /// silence on a serial link is expected; callers should retry.
    #[error("timed out waiting for delimiter 0x{delimiter:02x}")]
    Timeout { delimiter: u8 },

    /// The source reached end-of-stream; the device is gone.
    #[error("byte source disconnected")]
    Disconnected,

    /// Any other I/O failure.
    #[error("source I/O error: {0}")]
    Io(#[from] io::Error),
}

impl SourceError {
    /// True when the caller may retry the read that produced this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SourceError::Timeout { .. })
    }
}

/// A byte stream consumed up to sentinel bytes.
pub trait DelimitedRead {
    /// Read and consume bytes up to and including the next `delimiter`,
    /// returning everything before it.
    ///
    /// Blocks until the delimiter arrives or the source's timeout
    /// elapses ([`SourceError::Timeout`]).
    fn read_until(&mut self, delimiter: u8) -> Result<Vec<u8>, SourceError>;

    /// Discard any buffered unread input.
    ///
    /// Called between frames so stale bytes cannot drift the decoder
    /// away from true frame boundaries.
    fn discard_input(&mut self) -> Result<(), SourceError>;
}

/// Shared delimiter loop: one byte per read so the sentinel is acted on
/// the moment it arrives.
fn read_until_byte<R: Read>(reader: &mut R, delimiter: u8) -> Result<Vec<u8>, SourceError> {
    let mut buf = [0u8; 1];
    let mut bytes = Vec::new();

    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Err(SourceError::Disconnected),
            Ok(_) => {
                if buf[0] == delimiter {
                    trace!(
                        "segment of {} bytes up to delimiter 0x{delimiter:02x}",
                        bytes.len()
                    );
                    return Ok(bytes);
                }
                bytes.push(buf[0]);
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                return Err(SourceError::Timeout { delimiter });
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                return Err(SourceError::Timeout { delimiter });
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Serial-port byte source.
pub struct SerialSource {
    port: Box<dyn SerialPort>,
}

impl SerialSource {
    /// Open `path` at `baud` with the given per-read timeout.
    pub fn open(path: &str, baud: u32, timeout: Duration) -> Result<Self, SourceError> {
        let port = serialport::new(path, baud)
            .timeout(timeout)
            .open()
            .map_err(|e| SourceError::Open(format!("{path}: {e}")))?;
        Ok(Self { port })
    }

    /// Wrap an already-open port.
    pub fn from_port(port: Box<dyn SerialPort>) -> Self {
        Self { port }
    }
}

impl DelimitedRead for SerialSource {
    fn read_until(&mut self, delimiter: u8) -> Result<Vec<u8>, SourceError> {
        read_until_byte(&mut self.port, delimiter)
    }

    fn discard_input(&mut self) -> Result<(), SourceError> {
        self.port
            .clear(ClearBuffer::Input)
            .map_err(io::Error::from)?;
        Ok(())
    }
}

/// Byte source over any [`Read`] implementation.
///
/// Backs offline decoding of raw dump files and in-memory test streams.
/// End-of-stream maps to [`SourceError::Disconnected`]; `discard_input`
/// is a no-op since there is no device-side buffer behind the reader.
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> DelimitedRead for ReaderSource<R> {
    fn read_until(&mut self, delimiter: u8) -> Result<Vec<u8>, SourceError> {
        read_until_byte(&mut self.reader, delimiter)
    }

    fn discard_input(&mut self) -> Result<(), SourceError> {
        Ok(())
    }
}

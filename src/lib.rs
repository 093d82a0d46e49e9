//! Host-side capture tooling for ICM-20948 IMU telemetry.
//!
//! An STM32 board streams accelerometer, gyroscope, and magnetometer
//! readings over its USB CDC serial link as sentinel-delimited text
//! frames. This crate decodes that stream into typed records and appends
//! one CSV row per frame:
//!
//! - [`icm20948`] - the wire protocol: frame layout, axis field
//!   extraction, and the frame decoder
//! - [`source`] - byte sources with delimiter-bounded reads (serial port,
//!   arbitrary readers for offline dumps and tests)
//! - [`sink`] - row sinks for decoded frames (CSV)
//! - [`driver`] - the capture loop tying source, decoder, and sink
//!   together

pub mod driver;
pub mod icm20948;
pub mod sink;
pub mod source;

pub use driver::{CaptureDriver, CaptureError};
pub use icm20948::{FrameDecoder, TelemetryFrame};
pub use sink::{CsvSink, RowSink};
pub use source::{DelimitedRead, ReaderSource, SerialSource, SourceError};

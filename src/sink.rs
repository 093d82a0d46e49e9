//! Row sinks for decoded frames.

use std::fs::File;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::icm20948::{TelemetryFrame, COLUMNS};

/// Errors from a row sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// CSV serialization or write failure.
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    /// Any other I/O failure.
    #[error("sink I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Destination for decoded frames.
///
/// The driver hands over each frame as soon as it decodes and flushes
/// after every row, so an abrupt disconnect loses at most the frame in
/// progress. Implementations must preserve arrival order.
pub trait RowSink {
    /// Append one 13-column row.
    fn write_row(&mut self, frame: &TelemetryFrame) -> Result<(), SinkError>;

    /// Push buffered rows to durable storage.
    fn flush(&mut self) -> Result<(), SinkError>;
}

/// CSV file sink.
///
/// The 13-column header is written on creation; every frame becomes one
/// record after it.
pub struct CsvSink<W: io::Write> {
    writer: csv::Writer<W>,
}

impl CsvSink<File> {
    /// Create `path`, truncating any existing file, and write the
    /// header row.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, SinkError> {
        Self::from_csv_writer(csv::Writer::from_path(path)?)
    }
}

impl<W: io::Write> CsvSink<W> {
    /// Wrap an arbitrary writer (stdout, an in-memory buffer).
    pub fn from_writer(writer: W) -> Result<Self, SinkError> {
        Self::from_csv_writer(csv::Writer::from_writer(writer))
    }

    fn from_csv_writer(mut writer: csv::Writer<W>) -> Result<Self, SinkError> {
        writer.write_record(COLUMNS)?;
        writer.flush()?;
        Ok(Self { writer })
    }
}

impl<W: io::Write> RowSink for CsvSink<W> {
    fn write_row(&mut self, frame: &TelemetryFrame) -> Result<(), SinkError> {
        self.writer.write_record(frame.to_row())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icm20948::AxisReading;

    fn sample_frame() -> TelemetryFrame {
        TelemetryFrame {
            epoch: 3,
            utc_time: String::from("2024-01-01 00:00:03"),
            uk_time: String::from("2024-01-01 00:00:03"),
            elapsed: String::from("00:03"),
            accel: AxisReading::new(1.0, -2.5, 3.25),
            gyro: AxisReading::new(0.1, 0.2, 0.3),
            mag: AxisReading::new(10.0, 20.0, 30.0),
        }
    }

    #[test]
    fn test_writes_header_then_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut sink = CsvSink::create(&path).unwrap();
        sink.write_row(&sample_frame()).unwrap();
        sink.flush().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Epoch,UTC Time,UK Time,Elapsed Time,\
             x_accel,y_accel,z_accel,x_gyro,y_gyro,z_gyro,x_mag,y_mag,z_mag"
        );
        assert_eq!(
            lines.next().unwrap(),
            "3,2024-01-01 00:00:03,2024-01-01 00:00:03,00:03,1,-2.5,3.25,0.1,0.2,0.3,10,20,30"
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_header_present_before_any_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        let _sink = CsvSink::create(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("Epoch,"));
    }
}

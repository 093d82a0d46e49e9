//! Decoded telemetry records.

use strum::{Display, EnumIter};

/// Axis identifier for three-axis sensor readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Sensor group within a frame, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum SensorGroup {
    Accel,
    Gyro,
    Mag,
}

/// Three-axis sensor reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisReading {
    /// X-axis value
    pub x: f64,
    /// Y-axis value
    pub y: f64,
    /// Z-axis value
    pub z: f64,
}

impl AxisReading {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Number of scalar columns in a serialized frame row.
pub const COLUMN_COUNT: usize = 13;

/// CSV column names, in row order.
pub const COLUMNS: [&str; COLUMN_COUNT] = [
    "Epoch",
    "UTC Time",
    "UK Time",
    "Elapsed Time",
    "x_accel",
    "y_accel",
    "z_accel",
    "x_gyro",
    "y_gyro",
    "z_gyro",
    "x_mag",
    "y_mag",
    "z_mag",
];

/// One decoded telemetry frame.
///
/// `epoch` is the device's monotonic cycle counter, not wall-clock time.
/// The board carries a wall clock too, but only as the three opaque time
/// strings, which are kept exactly as received.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryFrame {
    /// Monotonic cycle counter from the device.
    pub epoch: u64,

    /// UTC clock string as sent (`YYYY-MM-DD HH:MM:SS`).
    pub utc_time: String,

    /// Local (UK) clock string as sent.
    pub uk_time: String,

    /// Elapsed-time string as sent (`MM:SS`).
    pub elapsed: String,

    /// Accelerometer reading.
    pub accel: AxisReading,

    /// Gyroscope reading.
    pub gyro: AxisReading,

    /// Magnetometer reading.
    pub mag: AxisReading,
}

impl TelemetryFrame {
    /// Serialize to a 13-column row matching [`COLUMNS`].
    ///
    /// Floats use Rust's shortest round-trip formatting, so re-parsing a
    /// written column reproduces the decoded `f64` exactly.
    pub fn to_row(&self) -> [String; COLUMN_COUNT] {
        [
            self.epoch.to_string(),
            self.utc_time.clone(),
            self.uk_time.clone(),
            self.elapsed.clone(),
            self.accel.x.to_string(),
            self.accel.y.to_string(),
            self.accel.z.to_string(),
            self.gyro.x.to_string(),
            self.gyro.y.to_string(),
            self.gyro.z.to_string(),
            self.mag.x.to_string(),
            self.mag.y.to_string(),
            self.mag.z.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> TelemetryFrame {
        TelemetryFrame {
            epoch: 42,
            utc_time: String::from("2024-01-01 00:00:00"),
            uk_time: String::from("2024-01-01 00:00:00"),
            elapsed: String::from("00:42"),
            accel: AxisReading::new(1.0, 2.0, 3.0),
            gyro: AxisReading::new(0.1, 0.2, 0.3),
            mag: AxisReading::new(10.0, 20.0, 30.0),
        }
    }

    #[test]
    fn test_column_contract() {
        assert_eq!(COLUMNS.len(), COLUMN_COUNT);
        assert_eq!(COLUMNS[0], "Epoch");
        assert_eq!(COLUMNS[4], "x_accel");
        assert_eq!(COLUMNS[12], "z_mag");
    }

    #[test]
    fn test_row_matches_column_order() {
        let row = sample_frame().to_row();
        assert_eq!(row.len(), COLUMN_COUNT);
        assert_eq!(row[0], "42");
        assert_eq!(row[1], "2024-01-01 00:00:00");
        assert_eq!(row[3], "00:42");
        assert_eq!(row[4], "1");
        assert_eq!(row[7], "0.1");
        assert_eq!(row[12], "30");
    }

    #[test]
    fn test_row_floats_reparse_exactly() {
        let frame = TelemetryFrame {
            accel: AxisReading::new(0.1234567890123, -9.81, 1.0 / 3.0),
            ..sample_frame()
        };
        let row = frame.to_row();
        assert_eq!(row[4].parse::<f64>().unwrap(), frame.accel.x);
        assert_eq!(row[5].parse::<f64>().unwrap(), frame.accel.y);
        assert_eq!(row[6].parse::<f64>().unwrap(), frame.accel.z);
    }

    #[test]
    fn test_axis_labels() {
        assert_eq!(Axis::X.to_string(), "x");
        assert_eq!(Axis::Z.to_string(), "z");
        assert_eq!(SensorGroup::Accel.to_string(), "accel");
        assert_eq!(SensorGroup::Mag.to_string(), "mag");
    }
}

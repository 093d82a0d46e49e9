//! ICM-20948 telemetry wire protocol.
//!
//! The firmware formats each measurement cycle as one text frame:
//!
//! ```text
//! #<epoch>&<utc time>&<uk time>&<elapsed>&
//! x_accel = <f>/y_accel = <f>/z_accel = <f>&
//! x_gyro = <f>/y_gyro = <f>/z_gyro = <f>&
//! x_mag = <f>/y_mag = <f>/z_mag = <f>&
//! ```
//!
//! `#` marks the start of a frame, `&` terminates each of the seven
//! segments, and `/` separates the three axis fragments inside a sensor
//! segment. Fields are positional; the labels inside axis fragments are
//! only used to locate the `=` separator.

mod decoder;
mod field;
mod frame;

pub use decoder::{DecodeError, FrameDecoder};
pub use field::{extract_value, FieldFault, FieldValue, FALLBACK_VALUE};
pub use frame::{Axis, AxisReading, SensorGroup, TelemetryFrame, COLUMNS, COLUMN_COUNT};

/// Byte marking the start of a frame.
pub const FRAME_START: u8 = b'#';

/// Byte terminating each frame segment.
pub const SEGMENT_END: u8 = b'&';

/// Separator between axis fragments within a sensor segment.
pub const AXIS_SEPARATOR: char = '/';

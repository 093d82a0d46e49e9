//! Sentinel-delimited frame decoding.

use strum::IntoEnumIterator;
use thiserror::Error;
use tracing::warn;

use crate::source::{DelimitedRead, SourceError};

use super::field::{extract_value, FALLBACK_VALUE};
use super::frame::{Axis, AxisReading, SensorGroup, TelemetryFrame};
use super::{AXIS_SEPARATOR, FRAME_START, SEGMENT_END};

/// Errors from decoding one frame cycle.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The epoch segment did not parse as an integer. The epoch is the
    /// record's primary key, so unlike axis fields it has no fallback.
    #[error("invalid epoch segment {segment:?}")]
    InvalidEpoch {
        /// The segment text as received.
        segment: String,
    },

    /// An axis segment split into other than three fragments. Padding
    /// would silently mis-assign axes, so the frame is rejected.
    #[error("{group} segment has {count} axis fragments, expected 3")]
    AxisCount {
        /// Sensor group the segment belongs to.
        group: SensorGroup,
        /// Number of fragments the `/`-split produced.
        count: usize,
    },

    /// The byte source failed or timed out.
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl DecodeError {
    /// True when the error discards the current frame but the stream
    /// stays decodable: the next cycle resynchronizes at the next `#`.
    pub fn is_fatal_to_cycle(&self) -> bool {
        matches!(
            self,
            DecodeError::InvalidEpoch { .. } | DecodeError::AxisCount { .. }
        )
    }
}

/// Decodes telemetry frames from a delimited byte source.
///
/// Fields are positional in the wire format, so consumption is strictly
/// sequential and one decoder must own the source for the lifetime of
/// the stream.
pub struct FrameDecoder<S> {
    source: S,
}

impl<S: DelimitedRead> FrameDecoder<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Access the underlying byte source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Decode the next frame from the stream.
    ///
    /// Discards bytes up to the next `#`, then reads the seven
    /// `&`-terminated segments in wire order: epoch, three time strings,
    /// and the accel/gyro/mag axis groups. Returns a fully populated
    /// frame or the first error; no partial frame is ever produced.
    pub fn read_frame(&mut self) -> Result<TelemetryFrame, DecodeError> {
        // Everything before the frame-start byte is inter-frame noise:
        // the previous frame's \r\n trailer, or a partial frame emitted
        // before we attached.
        self.source.read_until(FRAME_START)?;

        let epoch = self.read_epoch()?;
        let utc_time = self.read_text()?;
        let uk_time = self.read_text()?;
        let elapsed = self.read_text()?;
        let accel = self.read_axes(SensorGroup::Accel)?;
        let gyro = self.read_axes(SensorGroup::Gyro)?;
        let mag = self.read_axes(SensorGroup::Mag)?;

        Ok(TelemetryFrame {
            epoch,
            utc_time,
            uk_time,
            elapsed,
            accel,
            gyro,
            mag,
        })
    }

    /// Read one `&`-terminated segment as text.
    fn read_text(&mut self) -> Result<String, SourceError> {
        let bytes = self.source.read_until(SEGMENT_END)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn read_epoch(&mut self) -> Result<u64, DecodeError> {
        let segment = self.read_text()?;
        // A sync slip can leave stray `#` bytes in the epoch segment;
        // drop them before parsing.
        let cleaned: String = segment.chars().filter(|&c| c != '#').collect();
        cleaned
            .trim()
            .parse()
            .map_err(|_| DecodeError::InvalidEpoch { segment })
    }

    fn read_axes(&mut self, group: SensorGroup) -> Result<AxisReading, DecodeError> {
        let segment = self.read_text()?;
        let fragments: Vec<&str> = segment.split(AXIS_SEPARATOR).collect();
        if fragments.len() != 3 {
            return Err(DecodeError::AxisCount {
                group,
                count: fragments.len(),
            });
        }

        let mut values = [FALLBACK_VALUE; 3];
        for ((axis, fragment), slot) in Axis::iter()
            .zip(fragments.iter().copied())
            .zip(values.iter_mut())
        {
            let extracted = extract_value(fragment);
            if let Some(fault) = extracted.fault() {
                warn!("{group} {axis} fragment {fragment:?}: {fault}, using fallback value");
            }
            *slot = extracted.value();
        }

        Ok(AxisReading::new(values[0], values[1], values[2]))
    }
}

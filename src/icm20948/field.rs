//! Axis field extraction.
//!
//! Each axis fragment has the shape `x_accel = -0.53`. Only the text
//! between the first and second `=` matters; the label is discarded. A
//! fragment that cannot produce a number maps to [`FALLBACK_VALUE`]
//! instead of failing the frame - one garbled field costs one reading,
//! not the record.

use thiserror::Error;

/// Value substituted when a fragment fails to parse.
pub const FALLBACK_VALUE: f64 = 0.0;

/// Why a fragment fell back to the default value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldFault {
    /// No `=` separator present in the fragment.
    #[error("no '=' separator")]
    MissingSeparator,

    /// The text after the first `=` is not a valid float.
    #[error("value is not a number")]
    NotNumeric,
}

/// Outcome of extracting one axis fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    /// The fragment carried a parseable number.
    Parsed(f64),

    /// The fragment was malformed; [`FALLBACK_VALUE`] stands in.
    Fallback(FieldFault),
}

impl FieldValue {
    /// The numeric value, substituting [`FALLBACK_VALUE`] for fallbacks.
    pub fn value(self) -> f64 {
        match self {
            FieldValue::Parsed(value) => value,
            FieldValue::Fallback(_) => FALLBACK_VALUE,
        }
    }

    /// The fault, if the fragment fell back.
    pub fn fault(self) -> Option<FieldFault> {
        match self {
            FieldValue::Parsed(_) => None,
            FieldValue::Fallback(fault) => Some(fault),
        }
    }
}

/// Extract the numeric value from a `label=value` fragment.
///
/// Takes the text between the first and second `=`, trims surrounding
/// whitespace, and parses it as an `f64`. A missing separator or
/// unparseable value yields [`FieldValue::Fallback`]; extraction never
/// fails the enclosing frame.
///
/// # Example
///
/// ```
/// use imu_logger::icm20948::{extract_value, FieldValue};
///
/// assert_eq!(extract_value("x_accel = 1.25"), FieldValue::Parsed(1.25));
/// assert_eq!(extract_value("x_accel").value(), 0.0);
/// ```
pub fn extract_value(fragment: &str) -> FieldValue {
    let Some(raw) = fragment.split('=').nth(1) else {
        return FieldValue::Fallback(FieldFault::MissingSeparator);
    };
    match raw.trim().parse::<f64>() {
        Ok(value) => FieldValue::Parsed(value),
        Err(_) => FieldValue::Fallback(FieldFault::NotNumeric),
    }
}

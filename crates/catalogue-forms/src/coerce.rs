//! Typed coercion of text form values at the submission boundary.
//!
//! Inputs are always text. Numeric wire fields (`booking_fee`, `rental_fee`,
//! `genre_id`) are converted here, and a failed conversion is reported
//! instead of being sent along as a string.

use thiserror::Error;

use catalogue_core::{FieldError, SubmissionError};

use crate::state::FormState;

/// A form value could not be converted to its wire type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Field '{field}' value '{raw}' is not a valid {expected}")]
pub struct CoercionError {
    /// The field name.
    pub field: String,
    /// The raw text that failed to convert.
    pub raw: String,
    /// The expected type, for messages.
    pub expected: &'static str,
}

impl CoercionError {
    /// The field-level error to record on the offending field.
    pub const fn field_error(&self) -> FieldError {
        FieldError::InvalidNumber
    }
}

impl From<CoercionError> for SubmissionError {
    fn from(err: CoercionError) -> Self {
        Self::DecodeError(err.to_string())
    }
}

fn raw_value<'a>(state: &'a FormState, field: &str) -> &'a str {
    state.value(field).map_or("", str::trim)
}

/// Converts a field to a finite `f64`.
pub fn coerce_f64(state: &FormState, field: &str) -> Result<f64, CoercionError> {
    let raw = raw_value(state, field);
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(CoercionError {
            field: field.to_string(),
            raw: raw.to_string(),
            expected: "number",
        }),
    }
}

/// Converts a field to an `i64`.
pub fn coerce_i64(state: &FormState, field: &str) -> Result<i64, CoercionError> {
    let raw = raw_value(state, field);
    raw.parse::<i64>().map_err(|_| CoercionError {
        field: field.to_string(),
        raw: raw.to_string(),
        expected: "whole number",
    })
}

//! Error types for the calculators.

use thiserror::Error;

/// Raised when a calculator input is negative, non-finite, or breaks a
/// precondition. A single invalid input invalidates the whole calculation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidInputError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field} is out of range: {reason}")]
    OutOfRange { field: &'static str, reason: String },

    /// A stamp duty bracket table that cannot be evaluated
    #[error("invalid stamp duty schedule: {0}")]
    InvalidSchedule(String),
}

/// Checks that `value` is finite and not negative.
pub fn ensure_non_negative(field: &'static str, value: f64) -> Result<f64, InvalidInputError> {
    if !value.is_finite() {
        return Err(InvalidInputError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(InvalidInputError::Negative { field, value });
    }
    Ok(value)
}

/// Checks that `value` is finite and strictly greater than zero.
pub fn ensure_positive(field: &'static str, value: f64) -> Result<f64, InvalidInputError> {
    let value = ensure_non_negative(field, value)?;
    if value == 0.0 {
        return Err(InvalidInputError::NotPositive { field });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative_accepts_zero() {
        assert_eq!(ensure_non_negative("principal", 0.0), Ok(0.0));
    }

    #[test]
    fn test_rejects_nan_and_infinity() {
        assert_eq!(
            ensure_non_negative("principal", f64::NAN),
            Err(InvalidInputError::NotFinite { field: "principal" })
        );
        assert_eq!(
            ensure_positive("value", f64::INFINITY),
            Err(InvalidInputError::NotFinite { field: "value" })
        );
    }

    #[test]
    fn test_rejects_negative_and_zero() {
        let err = ensure_non_negative("income", -1.0).unwrap_err();
        assert_eq!(err.to_string(), "income must not be negative (got -1)");
        assert_eq!(
            ensure_positive("value", 0.0),
            Err(InvalidInputError::NotPositive { field: "value" })
        );
    }
}

use thiserror::Error;

/// Rejections raised by the calculators before any projection runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} must be {requirement}, got {value}")]
    OutOfRange {
        field: &'static str,
        requirement: &'static str,
        value: f64,
    },
    #[error("{field} must be at least 1 year")]
    ZeroTerm { field: &'static str },
    #[error("{field} must be at most {max}, got {value}")]
    AboveLimit {
        field: &'static str,
        max: u32,
        value: u32,
    },
    #[error("retirement age {retirement_age} must be greater than current age {current_age}")]
    RetirementNotAfterCurrentAge {
        current_age: u32,
        retirement_age: u32,
    },
    #[error("unknown compounding frequency: {0}")]
    UnknownFrequency(String),
}

/// Failures reading or writing calculation snapshots.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("no calculation with id {0}")]
    NotFound(String),
}

pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64, CalcError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::NotFinite { field })
    }
}

pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<f64, CalcError> {
    ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(CalcError::OutOfRange {
            field,
            requirement: ">= 0",
            value,
        });
    }
    Ok(value)
}

/// Percent rates must stay above -100 so that `1 + rate / 100` remains positive.
pub(crate) fn ensure_growth_rate(field: &'static str, value: f64) -> Result<f64, CalcError> {
    ensure_finite(field, value)?;
    if value <= -100.0 {
        return Err(CalcError::OutOfRange {
            field,
            requirement: "> -100",
            value,
        });
    }
    Ok(value)
}

/// Caps the year counts that drive the projection loops and their allocations.
pub(crate) fn ensure_at_most(
    field: &'static str,
    value: u32,
    max: u32,
) -> Result<u32, CalcError> {
    if value > max {
        return Err(CalcError::AboveLimit { field, max, value });
    }
    Ok(value)
}

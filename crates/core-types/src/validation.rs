//! Predicates applied to operator input before it reaches the store.

use crate::error::CoreError;

/// Lowest accepted grade.
pub const MIN_GRADE: f64 = 0.0;
/// Highest accepted grade.
pub const MAX_GRADE: f64 = 100.0;

/// A name is valid when it is non-empty and every character is an ASCII
/// letter or whitespace.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c.is_ascii_whitespace())
}

pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(CoreError::InvalidName(name.to_string()))
    }
}

/// Checks a grade is finite and inside `[0, 100]`.
pub fn validate_grade(subject: &str, value: f64) -> Result<f64, CoreError> {
    if value.is_finite() && (MIN_GRADE..=MAX_GRADE).contains(&value) {
        Ok(value)
    } else {
        Err(CoreError::GradeOutOfRange {
            subject: subject.to_string(),
            value,
        })
    }
}

/// Parses operator text into a grade. Decimals are allowed.
pub fn parse_grade(subject: &str, input: &str) -> Result<f64, CoreError> {
    let trimmed = input.trim();
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| CoreError::InvalidNumber {
            field: format!("{subject} grade"),
            input: trimmed.to_string(),
        })?;
    validate_grade(subject, value)
}

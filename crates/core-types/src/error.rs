use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid name '{0}': use letters and spaces only")]
    InvalidName(String),

    #[error("{subject} grade {value} is outside the range 0 - 100")]
    GradeOutOfRange { subject: String, value: f64 },

    #[error("Invalid input for {field}: '{input}' is not a number")]
    InvalidNumber { field: String, input: String },

    #[error("Unknown performance tier label: {0}")]
    UnknownTier(String),
}

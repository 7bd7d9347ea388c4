//! # Gradebook Core Types
//!
//! Layer 0 of the workspace: the plain data structures and pure rules that
//! every other crate agrees on. Nothing in here performs I/O.
//!
//! - `StudentRecord`, `NewStudent`, `StudentUpdate`: the single entity and
//!   the two shapes of input used to create and modify it.
//! - `Scores`: the three subject grades, only constructible when in range.
//! - `Tier` and `grading::average`: the derived-field calculator.
//! - `validation`: the operator-input predicates (names, grades).

pub mod enums;
pub mod error;
pub mod grading;
pub mod student;
pub mod validation;

// Re-export the core types to provide a clean public API.
pub use enums::Tier;
pub use error::CoreError;
pub use student::{
    GradeColumns, NewStudent, Scores, StudentRecord, StudentUpdate, DEFAULT_SECTION,
    TIMESTAMP_FORMAT,
};

//! # Gradebook Database Crate
//!
//! The record store: the only code in the workspace that talks SQL.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** This crate encapsulates all database-specific logic and
//!   hands the rest of the application `StudentRecord`s and `GradeColumns`.
//! - **Runtime driver selection:** Uses sqlx's `Any` driver, so the same queries
//!   run against MySQL in production and SQLite (including `sqlite::memory:`)
//!   in tests.
//! - **One owned connection:** The repository owns a single `AnyConnection` for
//!   the whole session. There is no global connection state.
//!
//! ## Public API
//!
//! - `connect`: Bootstraps a connection from the configured candidate endpoints.
//! - `connect_url`: Connects to a single URL (used by tests and `--database-url`).
//! - `StudentRepository`: The CRUD and search operations over the `students` table.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, connect_url, ensure_schema, Bootstrapped, FailedAttempt};
pub use error::DbError;
pub use repository::{DeleteOutcome, StudentRepository, UpdateOutcome};

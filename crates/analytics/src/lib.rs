//! # Gradebook Analytics Engine
//!
//! Summary statistics over the grades currently held by the store.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of the
//!   database. The store hands it `GradeColumns`; it hands back a `GradeReport`.
//! - **Stateless Calculation:** Nothing is cached. Every dashboard request is
//!   computed from a fresh scan.
//!
//! ## Public API
//!
//! - `mean`, `max`, `min`, `tier_counts`: the aggregation primitives.
//! - `AnalyticsEngine`: builds a `GradeReport` from `GradeColumns`.
//! - `GradeReport`, `SubjectStats`, `TierCounts`: the report structures.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{max, mean, min, tier_counts, AnalyticsEngine};
pub use report::{GradeReport, SubjectStats, TierCounts};

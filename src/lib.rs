//! # Gradebook
//!
//! The console front end: command-line parsing, the interactive menu, table
//! rendering and logging setup. Storage lives in the `database` crate and the
//! statistics in `analytics`; this crate only wires them to a terminal.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod menu;
pub mod prompt;
pub mod render;

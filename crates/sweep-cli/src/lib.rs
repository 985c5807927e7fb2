//! Library side of the `sweep` command-line tool.
//!
//! The binary parses arguments and prints; everything it drives lives here so
//! integration tests can run the same code paths.

pub mod commands;
pub mod config;
pub mod logging;
pub mod summary;
pub mod types;

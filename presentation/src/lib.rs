//! Presentation layer for buildrig
//!
//! This crate contains CLI definitions, the live tool output sink
//! and report formatters.

pub mod cli;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{Cli, Command};
pub use output::console::ConsoleFormatter;
pub use output::formatter::ReportFormatter;
pub use output::sink::ConsoleOutput;

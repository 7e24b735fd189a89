//! Terminal output: live tool output and final reports.

pub mod console;
pub mod formatter;
pub mod sink;

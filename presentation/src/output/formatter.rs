//! Output formatter trait

use buildrig_domain::{OperationReport, OutputFormat};

/// Trait for formatting operation reports
pub trait ReportFormatter {
    /// Format the report for a terminal
    fn format(&self, report: &OperationReport) -> String;

    /// Format as JSON
    fn format_json(&self, report: &OperationReport) -> String;

    /// Format in the requested output format
    fn render(&self, report: &OperationReport, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => self.format(report),
            OutputFormat::Json => self.format_json(report),
        }
    }
}

//! Console output formatter for operation reports

use crate::output::formatter::ReportFormatter;
use buildrig_domain::config::config_key::ConfigKeyInfo;
use buildrig_domain::{OperationReport, OutputFormat, Severity, TestOutcome};
use colored::Colorize;
use std::path::Path;

/// Formats operation reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete report
    pub fn format(report: &OperationReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&report.operation));
        output.push('\n');

        if let Some(dependencies) = &report.dependencies {
            output.push_str(&Self::section_header(&format!(
                "Dependencies ({})",
                dependencies.len()
            )));
            let width = dependencies.iter().map(|(id, _)| id.len()).max().unwrap_or(0);
            for (id, version) in dependencies.iter() {
                output.push_str(&format!("  {:<width$}  {}\n", id, version, width = width));
            }
        }

        if let Some(tests) = &report.tests {
            output.push_str(&Self::section_header("Tests"));
            output.push_str(&format!(
                "  {} passed, {} failed, {} inconclusive in {:.2}s\n",
                tests.count(TestOutcome::Passed).to_string().green(),
                tests.count(TestOutcome::Failed).to_string().red(),
                tests.count(TestOutcome::Inconclusive).to_string().yellow(),
                tests.total_duration().as_secs_f64()
            ));
            for record in tests.failed() {
                output.push_str(&format!("\n  {} {}\n", "x".red().bold(), record.name.bold()));
                if !record.text.trim().is_empty() {
                    output.push_str(&Self::indent(record.text.trim_end(), "      "));
                    output.push('\n');
                }
            }
        }

        if !report.changed_files.is_empty() {
            output.push_str(&Self::section_header("Changed files"));
            for file in &report.changed_files {
                output.push_str(&format!("  * {}\n", file));
            }
        }

        if !report.diagnostics.is_empty() {
            output.push_str(&Self::section_header("Diagnostics"));
            for diagnostic in &report.diagnostics {
                let label = match diagnostic.severity {
                    Severity::Error => "error".red().bold(),
                    Severity::Warning => "warning".yellow().bold(),
                };
                output.push_str(&format!(
                    "  {}: {}: {}\n",
                    label,
                    diagnostic.source.cyan(),
                    diagnostic.message
                ));
            }
        }

        output.push_str(&Self::footer(report));
        output
    }

    /// Format as JSON, with the overall verdict included
    pub fn format_json(report: &OperationReport) -> String {
        let mut value = match serde_json::to_value(report) {
            Ok(value) => value,
            Err(_) => return "{}".to_string(),
        };
        if let Some(object) = value.as_object_mut() {
            object.insert("succeeded".to_string(), report.succeeded().into());
        }
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format a resolved tool path
    pub fn format_located(tool: &str, path: &Path, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => path.display().to_string(),
            OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
                "tool": tool,
                "path": path,
            }))
            .unwrap_or_else(|_| "{}".to_string()),
        }
    }

    /// Format the known configuration keys
    pub fn format_keys(keys: &[ConfigKeyInfo], format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => {
                let width = keys.iter().map(|k| k.key.len()).max().unwrap_or(0);
                let mut output = String::new();
                for info in keys {
                    output.push_str(&format!(
                        "{:<width$}  {}\n",
                        info.key.bold(),
                        info.description,
                        width = width
                    ));
                    let pad = " ".repeat(width + 2);
                    output.push_str(&format!("{}{} {}\n", pad, "env:".dimmed(), info.env_var()));
                    if !info.valid_values.is_empty() {
                        output.push_str(&format!(
                            "{}{} {}\n",
                            pad,
                            "values:".dimmed(),
                            info.valid_values.join(", ")
                        ));
                    }
                }
                output
            }
            OutputFormat::Json => {
                let entries: Vec<_> = keys
                    .iter()
                    .map(|info| {
                        serde_json::json!({
                            "key": info.key,
                            "description": info.description,
                            "env": info.env_var(),
                            "values": info.valid_values,
                        })
                    })
                    .collect();
                serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "[]".to_string())
            }
        }
    }

    /// Format configuration sources, effective values and detected issues
    pub fn format_config(sources: &[String], effective: &str, issues: &[(String, String)]) -> String {
        let mut output = String::new();
        for line in sources {
            output.push_str(line);
            output.push('\n');
        }
        output.push_str(&Self::section_header("Effective configuration"));
        output.push_str(effective.trim_end());
        output.push('\n');
        if !issues.is_empty() {
            output.push_str(&Self::section_header("Issues"));
            for (key, message) in issues {
                output.push_str(&format!("  {} {}: {}\n", "!".yellow().bold(), key, message));
            }
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer(report: &OperationReport) -> String {
        let verdict = if report.succeeded() {
            "succeeded".green().bold()
        } else {
            "failed".red().bold()
        };
        let exit = report
            .exit_code
            .map(|code| format!(" (exit code {})", code))
            .unwrap_or_default();
        format!(
            "\n{}\n{} {}{}\n",
            "=".repeat(60).cyan(),
            "Result:".bold(),
            verdict,
            exit
        )
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ReportFormatter for ConsoleFormatter {
    fn format(&self, report: &OperationReport) -> String {
        Self::format(report)
    }

    fn format_json(&self, report: &OperationReport) -> String {
        Self::format_json(report)
    }
}

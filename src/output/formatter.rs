//! Output formatters for execution results
//!
//! Provides table, JSON, CSV and one-line summary output.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::{ExecutionResults, UnitFailure, UnitId, UnitStatus};

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    JsonPretty,
    Csv,
    Summary,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "csv" => Some(OutputFormat::Csv),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }
}

/// One CSV line per unit
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    scope: &'static str,
    unit: String,
    status: String,
    throwable_type: &'a str,
    message: &'a str,
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Render a results snapshot in the configured format
    pub fn format_results(&self, results: &ExecutionResults) -> Result<String> {
        match self.format {
            OutputFormat::Table => Ok(self.format_table(results)),
            OutputFormat::Json => {
                serde_json::to_string(results).context("Failed to serialize results")
            }
            OutputFormat::JsonPretty => {
                serde_json::to_string_pretty(results).context("Failed to serialize results")
            }
            OutputFormat::Csv => self.format_csv(results),
            OutputFormat::Summary => Ok(self.format_summary(results)),
        }
    }

    fn status_label(&self, status: UnitStatus) -> String {
        let plain = format!("{} {}", status.symbol(), status);
        if !self.colorize {
            return plain;
        }
        let color = match status {
            UnitStatus::Succeeded => "32",
            UnitStatus::Failed => "31",
            UnitStatus::Aborted => "35",
            UnitStatus::Skipped => "33",
        };
        format!("\x1b[{color}m{plain}\x1b[0m")
    }

    fn failure_of<'a>(results: &'a ExecutionResults, unit_id: &UnitId) -> Option<&'a UnitFailure> {
        results
            .failures()
            .iter()
            .chain(results.aborted())
            .find(|f| &f.unit_id == unit_id)
    }

    fn skip_reason<'a>(results: &'a ExecutionResults, unit_id: &UnitId) -> Option<&'a str> {
        results
            .skipped()
            .iter()
            .find(|s| &s.unit_id == unit_id)
            .and_then(|s| s.reason.as_deref())
    }

    fn format_table(&self, results: &ExecutionResults) -> String {
        let mut output = String::new();

        output.push_str("\n╔══════════════════════════════════════════════════════════════╗\n");
        output.push_str("║  Execution Results                                           ║\n");
        output.push_str("╠══════════════════════════════════════════════════════════════╣\n");

        for outcome in results.outcomes() {
            output.push_str(&format!(
                "  {:14} {}\n",
                self.status_label(outcome.status),
                outcome.unit_id
            ));
            if let Some(failure) = Self::failure_of(results, &outcome.unit_id) {
                output.push_str(&format!("      {}\n", failure.throwable));
                for cause in failure.throwable.chain().skip(1) {
                    output.push_str(&format!("      caused by {cause}\n"));
                }
            }
            if let Some(reason) = Self::skip_reason(results, &outcome.unit_id) {
                output.push_str(&format!("      {reason}\n"));
            }
        }

        for failure in results.container_failures() {
            output.push_str(&format!(
                "  {:14} {}\n      {}\n",
                self.status_label(UnitStatus::Failed),
                failure.unit_id,
                failure.throwable
            ));
        }

        output.push_str("╠══════════════════════════════════════════════════════════════╣\n");
        output.push_str(&format!(
            "║  Started: {:3} | Succeeded: {:3} | Failed: {:3} | Aborted: {:3} | Skipped: {:3}\n",
            results.number_of_started_tests(),
            results.number_of_succeeded_tests(),
            results.number_of_failed_tests(),
            results.number_of_aborted_tests(),
            results.number_of_skipped_tests()
        ));
        output.push_str(&format!(
            "║  Containers: {:3} started | {:3} failed | Report entries: {:3}\n",
            results.number_of_started_containers(),
            results.number_of_failed_containers(),
            results.number_of_report_entries()
        ));
        output.push_str("╚══════════════════════════════════════════════════════════════╝\n");

        output
    }

    fn format_csv(&self, results: &ExecutionResults) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        for outcome in results.outcomes() {
            let failure = Self::failure_of(results, &outcome.unit_id);
            let message = match failure {
                Some(f) => f.throwable.message().unwrap_or(""),
                None => Self::skip_reason(results, &outcome.unit_id).unwrap_or(""),
            };
            writer.serialize(CsvRow {
                scope: "test",
                unit: outcome.unit_id.to_string(),
                status: outcome.status.to_string(),
                throwable_type: failure.map(|f| f.throwable.type_name.as_str()).unwrap_or(""),
                message,
            })?;
        }

        for failure in results.container_failures() {
            writer.serialize(CsvRow {
                scope: "container",
                unit: failure.unit_id.to_string(),
                status: UnitStatus::Failed.to_string(),
                throwable_type: &failure.throwable.type_name,
                message: failure.throwable.message().unwrap_or(""),
            })?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))?;
        String::from_utf8(bytes).context("CSV output is not valid UTF-8")
    }

    fn format_summary(&self, results: &ExecutionResults) -> String {
        let verdict = if results.is_all_succeeded() {
            "PASSED"
        } else {
            "FAILED"
        };
        format!(
            "{}: {} started, {} succeeded, {} failed, {} aborted, {} skipped ({} containers, {} failed)",
            verdict,
            results.number_of_started_tests(),
            results.number_of_succeeded_tests(),
            results.number_of_failed_tests(),
            results.number_of_aborted_tests(),
            results.number_of_skipped_tests(),
            results.number_of_started_containers(),
            results.number_of_failed_containers()
        )
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Table)
    }
}

/// Write results to a file without colors
pub fn write_results_to_file(
    path: impl AsRef<Path>,
    results: &ExecutionResults,
    format: OutputFormat,
) -> Result<()> {
    let path = path.as_ref();
    let content = ResultFormatter::new(format).no_color().format_results(results)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write results: {}", path.display()))?;
    Ok(())
}

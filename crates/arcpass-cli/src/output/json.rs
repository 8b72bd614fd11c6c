//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::Operation;
use super::formatter::OutputFormatter;
use super::formatter::RunPlan;
use anyhow::Result;
use arcpass_core::ArchiveReport;
use arcpass_core::ArchiveStatus;
use arcpass_core::RunReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};

/// Emits a single document once the run is over.
pub struct JsonFormatter;

#[derive(Debug, Serialize)]
struct RunOutput {
    archives: Vec<ArchiveOutput>,
    found: usize,
    not_found: usize,
    failed: usize,
    duration_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    result_log: Option<String>,
    warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ArchiveOutput {
    path: String,
    format: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    layout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    attempts: usize,
    duration_ms: u128,
}

impl From<&ArchiveReport> for ArchiveOutput {
    fn from(report: &ArchiveReport) -> Self {
        let mut out = Self {
            path: report.target.path().display().to_string(),
            format: report.target.format().to_string(),
            status: "",
            password: report.password().map(str::to_string),
            destination: None,
            layout: None,
            detail: None,
            attempts: report.attempts,
            duration_ms: report.duration.as_millis(),
        };

        match &report.status {
            ArchiveStatus::Found { .. } => out.status = "found",
            ArchiveStatus::Extracted {
                destination,
                layout,
                ..
            } => {
                out.status = "extracted";
                out.destination = Some(destination.display().to_string());
                out.layout = Some(layout.to_string());
            }
            ArchiveStatus::NotFound { last_failure } => {
                out.status = "not_found";
                out.detail.clone_from(last_failure);
            }
            ArchiveStatus::Failed { detail } => {
                out.status = "failed";
                out.detail = Some(detail.clone());
            }
        }
        out
    }
}

impl From<&RunReport> for RunOutput {
    fn from(report: &RunReport) -> Self {
        Self {
            archives: report.archives.iter().map(ArchiveOutput::from).collect(),
            found: report.found_count(),
            not_found: report.not_found_count(),
            failed: report.failed_count(),
            duration_ms: report.duration.as_millis(),
            result_log: report
                .result_log
                .as_ref()
                .map(|p| p.display().to_string()),
            warnings: report.warnings.clone(),
        }
    }
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_plan(&self, _plan: &RunPlan<'_>) {}

    fn format_archive_result(&self, _report: &ArchiveReport, _current: usize, _total: usize) {}

    fn format_run_report(&self, operation: Operation, report: &RunReport) -> Result<()> {
        let output = JsonOutput::success(operation.as_str(), RunOutput::from(report));
        Self::output(&output)
    }

    fn format_error(&self, operation: &str, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error(operation, format!("{error:#}"));
        let _ = Self::output(&output);
    }
}

//! Output formatter trait for CLI results.

use anyhow::Result;
use arcpass_core::ArchiveReport;
use arcpass_core::RunReport;
use serde::Serialize;
use std::path::Path;

/// Which workflow produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Match,
    Extract,
}

impl Operation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Extract => "extract",
        }
    }
}

/// What a run is about to do.
#[derive(Debug)]
pub struct RunPlan<'a> {
    pub operation: Operation,
    pub archives: usize,
    pub passwords: usize,
    pub mode: String,
    pub oracle: &'a Path,
    pub result_log: Option<&'a Path>,
}

/// Common output formatter trait
pub trait OutputFormatter {
    /// Task summary, before any archive is processed
    fn format_plan(&self, plan: &RunPlan<'_>);

    /// Terminal line for one archive, as soon as it is done
    fn format_archive_result(&self, report: &ArchiveReport, current: usize, total: usize);

    /// Overall verdict once every archive is done
    fn format_run_report(&self, operation: Operation, report: &RunReport) -> Result<()>;

    /// Fatal error that stopped the run
    fn format_error(&self, operation: &str, error: &anyhow::Error);
}

/// Fixed-width `[003/010]` position marker.
pub fn counter(current: usize, total: usize) -> String {
    format!("[{current:03}/{total:03}]")
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> JsonOutput<()> {
        JsonOutput {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_padding() {
        assert_eq!(counter(3, 10), "[003/010]");
        assert_eq!(counter(1, 1), "[001/001]");
        assert_eq!(counter(1234, 2000), "[1234/2000]");
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(Operation::Match.as_str(), "match");
        assert_eq!(Operation::Extract.as_str(), "extract");
    }
}

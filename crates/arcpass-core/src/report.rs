//! Per-archive and per-run reporting.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use crate::ArchiveTarget;
use crate::planner::ResolvedLayout;

/// Terminal state of one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveStatus {
    /// A password unlocked the archive.
    Found {
        /// The discovered password.
        password: String,
    },

    /// A password unlocked the archive and extraction succeeded.
    Extracted {
        /// The discovered password.
        password: String,
        /// Where the contents were written.
        destination: PathBuf,
        /// How the destination was chosen.
        layout: ResolvedLayout,
    },

    /// Every candidate was tried without success.
    NotFound {
        /// Detail of the last extraction failure, if any candidate got that
        /// far.
        last_failure: Option<String>,
    },

    /// Processing stopped early because the archive tool failed.
    Failed {
        /// Diagnostic detail.
        detail: String,
    },
}

/// Result of processing one archive.
#[derive(Debug, Clone)]
pub struct ArchiveReport {
    /// The archive processed.
    pub target: ArchiveTarget,

    /// Terminal state.
    pub status: ArchiveStatus,

    /// Number of candidates tried.
    pub attempts: usize,

    /// Time spent on this archive.
    pub duration: Duration,
}

impl ArchiveReport {
    /// The discovered password, if any.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        match &self.status {
            ArchiveStatus::Found { password } | ArchiveStatus::Extracted { password, .. } => {
                Some(password)
            }
            _ => None,
        }
    }

    /// Returns `true` if a password was found.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.password().is_some()
    }

    /// Extraction destination, for extracted archives.
    #[must_use]
    pub fn destination(&self) -> Option<&Path> {
        match &self.status {
            ArchiveStatus::Extracted { destination, .. } => Some(destination),
            _ => None,
        }
    }
}

/// Summary of a whole run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// One report per archive, in processing order.
    pub archives: Vec<ArchiveReport>,

    /// Total run time.
    pub duration: Duration,

    /// Result log file, if one was written.
    pub result_log: Option<PathBuf>,

    /// Non-fatal problems (e.g. result log write failures).
    pub warnings: Vec<String>,
}

impl RunReport {
    /// Creates a new empty run report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    /// Number of archives with a discovered password.
    #[must_use]
    pub fn found_count(&self) -> usize {
        self.archives.iter().filter(|a| a.is_success()).count()
    }

    /// Number of archives whose candidates were exhausted.
    #[must_use]
    pub fn not_found_count(&self) -> usize {
        self.archives
            .iter()
            .filter(|a| matches!(a.status, ArchiveStatus::NotFound { .. }))
            .count()
    }

    /// Number of archives aborted by a tool failure.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.archives
            .iter()
            .filter(|a| matches!(a.status, ArchiveStatus::Failed { .. }))
            .count()
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Callback trait for progress reporting during a run.
///
/// # Examples
///
/// ```
/// use arcpass_core::ArchiveReport;
/// use arcpass_core::ArchiveTarget;
/// use arcpass_core::ProgressCallback;
/// use arcpass_core::RunReport;
///
/// struct SimpleProgress;
///
/// impl ProgressCallback for SimpleProgress {
///     fn on_archive_start(&mut self, target: &ArchiveTarget, current: usize, total: usize) {
///         println!("[{current}/{total}] {}", target.file_name());
///     }
///
///     fn on_candidate(&mut self, _password: &str, _current: usize, _total: usize) {}
///
///     fn on_archive_complete(&mut self, report: &ArchiveReport, _current: usize, _total: usize) {
///         println!("  -> {:?}", report.password());
///     }
///
///     fn on_complete(&mut self, report: &RunReport) {
///         println!("{} found", report.found_count());
///     }
/// }
/// ```
pub trait ProgressCallback {
    /// Called before an archive is processed.
    ///
    /// * `current` - 1-indexed archive number
    /// * `total` - number of archives in the run
    fn on_archive_start(&mut self, target: &ArchiveTarget, current: usize, total: usize);

    /// Called before each candidate is tried on the current archive.
    ///
    /// * `current` - 1-indexed candidate number
    /// * `total` - number of candidates
    fn on_candidate(&mut self, password: &str, current: usize, total: usize);

    /// Called once per archive with its terminal state.
    fn on_archive_complete(&mut self, report: &ArchiveReport, current: usize, total: usize);

    /// Called when the entire run is complete.
    fn on_complete(&mut self, report: &RunReport);
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_archive_start(&mut self, _target: &ArchiveTarget, _current: usize, _total: usize) {}

    fn on_candidate(&mut self, _password: &str, _current: usize, _total: usize) {}

    fn on_archive_complete(&mut self, _report: &ArchiveReport, _current: usize, _total: usize) {}

    fn on_complete(&mut self, _report: &RunReport) {}
}

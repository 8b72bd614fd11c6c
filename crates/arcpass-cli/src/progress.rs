//! Live progress line for CLI runs.

use crate::output::OutputFormatter;
use crate::output::counter;
use arcpass_core::ArchiveReport;
use arcpass_core::ArchiveTarget;
use arcpass_core::ProgressCallback;
use arcpass_core::RunReport;
use console::Term;
use console::truncate_str;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use std::time::Duration;

/// CLI spinner implementing `ProgressCallback`.
///
/// Shows `[003/010] name trying: <password>` while an archive is being
/// worked on and hands each finished archive to the formatter, so its
/// terminal line is printed above the spinner. Automatically cleans up on
/// drop.
pub struct CliProgress<'a> {
    bar: ProgressBar,
    formatter: &'a dyn OutputFormatter,
    label: String,
}

impl<'a> CliProgress<'a> {
    /// Creates the progress display; `show_spinner` false keeps only the
    /// per-archive lines.
    #[must_use]
    pub fn new(formatter: &'a dyn OutputFormatter, show_spinner: bool) -> Self {
        let bar = if show_spinner {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {wide_msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        } else {
            ProgressBar::hidden()
        };

        Self {
            bar,
            formatter,
            label: String::new(),
        }
    }

    /// Checks if we should show the spinner (TTY detection).
    #[must_use]
    pub fn should_show(quiet: bool, json: bool) -> bool {
        !quiet && !json && Term::stderr().is_term()
    }
}

impl Drop for CliProgress<'_> {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for CliProgress<'_> {
    fn on_archive_start(&mut self, target: &ArchiveTarget, current: usize, total: usize) {
        self.label = format!(
            "{} {}",
            counter(current, total),
            truncate_str(target.file_name(), 40, "...")
        );
        self.bar.set_message(self.label.clone());
    }

    fn on_candidate(&mut self, password: &str, _current: usize, _total: usize) {
        self.bar
            .set_message(format!("{} trying: {password}", self.label));
    }

    fn on_archive_complete(&mut self, report: &ArchiveReport, current: usize, total: usize) {
        let formatter = self.formatter;
        self.bar
            .suspend(|| formatter.format_archive_result(report, current, total));
    }

    fn on_complete(&mut self, _report: &RunReport) {
        self.bar.finish_and_clear();
    }
}

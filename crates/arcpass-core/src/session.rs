//! Run orchestration.
//!
//! A [`Session`] processes archives strictly one after another. Each archive
//! ends in exactly one [`ArchiveStatus`]; per-archive failures are recorded
//! and the run moves on.

use std::path::Path;
use std::time::Instant;
use tracing::info;
use tracing::warn;

use crate::ArchiveTarget;
use crate::PasswordSet;
use crate::TrialConfig;
use crate::engine::SearchOutcome;
use crate::engine::TrialEngine;
use crate::engine::TrialMode;
use crate::oracle::OracleClient;
use crate::oracle::Oracles;
use crate::planner::ExtractionMode;
use crate::planner::ExtractionOutcome;
use crate::planner::ExtractionPlanner;
use crate::report::ArchiveReport;
use crate::report::ArchiveStatus;
use crate::report::ProgressCallback;
use crate::report::RunReport;
use crate::result_log::ResultLog;

/// Oracle backends, timing, and result log for one run.
///
/// # Examples
///
/// ```
/// use arcpass_core::ArchiveTarget;
/// use arcpass_core::NoopProgress;
/// use arcpass_core::Oracles;
/// use arcpass_core::PasswordSet;
/// use arcpass_core::Session;
/// use arcpass_core::TrialConfig;
/// use arcpass_core::TrialMode;
/// use arcpass_core::formats::Backend;
/// use arcpass_core::test_utils::ScriptedOracle;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let oracle = ScriptedOracle::new().with_password("hunter2");
/// let oracles = Oracles::new().with(Backend::SevenZip, &oracle);
/// let mut session = Session::new(oracles, TrialConfig::default());
///
/// let targets = [ArchiveTarget::new("/data/secret.zip")?];
/// let passwords = PasswordSet::from_lines(["123456", "hunter2"]);
/// let report = session.match_archives(&targets, &passwords, TrialMode::Accurate, &mut NoopProgress);
///
/// assert_eq!(report.found_count(), 1);
/// assert_eq!(report.archives[0].password(), Some("hunter2"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Session<'a> {
    oracles: Oracles<'a>,
    config: TrialConfig,
    log: Option<ResultLog>,
}

impl<'a> Session<'a> {
    /// Creates a session without a result log.
    #[must_use]
    pub fn new(oracles: Oracles<'a>, config: TrialConfig) -> Self {
        Self {
            oracles,
            config,
            log: None,
        }
    }

    /// Records every discovered password in `log`.
    #[must_use]
    pub fn with_result_log(mut self, log: ResultLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Path of the result log, if one is attached.
    #[must_use]
    pub fn result_log_path(&self) -> Option<&Path> {
        self.log.as_ref().map(ResultLog::path)
    }

    /// Searches each archive for its password without extracting.
    pub fn match_archives(
        &mut self,
        targets: &[ArchiveTarget],
        passwords: &PasswordSet,
        mode: TrialMode,
        progress: &mut dyn ProgressCallback,
    ) -> RunReport {
        info!(archives = targets.len(), passwords = passwords.len(), %mode, "matching");
        let engine = TrialEngine::new(self.config);

        self.run(targets, progress, |oracles, target, progress| {
            let oracle = match oracles.for_target(target) {
                Ok(oracle) => oracle,
                Err(e) => return (failed(e.into_detail()), 0),
            };
            let client = OracleClient::new(oracle, target);
            let outcome = engine.find_password(&client, passwords, mode, progress);
            let attempts = outcome.attempts();
            let status = match outcome {
                SearchOutcome::Found { password, .. } => ArchiveStatus::Found { password },
                SearchOutcome::Exhausted { .. } => ArchiveStatus::NotFound { last_failure: None },
                SearchOutcome::Aborted { detail, .. } => failed(detail),
            };
            (status, attempts)
        })
    }

    /// Finds each archive's password and extracts it under `mode`.
    pub fn extract_archives(
        &mut self,
        targets: &[ArchiveTarget],
        passwords: &PasswordSet,
        mode: ExtractionMode,
        progress: &mut dyn ProgressCallback,
    ) -> RunReport {
        info!(archives = targets.len(), passwords = passwords.len(), %mode, "extracting");
        let planner = ExtractionPlanner::new(mode, self.config);

        self.run(targets, progress, |oracles, target, progress| {
            let oracle = match oracles.for_target(target) {
                Ok(oracle) => oracle,
                Err(e) => return (failed(e.into_detail()), 0),
            };
            let client = OracleClient::new(oracle, target);
            let outcome = planner.extract(&client, passwords, progress);
            let attempts = outcome.attempts();
            let status = match outcome {
                ExtractionOutcome::Extracted {
                    password,
                    destination,
                    layout,
                    ..
                } => ArchiveStatus::Extracted {
                    password,
                    destination,
                    layout,
                },
                ExtractionOutcome::Exhausted { last_failure, .. } => {
                    ArchiveStatus::NotFound { last_failure }
                }
                ExtractionOutcome::Aborted { detail, .. } => failed(detail),
            };
            (status, attempts)
        })
    }

    fn run<F>(
        &mut self,
        targets: &[ArchiveTarget],
        progress: &mut dyn ProgressCallback,
        mut process: F,
    ) -> RunReport
    where
        F: FnMut(&Oracles<'a>, &ArchiveTarget, &mut dyn ProgressCallback) -> (ArchiveStatus, usize),
    {
        let started = Instant::now();
        let total = targets.len();
        let mut report = RunReport::new();

        for (idx, target) in targets.iter().enumerate() {
            let current = idx + 1;
            progress.on_archive_start(target, current, total);

            let archive_started = Instant::now();
            let (status, attempts) = process(&self.oracles, target, progress);
            let archive = ArchiveReport {
                target: target.clone(),
                status,
                attempts,
                duration: archive_started.elapsed(),
            };

            if let Some(password) = archive.password() {
                self.record(&mut report, target.path(), password);
            }

            progress.on_archive_complete(&archive, current, total);
            report.archives.push(archive);
        }

        report.duration = started.elapsed();
        report.result_log = self.result_log_path().map(Path::to_path_buf);
        progress.on_complete(&report);
        report
    }

    fn record(&mut self, report: &mut RunReport, archive: &Path, password: &str) {
        let Some(log) = self.log.as_mut() else {
            return;
        };
        if let Err(e) = log.record(archive, password) {
            warn!(
                log = %log.path().display(),
                "failed to write result log: {e}"
            );
            report.add_warning(format!(
                "could not record result for {} in {}: {e}",
                archive.display(),
                log.path().display()
            ));
        }
    }
}

const fn failed(detail: String) -> ArchiveStatus {
    ArchiveStatus::Failed { detail }
}

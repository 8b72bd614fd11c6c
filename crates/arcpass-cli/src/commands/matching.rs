//! Match command implementation.

use crate::cli::MatchArgs;
use crate::output::Operation;
use crate::output::OutputFormatter;
use crate::output::RunPlan;
use crate::progress::CliProgress;
use anyhow::Result;
use arcpass_core::ResultLog;
use arcpass_core::TrialConfig;
use arcpass_core::TrialMode;
use std::time::Duration;

pub fn execute(args: &MatchArgs, formatter: &dyn OutputFormatter, show_progress: bool) -> Result<()> {
    let trial = TrialConfig::default().with_quick_budget(Duration::from_millis(args.quick_timeout_ms));
    let mode = TrialMode::from(args.mode);
    let prepared = super::prepare(&args.run)?;

    formatter.format_plan(&RunPlan {
        operation: Operation::Match,
        archives: prepared.targets.len(),
        passwords: prepared.passwords.len(),
        mode: mode.to_string(),
        oracle: prepared.oracle.executable(),
        result_log: prepared.log.as_ref().map(ResultLog::path),
    });

    let mut session = super::open_session(&prepared.oracle, trial, prepared.log)?;
    let report = {
        let mut progress = CliProgress::new(formatter, show_progress);
        session.match_archives(&prepared.targets, &prepared.passwords, mode, &mut progress)
    };

    formatter.format_run_report(Operation::Match, &report)
}

//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::output::Operation;
use crate::output::OutputFormatter;
use crate::output::RunPlan;
use crate::progress::CliProgress;
use anyhow::Result;
use arcpass_core::ExtractionMode;
use arcpass_core::ResultLog;
use arcpass_core::TrialConfig;

pub fn execute(args: &ExtractArgs, formatter: &dyn OutputFormatter, show_progress: bool) -> Result<()> {
    let mode = ExtractionMode::from(args.layout);
    let prepared = super::prepare(&args.run)?;

    formatter.format_plan(&RunPlan {
        operation: Operation::Extract,
        archives: prepared.targets.len(),
        passwords: prepared.passwords.len(),
        mode: mode.to_string(),
        oracle: prepared.oracle.executable(),
        result_log: prepared.log.as_ref().map(ResultLog::path),
    });

    let mut session = super::open_session(&prepared.oracle, TrialConfig::default(), prepared.log)?;
    let report = {
        let mut progress = CliProgress::new(formatter, show_progress);
        session.extract_archives(&prepared.targets, &prepared.passwords, mode, &mut progress)
    };

    formatter.format_run_report(Operation::Extract, &report)
}

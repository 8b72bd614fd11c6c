//! Subcommand implementations.

pub mod completion;
pub mod extract;
pub mod matching;

use crate::cli::RunArgs;
use crate::error::add_hint;
use anyhow::Context;
use anyhow::Result;
use arcpass_core::ArchiveTarget;
use arcpass_core::OracleConfig;
use arcpass_core::Oracles;
use arcpass_core::PasswordSet;
use arcpass_core::ResultLog;
use arcpass_core::ScanOptions;
use arcpass_core::Session;
use arcpass_core::TrialConfig;
use arcpass_core::scan_archives;
use std::env;
use tracing::debug;

/// Everything a run needs, resolved before the first archive is touched.
pub struct Prepared {
    pub oracle: OracleConfig,
    pub passwords: PasswordSet,
    pub targets: Vec<ArchiveTarget>,
    pub log: Option<ResultLog>,
}

/// Resolves the archive tool, candidates, archives, and result log.
///
/// Failures here are fatal: no archive is attempted.
pub fn prepare(args: &RunArgs) -> Result<Prepared> {
    let oracle = add_hint(match &args.oracle {
        Some(path) => OracleConfig::with_path(path),
        None => OracleConfig::discover(),
    })?;

    let passwords = add_hint(PasswordSet::load(&args.passwords))?;

    let root = match &args.path {
        Some(path) => path.clone(),
        None => env::current_dir().context("failed to get current directory")?,
    };
    let options = ScanOptions::default()
        .with_recursive(args.recursive)
        .with_exclude_extracted(args.exclude_extracted);
    let targets = add_hint(scan_archives(&root, &options))?;
    debug!(
        root = %root.display(),
        archives = targets.len(),
        passwords = passwords.len(),
        "run prepared"
    );

    let log = if args.no_result_log {
        None
    } else {
        let log = ResultLog::create(&args.result_dir).with_context(|| {
            format!(
                "failed to create result log in '{}'",
                args.result_dir.display()
            )
        })?;
        Some(log)
    };

    Ok(Prepared {
        oracle,
        passwords,
        targets,
        log,
    })
}

/// Builds a session driving the resolved `7z` executable.
pub fn open_session(
    oracle: &OracleConfig,
    trial: TrialConfig,
    log: Option<ResultLog>,
) -> Result<Session<'static>> {
    let oracles = Oracles::sevenzip(oracle, &trial).context("failed to start archive tool adapter")?;
    let session = Session::new(oracles, trial);
    Ok(match log {
        Some(log) => session.with_result_log(log),
        None => session,
    })
}

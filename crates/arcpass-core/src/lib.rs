//! Password discovery and extraction planning for encrypted archives.
//!
//! `arcpass-core` tries a list of candidate passwords against encrypted
//! `.zip`, `.rar`, and `.7z` archives by driving an external archive tool
//! (`7z`), and can extract each archive once its password is known, picking
//! the destination directory from the archive's contents.
//!
//! # Examples
//!
//! ```no_run
//! use arcpass_core::NoopProgress;
//! use arcpass_core::OracleConfig;
//! use arcpass_core::Oracles;
//! use arcpass_core::PasswordSet;
//! use arcpass_core::ScanOptions;
//! use arcpass_core::Session;
//! use arcpass_core::TrialConfig;
//! use arcpass_core::TrialMode;
//! use arcpass_core::scan_archives;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let trial = TrialConfig::default();
//! let oracles = Oracles::sevenzip(&OracleConfig::discover()?, &trial)?;
//! let passwords = PasswordSet::load("passwords.txt")?;
//! let targets = scan_archives("downloads", &ScanOptions::default())?;
//!
//! let mut session = Session::new(oracles, trial);
//! let report = session.match_archives(&targets, &passwords, TrialMode::Quick, &mut NoopProgress);
//! println!("{} of {} unlocked", report.found_count(), report.archives.len());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod engine;
pub mod error;
pub mod formats;
pub mod locator;
pub mod oracle;
pub mod password;
pub mod planner;
pub mod report;
pub mod result_log;
pub mod session;
pub mod target;
#[doc(hidden)]
pub mod test_utils;

pub use config::OracleConfig;
pub use config::TrialConfig;
pub use engine::SearchOutcome;
pub use engine::TrialEngine;
pub use engine::TrialMode;
pub use engine::TrialOutcome;
pub use error::Error;
pub use error::Result;
pub use formats::ArchiveFormat;
pub use locator::ScanOptions;
pub use locator::scan_archives;
pub use oracle::ArchiveOracle;
pub use oracle::OracleClient;
pub use oracle::Oracles;
pub use password::PasswordSet;
pub use planner::ExtractionMode;
pub use planner::ExtractionOutcome;
pub use planner::ExtractionPlanner;
pub use planner::ResolvedLayout;
pub use report::ArchiveReport;
pub use report::ArchiveStatus;
pub use report::NoopProgress;
pub use report::ProgressCallback;
pub use report::RunReport;
pub use result_log::ResultLog;
pub use session::Session;
pub use target::ArchiveTarget;

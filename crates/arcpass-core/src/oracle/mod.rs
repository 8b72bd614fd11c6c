//! Archive tool abstraction.
//!
//! An *oracle* is the external tool that can test, list, and extract an
//! encrypted archive. [`ArchiveOracle`] is the capability interface, with
//! one adapter per tool family ([`SevenZipCli`]). [`Oracles`] maps each
//! [`Backend`] to its adapter and [`OracleClient`] binds an adapter to one
//! archive.

mod client;
pub mod listing;
pub mod sevenzip;

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub use client::OracleClient;
pub use sevenzip::SevenZipCli;

use crate::ArchiveTarget;
use crate::Error;
use crate::Result;
use crate::formats::Backend;

/// Raw result of an integrity test, before trial-mode interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStatus {
    /// The tool finished and reported success.
    Accepted,
    /// The tool finished with a failure status.
    Rejected,
    /// The time budget elapsed and the invocation was cancelled.
    TimedOut,
}

/// Operations an archive tool adapter provides.
///
/// Every call runs one tool invocation that does not outlive the call.
pub trait ArchiveOracle {
    /// Tests the archive with `password`, giving up after `budget`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OracleFailure`] if the tool cannot be run.
    fn test(&self, target: &ArchiveTarget, password: &str, budget: Duration) -> Result<TestStatus>;

    /// Lists the names of entries directly under the archive root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WrongPassword`] if the tool rejects the password and
    /// [`Error::OracleFailure`] for any other failure.
    fn list_root_entries(&self, target: &ArchiveTarget, password: &str) -> Result<Vec<String>>;

    /// Extracts the archive into `destination`, overwriting existing files.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExtractionFailed`] if the tool reports failure and
    /// [`Error::OracleFailure`] if it cannot be run at all.
    fn extract(&self, target: &ArchiveTarget, password: &str, destination: &Path) -> Result<()>;

    /// Short adapter name for diagnostics.
    fn name(&self) -> &'static str;
}

impl<T: ArchiveOracle + ?Sized> ArchiveOracle for &T {
    fn test(&self, target: &ArchiveTarget, password: &str, budget: Duration) -> Result<TestStatus> {
        (**self).test(target, password, budget)
    }

    fn list_root_entries(&self, target: &ArchiveTarget, password: &str) -> Result<Vec<String>> {
        (**self).list_root_entries(target, password)
    }

    fn extract(&self, target: &ArchiveTarget, password: &str, destination: &Path) -> Result<()> {
        (**self).extract(target, password, destination)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Backend-to-adapter mapping.
///
/// # Examples
///
/// ```no_run
/// use arcpass_core::OracleConfig;
/// use arcpass_core::Oracles;
/// use arcpass_core::TrialConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let oracles = Oracles::sevenzip(&OracleConfig::discover()?, &TrialConfig::default())?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct Oracles<'a> {
    adapters: HashMap<Backend, Box<dyn ArchiveOracle + 'a>>,
}

impl<'a> Oracles<'a> {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapping with the `7z` adapter registered for its backend.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the adapter runtime cannot be created.
    pub fn sevenzip(config: &crate::OracleConfig, trial: &crate::TrialConfig) -> Result<Self> {
        Ok(Self::new().with(Backend::SevenZip, SevenZipCli::new(config, trial)?))
    }

    /// Registers `adapter` for `backend`, replacing any previous one.
    #[must_use]
    pub fn with(mut self, backend: Backend, adapter: impl ArchiveOracle + 'a) -> Self {
        self.adapters.insert(backend, Box::new(adapter));
        self
    }

    /// Returns the adapter servicing `target`'s format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OracleFailure`] if no adapter is registered.
    pub fn for_target(&self, target: &ArchiveTarget) -> Result<&dyn ArchiveOracle> {
        let backend = target.format().backend();
        self.adapters
            .get(&backend)
            .map(|adapter| &**adapter as &dyn ArchiveOracle)
            .ok_or_else(|| Error::oracle(format!("no archive tool registered for {backend:?}")))
    }
}

impl std::fmt::Debug for Oracles<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.adapters.values().map(|a| a.name()).collect();
        names.sort_unstable();
        f.debug_struct("Oracles").field("adapters", &names).finish()
    }
}

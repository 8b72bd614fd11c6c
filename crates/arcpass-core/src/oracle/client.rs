use std::path::Path;
use std::time::Duration;
use tracing::debug;

use super::ArchiveOracle;
use super::TestStatus;
use crate::ArchiveTarget;
use crate::Result;

/// An adapter bound to a single archive.
#[derive(Clone, Copy)]
pub struct OracleClient<'a> {
    oracle: &'a dyn ArchiveOracle,
    target: &'a ArchiveTarget,
}

impl<'a> OracleClient<'a> {
    /// Binds `oracle` to `target`.
    #[must_use]
    pub fn new(oracle: &'a dyn ArchiveOracle, target: &'a ArchiveTarget) -> Self {
        Self { oracle, target }
    }

    /// The archive this client operates on.
    #[must_use]
    pub const fn target(&self) -> &'a ArchiveTarget {
        self.target
    }

    /// Integrity test with `password`, bounded by `budget`.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::Error::OracleFailure`] from the adapter.
    pub fn test(&self, password: &str, budget: Duration) -> Result<TestStatus> {
        let status = self.oracle.test(self.target, password, budget)?;
        debug!(
            archive = %self.target.file_name(),
            oracle = self.oracle.name(),
            ?status,
            "test finished"
        );
        Ok(status)
    }

    /// Root entry names readable with `password`.
    ///
    /// # Errors
    ///
    /// [`crate::Error::WrongPassword`] or [`crate::Error::OracleFailure`].
    pub fn list_root_entries(&self, password: &str) -> Result<Vec<String>> {
        self.oracle.list_root_entries(self.target, password)
    }

    /// Extracts into `destination`, made absolute first.
    ///
    /// # Errors
    ///
    /// [`crate::Error::ExtractionFailed`], [`crate::Error::OracleFailure`],
    /// or [`crate::Error::Io`] if the destination cannot be made absolute.
    pub fn extract(&self, password: &str, destination: &Path) -> Result<()> {
        let destination = std::path::absolute(destination)?;
        debug!(
            archive = %self.target.file_name(),
            destination = %destination.display(),
            "extracting"
        );
        self.oracle.extract(self.target, password, &destination)
    }
}

impl std::fmt::Debug for OracleClient<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleClient")
            .field("oracle", &self.oracle.name())
            .field("target", &self.target.path())
            .finish()
    }
}

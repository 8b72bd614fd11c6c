//! Test utilities: an in-memory archive tool.
//!
//! [`ScriptedOracle`] answers tests, listings, and extractions from a fixed
//! script and records every call, so trial and planning logic can be
//! exercised without spawning processes.

use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use crate::ArchiveTarget;
use crate::Error;
use crate::Result;
use crate::oracle::ArchiveOracle;
use crate::oracle::TestStatus;

/// One recorded call on a [`ScriptedOracle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleCall {
    /// `test` with the given password and budget.
    Test {
        /// Candidate.
        password: String,
        /// Budget passed in.
        budget: Duration,
    },
    /// `list_root_entries` with the given password.
    List {
        /// Candidate.
        password: String,
    },
    /// `extract` with the given password and destination.
    Extract {
        /// Candidate.
        password: String,
        /// Destination passed in.
        destination: PathBuf,
    },
}

/// Deterministic archive tool double.
///
/// By default every password is rejected and the archive lists no entries.
/// Listing and extraction accept the test password unless overridden, which
/// lets a test make the two disagree.
///
/// # Examples
///
/// ```
/// use arcpass_core::ArchiveTarget;
/// use arcpass_core::oracle::ArchiveOracle;
/// use arcpass_core::oracle::TestStatus;
/// use arcpass_core::test_utils::ScriptedOracle;
/// use std::time::Duration;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let oracle = ScriptedOracle::new()
///     .with_password("hunter2")
///     .with_root_entries(["report.pdf", "notes.txt"]);
/// let target = ArchiveTarget::new("/data/bundle.rar")?;
///
/// let status = oracle.test(&target, "hunter2", Duration::from_secs(1))?;
/// assert_eq!(status, TestStatus::Accepted);
/// assert_eq!(oracle.list_root_entries(&target, "hunter2")?.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    password: Option<String>,
    listing_password: Option<String>,
    extract_password: Option<String>,
    root_entries: Vec<String>,
    timeouts: HashSet<String>,
    failures: HashMap<String, String>,
    calls: RefCell<Vec<OracleCall>>,
}

impl ScriptedOracle {
    /// Creates an oracle that rejects everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the password that unlocks the archive.
    #[must_use]
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    /// Makes listing accept `password` instead of the test password.
    #[must_use]
    pub fn with_listing_password(mut self, password: &str) -> Self {
        self.listing_password = Some(password.to_string());
        self
    }

    /// Makes extraction accept `password` instead of the test password.
    #[must_use]
    pub fn with_extract_password(mut self, password: &str) -> Self {
        self.extract_password = Some(password.to_string());
        self
    }

    /// Sets the root listing returned for an accepted password.
    #[must_use]
    pub fn with_root_entries<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.root_entries = entries.into_iter().map(Into::into).collect();
        self
    }

    /// Makes `test` time out for `password`.
    #[must_use]
    pub fn with_timeout_on(mut self, password: &str) -> Self {
        self.timeouts.insert(password.to_string());
        self
    }

    /// Makes every operation fail with `detail` for `password`.
    #[must_use]
    pub fn with_failure_on(mut self, password: &str, detail: &str) -> Self {
        self.failures
            .insert(password.to_string(), detail.to_string());
        self
    }

    /// All calls received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<OracleCall> {
        self.calls.borrow().clone()
    }

    /// Passwords passed to `test`, in call order.
    #[must_use]
    pub fn tested_passwords(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                OracleCall::Test { password, .. } => Some(password.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of `extract` calls received.
    #[must_use]
    pub fn extract_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, OracleCall::Extract { .. }))
            .count()
    }

    /// Forgets recorded calls.
    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: OracleCall) {
        self.calls.borrow_mut().push(call);
    }

    fn check_failure(&self, password: &str) -> Result<()> {
        self.failures
            .get(password)
            .map_or(Ok(()), |detail| Err(Error::oracle(detail.clone())))
    }

    fn accepts(expected: Option<&String>, password: &str) -> bool {
        expected.is_some_and(|p| p == password)
    }
}

impl ArchiveOracle for ScriptedOracle {
    fn test(&self, _target: &ArchiveTarget, password: &str, budget: Duration) -> Result<TestStatus> {
        self.record(OracleCall::Test {
            password: password.to_string(),
            budget,
        });
        self.check_failure(password)?;

        if self.timeouts.contains(password) {
            Ok(TestStatus::TimedOut)
        } else if Self::accepts(self.password.as_ref(), password) {
            Ok(TestStatus::Accepted)
        } else {
            Ok(TestStatus::Rejected)
        }
    }

    fn list_root_entries(&self, _target: &ArchiveTarget, password: &str) -> Result<Vec<String>> {
        self.record(OracleCall::List {
            password: password.to_string(),
        });
        self.check_failure(password)?;

        let expected = self.listing_password.as_ref().or(self.password.as_ref());
        if Self::accepts(expected, password) {
            Ok(self.root_entries.clone())
        } else {
            Err(Error::WrongPassword)
        }
    }

    fn extract(&self, _target: &ArchiveTarget, password: &str, destination: &Path) -> Result<()> {
        self.record(OracleCall::Extract {
            password: password.to_string(),
            destination: destination.to_path_buf(),
        });
        self.check_failure(password)?;

        let expected = self.extract_password.as_ref().or(self.password.as_ref());
        if Self::accepts(expected, password) {
            Ok(())
        } else {
            Err(Error::ExtractionFailed {
                detail: format!("ERROR: Wrong password : {password}"),
            })
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

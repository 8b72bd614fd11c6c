//! Credential trial engine.
//!
//! Tries candidates against one archive, strictly in order, and stops at the
//! first one that unlocks it. Two modes trade speed for certainty:
//!
//! - [`TrialMode::Quick`] gives each candidate a short budget. Wrong
//!   passwords make the tool fail fast, while the right one sends it into a
//!   slow full integrity check, so a test still running when the budget
//!   runs out is taken as a match.
//! - [`TrialMode::Accurate`] waits for the tool's definitive status.
//!
//! In both modes a tool failure ends the search for that archive.

use std::fmt;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::PasswordSet;
use crate::ProgressCallback;
use crate::TrialConfig;
use crate::oracle::OracleClient;
use crate::oracle::TestStatus;

/// How trial results are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TrialMode {
    /// Bounded budget per candidate; a timeout counts as unlocked.
    #[default]
    Quick,
    /// Wait for the tool's verdict.
    Accurate,
}

impl fmt::Display for TrialMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quick => f.write_str("quick"),
            Self::Accurate => f.write_str("accurate"),
        }
    }
}

/// Interpreted result of one trial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialOutcome {
    /// The candidate unlocks the archive.
    Unlocked,
    /// The candidate was rejected.
    WrongPassword,
    /// The tool could not deliver a verdict.
    OracleFailure(String),
}

/// Terminal result of searching one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A candidate unlocked the archive.
    Found {
        /// The matching candidate.
        password: String,
        /// Candidates tried, including the match.
        attempts: usize,
    },
    /// No candidate matched.
    Exhausted {
        /// Candidates tried.
        attempts: usize,
    },
    /// A tool failure stopped the search.
    Aborted {
        /// Diagnostic detail.
        detail: String,
        /// Candidates tried, including the failing one.
        attempts: usize,
    },
}

impl SearchOutcome {
    /// Number of candidates tried.
    #[must_use]
    pub const fn attempts(&self) -> usize {
        match self {
            Self::Found { attempts, .. }
            | Self::Exhausted { attempts }
            | Self::Aborted { attempts, .. } => *attempts,
        }
    }
}

/// Runs password trials under a [`TrialConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TrialEngine {
    config: TrialConfig,
}

impl TrialEngine {
    /// Creates an engine with the given budgets.
    #[must_use]
    pub const fn new(config: TrialConfig) -> Self {
        Self { config }
    }

    /// Budget applied to a single test in `mode`.
    #[must_use]
    pub const fn budget(&self, mode: TrialMode) -> std::time::Duration {
        match mode {
            TrialMode::Quick => self.config.quick_budget,
            TrialMode::Accurate => self.config.accurate_ceiling,
        }
    }

    /// Tries one candidate.
    pub fn trial(&self, client: &OracleClient<'_>, password: &str, mode: TrialMode) -> TrialOutcome {
        let budget = self.budget(mode);
        match client.test(password, budget) {
            Ok(TestStatus::Accepted) => TrialOutcome::Unlocked,
            Ok(TestStatus::Rejected) => TrialOutcome::WrongPassword,
            Ok(TestStatus::TimedOut) => match mode {
                TrialMode::Quick => TrialOutcome::Unlocked,
                TrialMode::Accurate => {
                    TrialOutcome::OracleFailure(format!("no verdict within {budget:?}"))
                }
            },
            Err(e) if e.is_wrong_password() => TrialOutcome::WrongPassword,
            Err(e) => TrialOutcome::OracleFailure(e.into_detail()),
        }
    }

    /// Tries `passwords` in order and returns the first match.
    ///
    /// # Examples
    ///
    /// ```
    /// use arcpass_core::ArchiveTarget;
    /// use arcpass_core::NoopProgress;
    /// use arcpass_core::OracleClient;
    /// use arcpass_core::PasswordSet;
    /// use arcpass_core::SearchOutcome;
    /// use arcpass_core::TrialEngine;
    /// use arcpass_core::TrialMode;
    /// use arcpass_core::test_utils::ScriptedOracle;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let oracle = ScriptedOracle::new().with_password("hunter2");
    /// let target = ArchiveTarget::new("/data/secret.zip")?;
    /// let client = OracleClient::new(&oracle, &target);
    /// let passwords = PasswordSet::from_lines(["123456", "hunter2", "password"]);
    ///
    /// let outcome = TrialEngine::default().find_password(
    ///     &client,
    ///     &passwords,
    ///     TrialMode::Accurate,
    ///     &mut NoopProgress,
    /// );
    /// assert_eq!(
    ///     outcome,
    ///     SearchOutcome::Found {
    ///         password: "hunter2".into(),
    ///         attempts: 2
    ///     }
    /// );
    /// # Ok(())
    /// # }
    /// ```
    pub fn find_password(
        &self,
        client: &OracleClient<'_>,
        passwords: &PasswordSet,
        mode: TrialMode,
        progress: &mut dyn ProgressCallback,
    ) -> SearchOutcome {
        let total = passwords.len();
        let archive = client.target().file_name();

        for (idx, password) in passwords.iter().enumerate() {
            let attempts = idx + 1;
            progress.on_candidate(password, attempts, total);

            match self.trial(client, password, mode) {
                TrialOutcome::Unlocked => {
                    info!(archive, attempts, %mode, "password found");
                    return SearchOutcome::Found {
                        password: password.to_string(),
                        attempts,
                    };
                }
                TrialOutcome::WrongPassword => {
                    debug!(archive, attempts, "candidate rejected");
                }
                TrialOutcome::OracleFailure(detail) => {
                    warn!(archive, attempts, "archive tool failed: {detail}");
                    return SearchOutcome::Aborted { detail, attempts };
                }
            }
        }

        info!(archive, attempts = total, "no password found");
        SearchOutcome::Exhausted { attempts: total }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ArchiveTarget;
    use crate::NoopProgress;
    use crate::test_utils::OracleCall;
    use crate::test_utils::ScriptedOracle;
    use std::time::Duration;

    fn target() -> ArchiveTarget {
        ArchiveTarget::new("/data/secret.zip").unwrap()
    }

    #[test]
    fn test_accurate_finds_second_candidate() {
        let oracle = ScriptedOracle::new().with_password("hunter2");
        let target = target();
        let client = OracleClient::new(&oracle, &target);
        let passwords = PasswordSet::from_lines(["123456", "hunter2", "password"]);

        let outcome = TrialEngine::default().find_password(
            &client,
            &passwords,
            TrialMode::Accurate,
            &mut NoopProgress,
        );

        assert_eq!(
            outcome,
            SearchOutcome::Found {
                password: "hunter2".into(),
                attempts: 2
            }
        );
        assert_eq!(oracle.tested_passwords(), vec!["123456", "hunter2"]);
    }

    #[test]
    fn test_exhausted() {
        let oracle = ScriptedOracle::new().with_password("nope");
        let target = target();
        let client = OracleClient::new(&oracle, &target);
        let passwords = PasswordSet::from_lines(["a", "b", "c"]);

        let outcome = TrialEngine::default().find_password(
            &client,
            &passwords,
            TrialMode::Accurate,
            &mut NoopProgress,
        );
        assert_eq!(outcome, SearchOutcome::Exhausted { attempts: 3 });
    }

    #[test]
    fn test_quick_mode_timeout_counts_as_unlocked() {
        let oracle = ScriptedOracle::new()
            .with_password("real")
            .with_timeout_on("slow");
        let target = target();
        let client = OracleClient::new(&oracle, &target);
        let passwords = PasswordSet::from_lines(["fast", "slow", "real"]);

        let outcome = TrialEngine::default().find_password(
            &client,
            &passwords,
            TrialMode::Quick,
            &mut NoopProgress,
        );
        assert_eq!(
            outcome,
            SearchOutcome::Found {
                password: "slow".into(),
                attempts: 2
            }
        );
    }

    #[test]
    fn test_accurate_mode_timeout_is_failure() {
        let oracle = ScriptedOracle::new().with_timeout_on("slow");
        let target = target();
        let client = OracleClient::new(&oracle, &target);

        let outcome = TrialEngine::default().trial(&client, "slow", TrialMode::Accurate);
        assert!(matches!(outcome, TrialOutcome::OracleFailure(_)));
    }

    #[test]
    fn test_oracle_failure_aborts() {
        let oracle = ScriptedOracle::new()
            .with_password("c")
            .with_failure_on("b", "binary vanished");
        let target = target();
        let client = OracleClient::new(&oracle, &target);
        let passwords = PasswordSet::from_lines(["a", "b", "c"]);

        for mode in [TrialMode::Quick, TrialMode::Accurate] {
            oracle.clear_calls();
            let outcome =
                TrialEngine::default().find_password(&client, &passwords, mode, &mut NoopProgress);
            assert_eq!(
                outcome,
                SearchOutcome::Aborted {
                    detail: "binary vanished".into(),
                    attempts: 2
                }
            );
            assert_eq!(oracle.tested_passwords(), vec!["a", "b"]);
        }
    }

    #[test]
    fn test_budget_per_mode() {
        let config = TrialConfig::default()
            .with_quick_budget(Duration::from_millis(10))
            .with_accurate_ceiling(Duration::from_secs(9));
        let oracle = ScriptedOracle::new().with_password("pw");
        let target = target();
        let client = OracleClient::new(&oracle, &target);
        let engine = TrialEngine::new(config);

        engine.trial(&client, "pw", TrialMode::Quick);
        engine.trial(&client, "pw", TrialMode::Accurate);

        assert_eq!(
            oracle.calls(),
            vec![
                OracleCall::Test {
                    password: "pw".into(),
                    budget: Duration::from_millis(10)
                },
                OracleCall::Test {
                    password: "pw".into(),
                    budget: Duration::from_secs(9)
                },
            ]
        );
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(TrialMode::Quick.to_string(), "quick");
        assert_eq!(TrialMode::Accurate.to_string(), "accurate");
        assert_eq!(TrialMode::default(), TrialMode::Quick);
    }
}

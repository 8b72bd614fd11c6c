//! Extraction destination planning.
//!
//! The planner walks the candidate list for one archive and extracts with
//! the first password the tool accepts. Password checks here always wait
//! for a definitive verdict; there is no timeout shortcut.
//!
//! In [`ExtractionMode::Smart`] the root listing doubles as the password
//! check: a rejected listing skips the candidate before anything is written
//! to disk, and an accepted one feeds [`choose_layout`].

use std::fmt;
use std::path::PathBuf;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::ArchiveTarget;
use crate::Error;
use crate::PasswordSet;
use crate::ProgressCallback;
use crate::TrialConfig;
use crate::engine::TrialEngine;
use crate::engine::TrialMode;
use crate::engine::TrialOutcome;
use crate::oracle::OracleClient;

/// Requested destination policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExtractionMode {
    /// Pick per archive from its root listing.
    #[default]
    Smart,
    /// Extract into the archive's own directory.
    CurrentDirectory,
    /// Extract into a directory named after the archive.
    SiblingFolder,
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Smart => f.write_str("smart"),
            Self::CurrentDirectory => f.write_str("current"),
            Self::SiblingFolder => f.write_str("sibling"),
        }
    }
}

/// Destination policy actually applied to one archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolvedLayout {
    /// Requested [`ExtractionMode::CurrentDirectory`].
    CurrentDirectory,
    /// Requested [`ExtractionMode::SiblingFolder`].
    SiblingFolder,
    /// Smart mode found a single root folder named like the archive.
    CollapseToCurrent,
    /// Smart mode found anything else.
    CollapseToSibling,
}

impl ResolvedLayout {
    /// Directory the archive is extracted into.
    #[must_use]
    pub fn destination(self, target: &ArchiveTarget) -> PathBuf {
        match self {
            Self::CurrentDirectory | Self::CollapseToCurrent => target.container().to_path_buf(),
            Self::SiblingFolder | Self::CollapseToSibling => target.sibling_dir(),
        }
    }

    /// Returns `true` if the layout was picked by the smart heuristic.
    #[must_use]
    pub const fn is_smart(self) -> bool {
        matches!(self, Self::CollapseToCurrent | Self::CollapseToSibling)
    }

    const fn fixed(mode: ExtractionMode) -> Option<Self> {
        match mode {
            ExtractionMode::Smart => None,
            ExtractionMode::CurrentDirectory => Some(Self::CurrentDirectory),
            ExtractionMode::SiblingFolder => Some(Self::SiblingFolder),
        }
    }
}

impl fmt::Display for ResolvedLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CurrentDirectory => f.write_str("current directory"),
            Self::SiblingFolder => f.write_str("sibling folder"),
            Self::CollapseToCurrent => f.write_str("smart: current directory"),
            Self::CollapseToSibling => f.write_str("smart: sibling folder"),
        }
    }
}

/// Smart-mode heuristic.
///
/// An archive whose root holds exactly one entry named like the archive
/// itself already carries its own folder, so it is extracted straight into
/// the container directory. Everything else gets a sibling folder.
///
/// # Examples
///
/// ```
/// use arcpass_core::ArchiveTarget;
/// use arcpass_core::ResolvedLayout;
/// use arcpass_core::planner::choose_layout;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let target = ArchiveTarget::new("/data/bundle.rar")?;
///
/// let wrapped = ["bundle".to_string()];
/// assert_eq!(choose_layout(&wrapped, &target), ResolvedLayout::CollapseToCurrent);
///
/// let loose = ["report.pdf".to_string(), "notes.txt".to_string()];
/// assert_eq!(choose_layout(&loose, &target), ResolvedLayout::CollapseToSibling);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn choose_layout(root_entries: &[String], target: &ArchiveTarget) -> ResolvedLayout {
    match root_entries {
        [only] if only == target.base_name() => ResolvedLayout::CollapseToCurrent,
        _ => ResolvedLayout::CollapseToSibling,
    }
}

/// Terminal result of extracting one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// Extraction succeeded.
    Extracted {
        /// Password used.
        password: String,
        /// Directory written to.
        destination: PathBuf,
        /// Policy that chose `destination`.
        layout: ResolvedLayout,
        /// Candidates tried, including the successful one.
        attempts: usize,
    },
    /// No candidate both unlocked and extracted the archive.
    Exhausted {
        /// Candidates tried.
        attempts: usize,
        /// Detail of the last failed extraction, if any.
        last_failure: Option<String>,
    },
    /// A tool failure stopped work on the archive.
    Aborted {
        /// Diagnostic detail.
        detail: String,
        /// Candidates tried, including the failing one.
        attempts: usize,
    },
}

impl ExtractionOutcome {
    /// Number of candidates tried.
    #[must_use]
    pub const fn attempts(&self) -> usize {
        match self {
            Self::Extracted { attempts, .. }
            | Self::Exhausted { attempts, .. }
            | Self::Aborted { attempts, .. } => *attempts,
        }
    }
}

/// Finds a working password and extracts under an [`ExtractionMode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractionPlanner {
    mode: ExtractionMode,
    engine: TrialEngine,
}

/// Per-candidate verdict before extraction.
enum Gate {
    Proceed(ResolvedLayout),
    Skip,
    Abort(String),
}

impl ExtractionPlanner {
    /// Creates a planner for `mode`.
    #[must_use]
    pub const fn new(mode: ExtractionMode, config: TrialConfig) -> Self {
        Self {
            mode,
            engine: TrialEngine::new(config),
        }
    }

    /// The requested destination policy.
    #[must_use]
    pub const fn mode(&self) -> ExtractionMode {
        self.mode
    }

    /// Tries `passwords` in order and extracts with the first that works.
    ///
    /// A candidate whose extraction fails is skipped and the next one is
    /// tried. Tool failures end the search.
    ///
    /// # Examples
    ///
    /// ```
    /// use arcpass_core::ArchiveTarget;
    /// use arcpass_core::ExtractionMode;
    /// use arcpass_core::ExtractionOutcome;
    /// use arcpass_core::ExtractionPlanner;
    /// use arcpass_core::NoopProgress;
    /// use arcpass_core::OracleClient;
    /// use arcpass_core::PasswordSet;
    /// use arcpass_core::TrialConfig;
    /// use arcpass_core::test_utils::ScriptedOracle;
    /// use std::path::PathBuf;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let oracle = ScriptedOracle::new()
    ///     .with_password("hunter2")
    ///     .with_root_entries(["report.pdf", "notes.txt"]);
    /// let target = ArchiveTarget::new("/data/bundle.rar")?;
    /// let client = OracleClient::new(&oracle, &target);
    ///
    /// let planner = ExtractionPlanner::new(ExtractionMode::Smart, TrialConfig::default());
    /// let outcome = planner.extract(
    ///     &client,
    ///     &PasswordSet::from_lines(["123456", "hunter2"]),
    ///     &mut NoopProgress,
    /// );
    ///
    /// let ExtractionOutcome::Extracted { destination, .. } = outcome else {
    ///     panic!("expected extraction");
    /// };
    /// assert_eq!(destination, PathBuf::from("/data/bundle"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn extract(
        &self,
        client: &OracleClient<'_>,
        passwords: &PasswordSet,
        progress: &mut dyn ProgressCallback,
    ) -> ExtractionOutcome {
        let target = client.target();
        let archive = target.file_name();
        let total = passwords.len();
        let mut last_failure = None;

        for (idx, password) in passwords.iter().enumerate() {
            let attempts = idx + 1;
            progress.on_candidate(password, attempts, total);

            let layout = match self.gate(client, password) {
                Gate::Proceed(layout) => layout,
                Gate::Skip => {
                    debug!(archive, attempts, "candidate rejected");
                    continue;
                }
                Gate::Abort(detail) => {
                    warn!(archive, attempts, "archive tool failed: {detail}");
                    return ExtractionOutcome::Aborted { detail, attempts };
                }
            };

            let destination = layout.destination(target);
            match client.extract(password, &destination) {
                Ok(()) => {
                    info!(
                        archive,
                        attempts,
                        %layout,
                        destination = %destination.display(),
                        "extracted"
                    );
                    return ExtractionOutcome::Extracted {
                        password: password.to_string(),
                        destination,
                        layout,
                        attempts,
                    };
                }
                Err(Error::ExtractionFailed { detail }) => {
                    warn!(archive, attempts, "extraction failed, trying next candidate");
                    last_failure = Some(if layout.is_smart() {
                        format!("listing accepted the password but extraction failed: {detail}")
                    } else {
                        detail
                    });
                }
                Err(e) => {
                    let detail = e.into_detail();
                    warn!(archive, attempts, "archive tool failed: {detail}");
                    return ExtractionOutcome::Aborted { detail, attempts };
                }
            }
        }

        info!(archive, attempts = total, "no password extracted the archive");
        ExtractionOutcome::Exhausted {
            attempts: total,
            last_failure,
        }
    }

    fn gate(&self, client: &OracleClient<'_>, password: &str) -> Gate {
        if let Some(layout) = ResolvedLayout::fixed(self.mode) {
            return match self.engine.trial(client, password, TrialMode::Accurate) {
                TrialOutcome::Unlocked => Gate::Proceed(layout),
                TrialOutcome::WrongPassword => Gate::Skip,
                TrialOutcome::OracleFailure(detail) => Gate::Abort(detail),
            };
        }

        match client.list_root_entries(password) {
            Ok(entries) => {
                debug!(
                    archive = %client.target().file_name(),
                    root_entries = entries.len(),
                    "listing accepted"
                );
                Gate::Proceed(choose_layout(&entries, client.target()))
            }
            Err(e) if e.is_wrong_password() => Gate::Skip,
            Err(e) => Gate::Abort(e.into_detail()),
        }
    }
}

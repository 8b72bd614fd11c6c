//! Run configuration: archive tool location and trial timing.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::Error;
use crate::Result;

/// Executable names tried during discovery, most preferred first.
const ORACLE_NAMES: [&str; 2] = ["7z", "7za"];

/// Location of the external archive tool.
///
/// Built once at startup and handed to the tool adapter.
///
/// # Examples
///
/// ```no_run
/// use arcpass_core::OracleConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = OracleConfig::discover()?;
/// println!("using {}", config.executable().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleConfig {
    executable: PathBuf,
}

impl OracleConfig {
    /// Locates the archive tool.
    ///
    /// A copy next to the running executable wins over one found on `PATH`.
    /// Within each location `7z` is preferred over `7za`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OracleNotFound`] if neither location has the tool.
    pub fn discover() -> Result<Self> {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        Self::discover_from(exe_dir.as_deref())
    }

    /// Discovery with an explicit colocation directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OracleNotFound`] if the tool cannot be found.
    pub fn discover_from(colocated_dir: Option<&Path>) -> Result<Self> {
        let mut searched = Vec::new();

        if let Some(dir) = colocated_dir {
            for name in ORACLE_NAMES {
                let candidate = dir.join(with_exe_suffix(name));
                if candidate.is_file() {
                    debug!("using colocated archive tool {}", candidate.display());
                    return Ok(Self {
                        executable: candidate,
                    });
                }
                searched.push(candidate);
            }
        }

        for name in ORACLE_NAMES {
            if let Ok(found) = which::which(name) {
                debug!("using archive tool from PATH {}", found.display());
                return Ok(Self { executable: found });
            }
            searched.push(PathBuf::from(name));
        }

        Err(Error::OracleNotFound { searched })
    }

    /// Uses an explicitly provided executable (path or bare name).
    ///
    /// An existing file is stored as an absolute path, since the tool is
    /// later spawned from each archive's own directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OracleNotFound`] if `path` is neither an existing
    /// file nor resolvable on `PATH`, and [`Error::Io`] if an existing
    /// file cannot be made absolute.
    pub fn with_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.is_file() {
            return Ok(Self {
                executable: std::path::absolute(path)?,
            });
        }
        which::which(path)
            .map(|executable| Self { executable })
            .map_err(|_| Error::OracleNotFound {
                searched: vec![path.to_path_buf()],
            })
    }

    /// Path of the resolved executable.
    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

fn with_exe_suffix(name: &str) -> String {
    format!("{name}{}", std::env::consts::EXE_SUFFIX)
}

/// Time budgets applied to password trials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialConfig {
    /// Per-candidate budget in quick mode. A trial still running when this
    /// elapses counts as unlocked.
    pub quick_budget: Duration,

    /// Safety ceiling in accurate mode and for listing and extraction
    /// calls. Hitting it is an archive tool failure.
    pub accurate_ceiling: Duration,
}

impl Default for TrialConfig {
    /// Default values:
    /// - `quick_budget`: 500 ms
    /// - `accurate_ceiling`: 24 h
    fn default() -> Self {
        Self {
            quick_budget: Duration::from_millis(500),
            accurate_ceiling: Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl TrialConfig {
    /// Creates a `TrialConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the quick-mode budget.
    #[must_use]
    pub fn with_quick_budget(mut self, budget: Duration) -> Self {
        self.quick_budget = budget;
        self
    }

    /// Sets the accurate-mode ceiling.
    #[must_use]
    pub fn with_accurate_ceiling(mut self, ceiling: Duration) -> Self {
        self.accurate_ceiling = ceiling;
        self
    }
}

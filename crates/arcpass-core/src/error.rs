//! Error types for password discovery and extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while locating, unlocking, or extracting archives.
///
/// Variants fall into three groups:
/// - configuration and input errors, fatal for the whole run
///   ([`Error::is_fatal`]);
/// - [`Error::WrongPassword`], an expected outcome that drives iteration;
/// - per-archive failures ([`Error::OracleFailure`],
///   [`Error::ExtractionFailed`]) that end work on one archive only.
#[derive(Error, Debug)]
pub enum Error {
    /// No usable archive tool executable could be located.
    #[error("archive tool not found (searched: {})", display_names(.searched))]
    OracleNotFound {
        /// Executable names or paths that were tried.
        searched: Vec<PathBuf>,
    },

    /// Password list file does not exist.
    #[error("password file '{}' does not exist", .path.display())]
    PasswordListMissing {
        /// Path of the password list.
        path: PathBuf,
    },

    /// Password list file exists but could not be read.
    #[error("cannot read password file '{}': {source}", .path.display())]
    PasswordListUnreadable {
        /// Path of the password list.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Password list contains no usable candidates.
    #[error("password file '{}' is empty", .path.display())]
    EmptyPasswordList {
        /// Path of the password list.
        path: PathBuf,
    },

    /// Scan root does not exist.
    #[error("path '{}' does not exist", .path.display())]
    TargetNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// Scan completed but found nothing to work on.
    #[error("no supported archives found under '{}'", .root.display())]
    NoArchivesFound {
        /// Root that was scanned.
        root: PathBuf,
    },

    /// File extension does not map to any known archive format.
    #[error("unsupported archive type: {}", .path.display())]
    UnsupportedFormat {
        /// The rejected path.
        path: PathBuf,
    },

    /// The archive tool rejected the password.
    #[error("wrong password")]
    WrongPassword,

    /// The archive tool could not be run or failed in an unrecognized way.
    #[error("archive tool failure: {detail}")]
    OracleFailure {
        /// Diagnostic detail.
        detail: String,
    },

    /// Extraction with an otherwise accepted password failed.
    #[error("extraction failed: {detail}")]
    ExtractionFailed {
        /// Combined tool output and exit status.
        detail: String,
    },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn display_names(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Creates an [`Error::OracleFailure`] from any displayable detail.
    pub fn oracle(detail: impl Into<String>) -> Self {
        Self::OracleFailure {
            detail: detail.into(),
        }
    }

    /// Returns `true` if this error must stop the run before any archive
    /// is attempted.
    ///
    /// # Examples
    ///
    /// ```
    /// use arcpass_core::Error;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::EmptyPasswordList {
    ///     path: PathBuf::from("passwords.txt"),
    /// };
    /// assert!(err.is_fatal());
    ///
    /// assert!(!Error::WrongPassword.is_fatal());
    /// ```
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::OracleNotFound { .. }
                | Self::PasswordListMissing { .. }
                | Self::PasswordListUnreadable { .. }
                | Self::EmptyPasswordList { .. }
                | Self::TargetNotFound { .. }
                | Self::NoArchivesFound { .. }
        )
    }

    /// Returns `true` for the expected "password rejected" outcome.
    #[must_use]
    pub const fn is_wrong_password(&self) -> bool {
        matches!(self, Self::WrongPassword)
    }

    /// Returns the diagnostic detail carried by per-archive failures.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::OracleFailure { detail } | Self::ExtractionFailed { detail } => Some(detail),
            _ => None,
        }
    }

    /// Consumes the error into a message suitable for a per-archive report.
    #[must_use]
    pub fn into_detail(self) -> String {
        match self {
            Self::OracleFailure { detail } | Self::ExtractionFailed { detail } => detail,
            other => other.to_string(),
        }
    }
}

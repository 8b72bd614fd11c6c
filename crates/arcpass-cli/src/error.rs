//! Error conversion utilities for CLI.
//!
//! Converts arcpass-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use arcpass_core::ArchiveFormat;
use arcpass_core::Error;

/// Converts a core `Error` to a user-friendly anyhow error with a hint.
pub fn convert_error(err: Error) -> anyhow::Error {
    match err {
        Error::OracleNotFound { .. } => {
            anyhow!(
                "{err}\n\
                 HINT: Install 7-Zip, place 7z next to arcpass, or pass --oracle <PATH>."
            )
        }
        Error::PasswordListMissing { .. } => {
            anyhow!(
                "{err}\n\
                 HINT: Create it with one password per line, or pass --passwords <FILE>."
            )
        }
        Error::EmptyPasswordList { .. } => {
            anyhow!(
                "{err}\n\
                 HINT: The file needs at least one non-blank line."
            )
        }
        Error::TargetNotFound { .. } | Error::NoArchivesFound { .. } => {
            anyhow!(
                "{err}\n\
                 HINT: Supported extensions: {}. Use --recursive to scan subdirectories.",
                supported_extensions()
            )
        }
        _ => anyhow::Error::from(err),
    }
}

/// Maps a core result through [`convert_error`].
pub fn add_hint<T>(result: arcpass_core::Result<T>) -> anyhow::Result<T> {
    result.map_err(convert_error)
}

fn supported_extensions() -> String {
    ArchiveFormat::supported_extensions()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(", ")
}

//! Archive format detection.
//!
//! Detection is extension based. The format table is the single place that
//! decides which extensions are supported and which tool backend handles
//! them.

use std::fmt;
use std::path::Path;

use crate::Error;
use crate::Result;

/// Supported archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// ZIP archive.
    Zip,
    /// RAR archive.
    Rar,
    /// 7z archive.
    SevenZ,
}

/// External tool family that services an archive format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// The `7z` command-line tool (handles zip, rar and 7z).
    SevenZip,
}

/// Extension (lowercase, without dot), format, backend.
const FORMAT_TABLE: &[(&str, ArchiveFormat, Backend)] = &[
    ("zip", ArchiveFormat::Zip, Backend::SevenZip),
    ("rar", ArchiveFormat::Rar, Backend::SevenZip),
    ("7z", ArchiveFormat::SevenZ, Backend::SevenZip),
];

impl ArchiveFormat {
    /// Looks up a format by extension, case-insensitively.
    ///
    /// # Examples
    ///
    /// ```
    /// use arcpass_core::ArchiveFormat;
    ///
    /// assert_eq!(ArchiveFormat::from_extension("RAR"), Some(ArchiveFormat::Rar));
    /// assert_eq!(ArchiveFormat::from_extension("tar"), None);
    /// ```
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        FORMAT_TABLE
            .iter()
            .find(|(e, _, _)| e.eq_ignore_ascii_case(ext))
            .map(|&(_, format, _)| format)
    }

    /// Returns the backend responsible for this format.
    #[must_use]
    pub fn backend(self) -> Backend {
        FORMAT_TABLE
            .iter()
            .find(|(_, format, _)| *format == self)
            .map_or(Backend::SevenZip, |&(_, _, backend)| backend)
    }

    /// Returns the canonical extension for this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Rar => "rar",
            Self::SevenZ => "7z",
        }
    }

    /// Returns `true` if the path carries a supported archive extension.
    #[must_use]
    pub fn is_supported_path(path: &Path) -> bool {
        detect_format(path).is_ok()
    }

    /// All supported extensions, in table order.
    pub fn supported_extensions() -> impl Iterator<Item = &'static str> {
        FORMAT_TABLE.iter().map(|(ext, _, _)| *ext)
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Detects the archive format from a file path.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] if the extension is missing or not
/// in the format table.
pub fn detect_format(path: &Path) -> Result<ArchiveFormat> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(ArchiveFormat::from_extension)
        .ok_or_else(|| Error::UnsupportedFormat {
            path: path.to_path_buf(),
        })
}

//! Archive work units.

use std::path::Path;
use std::path::PathBuf;

use crate::Error;
use crate::Result;
use crate::formats::ArchiveFormat;
use crate::formats::detect_format;

/// One archive to process: its absolute path, container directory and
/// detected format.
///
/// # Examples
///
/// ```
/// use arcpass_core::ArchiveTarget;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let target = ArchiveTarget::new("/data/bundle.rar")?;
/// assert_eq!(target.file_name(), "bundle.rar");
/// assert_eq!(target.base_name(), "bundle");
/// assert_eq!(target.container(), std::path::Path::new("/data"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveTarget {
    path: PathBuf,
    container: PathBuf,
    file_name: String,
    base_name: String,
    format: ArchiveFormat,
}

impl ArchiveTarget {
    /// Resolves `path` into a target.
    ///
    /// Relative paths are made absolute against the current directory. The
    /// file itself is not required to exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for unknown extensions and
    /// [`Error::Io`] if the path cannot be made absolute.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = std::path::absolute(path.as_ref())?;
        let format = detect_format(&path)?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::UnsupportedFormat { path: path.clone() })?;
        let base_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let container = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        Ok(Self {
            path,
            container,
            file_name,
            base_name,
            format,
        })
    }

    /// Absolute path of the archive file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the archive.
    #[must_use]
    pub fn container(&self) -> &Path {
        &self.container
    }

    /// File name including extension.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// File name with its final extension stripped.
    #[must_use]
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Detected archive format.
    #[must_use]
    pub const fn format(&self) -> ArchiveFormat {
        self.format
    }

    /// Directory alongside the archive named after its base name.
    #[must_use]
    pub fn sibling_dir(&self) -> PathBuf {
        self.container.join(&self.base_name)
    }
}

//! Archive discovery under a file or directory.

use std::path::Path;
use tracing::debug;
use tracing::warn;
use walkdir::WalkDir;

use crate::ArchiveTarget;
use crate::Error;
use crate::Result;
use crate::formats::ArchiveFormat;

/// Options controlling archive discovery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Descend into subdirectories.
    ///
    /// Default: `false` (direct children only).
    pub recursive: bool,

    /// Skip archives that already have a same-named sibling directory,
    /// i.e. look as if they were extracted before.
    ///
    /// Default: `false`.
    pub exclude_extracted: bool,
}

impl ScanOptions {
    /// Sets recursion.
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Sets exclusion of already extracted archives.
    #[must_use]
    pub fn with_exclude_extracted(mut self, exclude: bool) -> Self {
        self.exclude_extracted = exclude;
        self
    }
}

/// Finds supported archives under `root`.
///
/// If `root` is a file it is returned on its own when supported. Directory
/// entries are visited in file name order. Unreadable entries are logged and
/// skipped.
///
/// # Errors
///
/// - [`Error::TargetNotFound`] if `root` does not exist
/// - [`Error::NoArchivesFound`] if nothing matched
///
/// # Examples
///
/// ```no_run
/// use arcpass_core::ScanOptions;
/// use arcpass_core::scan_archives;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let options = ScanOptions::default().with_recursive(true);
/// for target in scan_archives("downloads", &options)? {
///     println!("{}", target.path().display());
/// }
/// # Ok(())
/// # }
/// ```
pub fn scan_archives<P: AsRef<Path>>(root: P, options: &ScanOptions) -> Result<Vec<ArchiveTarget>> {
    let root = root.as_ref();
    let metadata = std::fs::metadata(root).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::TargetNotFound {
                path: root.to_path_buf(),
            }
        } else {
            Error::Io(e)
        }
    })?;

    let mut archives = Vec::new();

    if metadata.is_file() {
        if ArchiveFormat::is_supported_path(root) {
            archives.push(ArchiveTarget::new(root)?);
        }
    } else {
        let mut walker = WalkDir::new(root).min_depth(1).sort_by_file_name();
        if !options.recursive {
            walker = walker.max_depth(1);
        }

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("cannot access path during scan: {e}");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(target) = accept(entry.path(), options)? {
                archives.push(target);
            }
        }
    }

    if archives.is_empty() {
        return Err(Error::NoArchivesFound {
            root: root.to_path_buf(),
        });
    }

    debug!("found {} archives under {}", archives.len(), root.display());
    Ok(archives)
}

fn accept(path: &Path, options: &ScanOptions) -> Result<Option<ArchiveTarget>> {
    if !ArchiveFormat::is_supported_path(path) {
        return Ok(None);
    }

    let target = ArchiveTarget::new(path)?;
    if options.exclude_extracted && target.sibling_dir().is_dir() {
        debug!("skipping already extracted {}", path.display());
        return Ok(None);
    }
    Ok(Some(target))
}

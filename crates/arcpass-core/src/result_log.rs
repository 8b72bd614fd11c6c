//! Append-only log of discovered passwords.

use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;

use crate::Result;

const SEPARATOR: &str = "--------------------";

/// Run-scoped text log with one record per unlocked archive.
///
/// Each record looks like:
///
/// ```text
/// File: /data/secret.zip
/// Password: hunter2
/// --------------------
/// ```
#[derive(Debug)]
pub struct ResultLog {
    path: PathBuf,
    file: File,
}

impl ResultLog {
    /// Creates `dir` if needed and opens a fresh
    /// `results_<YYYY-MM-DD_HH-MM-SS>.txt` inside it.
    ///
    /// An existing file is never reused; a numeric suffix is added instead.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if the directory or file cannot be
    /// created.
    pub fn create<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        let mut suffix = 0u32;
        loop {
            let name = if suffix == 0 {
                format!("results_{stamp}.txt")
            } else {
                format!("results_{stamp}_{suffix}.txt")
            };
            let path = dir.join(name);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    debug!(path = %path.display(), "result log created");
                    return Ok(Self { path, file });
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => suffix += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Location of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record and flushes it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if the write fails.
    pub fn record(&mut self, archive: &Path, password: &str) -> Result<()> {
        writeln!(
            self.file,
            "File: {}\nPassword: {password}\n{SEPARATOR}",
            archive.display()
        )?;
        self.file.flush()?;
        Ok(())
    }
}

//! Candidate password list.

use std::collections::HashSet;
use std::path::Path;
use tracing::debug;
use tracing::warn;

use crate::Error;
use crate::Result;

/// Ordered, de-duplicated list of candidate passwords.
///
/// Each candidate is whitespace-trimmed and non-empty. Duplicates (exact,
/// case-sensitive) collapse to their first occurrence, so iteration order is
/// the order in which candidates were first seen.
///
/// # Examples
///
/// ```
/// use arcpass_core::PasswordSet;
///
/// let set = PasswordSet::from_lines(["a", "b", " a ", "", "c"]);
/// assert_eq!(set.as_slice(), ["a", "b", "c"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordSet {
    passwords: Vec<String>,
}

impl PasswordSet {
    /// Builds a set from raw lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut passwords = Vec::new();

        for line in lines {
            let pw = line.as_ref().trim();
            if !pw.is_empty() && seen.insert(pw.to_string()) {
                passwords.push(pw.to_string());
            }
        }

        Self { passwords }
    }

    /// Loads a newline-delimited password file.
    ///
    /// Lines that are not valid UTF-8 are decoded lossily rather than
    /// rejecting the whole file.
    ///
    /// # Errors
    ///
    /// - [`Error::PasswordListMissing`] if the file does not exist
    /// - [`Error::PasswordListUnreadable`] on any other read failure
    /// - [`Error::EmptyPasswordList`] if no candidate survives trimming
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                Error::PasswordListMissing {
                    path: path.to_path_buf(),
                }
            } else {
                Error::PasswordListUnreadable {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let mut lossy = 0usize;
        let lines: Vec<_> = content
            .split(|&b| b == b'\n')
            .map(|line| {
                let decoded = String::from_utf8_lossy(line);
                if matches!(decoded, std::borrow::Cow::Owned(_)) {
                    lossy += 1;
                }
                decoded
            })
            .collect();
        if lossy > 0 {
            warn!(
                "{lossy} line(s) in {} are not valid UTF-8 and were decoded lossily",
                path.display()
            );
        }

        let set = Self::from_lines(lines);
        if set.is_empty() {
            return Err(Error::EmptyPasswordList {
                path: path.to_path_buf(),
            });
        }

        debug!(
            "loaded {} unique passwords from {}",
            set.len(),
            path.display()
        );
        Ok(set)
    }

    /// Iterates candidates in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.passwords.iter().map(String::as_str)
    }

    /// Candidates as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.passwords
    }

    /// Number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.passwords.len()
    }

    /// Returns `true` if there are no candidates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.passwords.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dedup_preserves_first_seen_order() {
        let set = PasswordSet::from_lines(["a", "b", "a", "c"]);
        assert_eq!(set.as_slice(), ["a", "b", "c"]);
    }

    #[test]
    fn test_trims_and_skips_blank_lines() {
        let set = PasswordSet::from_lines(["  hunter2\t", "", "   ", "hunter2"]);
        assert_eq!(set.as_slice(), ["hunter2"]);
    }

    #[test]
    fn test_case_sensitive() {
        let set = PasswordSet::from_lines(["Secret", "secret"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_load_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("passwords.txt");
        std::fs::write(&path, "123456\r\nhunter2\n\npassword\n123456\n").unwrap();

        let set = PasswordSet::load(&path).unwrap();
        assert_eq!(set.as_slice(), ["123456", "hunter2", "password"]);
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = PasswordSet::load(temp.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, Error::PasswordListMissing { .. }));
    }

    #[test]
    fn test_load_empty_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("passwords.txt");
        std::fs::write(&path, "\n   \n").unwrap();

        let err = PasswordSet::load(&path).unwrap_err();
        assert!(matches!(err, Error::EmptyPasswordList { .. }));
    }

    #[test]
    fn test_load_tolerates_non_utf8_lines() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("passwords.txt");
        std::fs::write(&path, b"hunter2\n\xc3\x28latin\npassword\n").unwrap();

        let set = PasswordSet::load(&path).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.as_slice()[0], "hunter2");
        assert_eq!(set.as_slice()[1], "\u{fffd}(latin");
        assert_eq!(set.as_slice()[2], "password");
    }
}

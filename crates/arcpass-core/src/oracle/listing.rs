//! Parsing of the archive tool's textual output.
//!
//! A listing looks like this (header and footer abbreviated):
//!
//! ```text
//!    Date      Time    Attr         Size   Compressed  Name
//! ------------------- ----- ------------ ------------  ------------------------
//! 2024-01-01 10:00:00 ....A         1000          500  report.pdf
//! 2024-01-01 10:00:00 D....            0            0  docs
//! 2024-01-01 10:00:00 ....A          200          100  docs/notes.txt
//! ------------------- ----- ------------ ------------  ------------------------
//! 2024-01-01 10:00:00               1200          600  2 files, 1 folders
//! ```
//!
//! Only the rows between the first two separator lines are data. The entry
//! name is whatever follows the last double-space run of a row.

use std::collections::HashSet;

/// Phrases the tool prints when a password is rejected, lowercase.
const WRONG_PASSWORD_MARKERS: [&str; 3] = [
    "wrong password",
    "can not open encrypted archive",
    "cannot open encrypted archive",
];

/// Extracts top-level entry names from a listing.
///
/// Names containing a directory separator (`/` or `\`) are nested and
/// dropped. The result keeps first-seen order without duplicates.
///
/// # Examples
///
/// ```
/// use arcpass_core::oracle::listing::parse_root_entries;
///
/// let output = "\
/// ---------- ----  ----
/// 2024 ....A  100  bundle
/// 2024 ....A  100  bundle/a.txt
/// ---------- ----  ----
/// 2024        100  1 files";
/// assert_eq!(parse_root_entries(output), vec!["bundle"]);
/// ```
#[must_use]
pub fn parse_root_entries(output: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for (is_data, line) in sections(output) {
        if !is_data {
            continue;
        }
        let name = item_name(line);
        if name.is_empty() || name.contains(['/', '\\']) {
            continue;
        }
        if seen.insert(name) {
            entries.push(name.to_string());
        }
    }

    entries
}

/// Returns `true` if the text reports a rejected password.
///
/// Listing data rows are skipped, so an entry whose name happens to
/// contain a marker phrase does not count.
///
/// # Examples
///
/// ```
/// use arcpass_core::oracle::listing::signals_wrong_password;
///
/// assert!(signals_wrong_password("ERROR: Wrong password : a.txt"));
/// assert!(!signals_wrong_password("--- ---\n2024 ....A  10  Wrong password.txt\n--- ---"));
/// ```
#[must_use]
pub fn signals_wrong_password(text: &str) -> bool {
    sections(text)
        .filter(|&(is_data, _)| !is_data)
        .any(|(_, line)| {
            let lower = line.to_lowercase();
            WRONG_PASSWORD_MARKERS
                .iter()
                .any(|marker| lower.contains(marker))
        })
}

/// Tags each non-separator line with whether it lies between the first two
/// separator lines.
fn sections(output: &str) -> impl Iterator<Item = (bool, &str)> {
    let mut separators = 0u8;
    output.lines().filter_map(move |line| {
        if separators < 2 && is_separator(line) {
            separators += 1;
            return None;
        }
        Some((separators == 1, line))
    })
}

fn is_separator(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("---") && trimmed.chars().all(|c| c == '-' || c == ' ')
}

fn item_name(line: &str) -> &str {
    line.rfind("  ")
        .map_or(line, |idx| &line[idx + 2..])
        .trim()
}

//! Human-readable output formatter with colors and styling.

use super::formatter::Operation;
use super::formatter::OutputFormatter;
use super::formatter::RunPlan;
use super::formatter::counter;
use anyhow::Result;
use arcpass_core::ArchiveReport;
use arcpass_core::ArchiveStatus;
use arcpass_core::RunReport;
use console::Color;
use console::Term;
use console::style;
use console::truncate_str;
use std::time::Duration;

/// Archive names longer than this are shortened on the per-archive line.
const NAME_WIDTH: usize = 40;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            style(text).fg(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }

    fn format_warning(&self, message: &str) {
        if self.use_colors {
            self.line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            self.line(&format!("WARNING: {message}"));
        }
    }

    fn archive_line(&self, report: &ArchiveReport, current: usize, total: usize) -> String {
        let name = truncate_str(report.target.file_name(), NAME_WIDTH, "...");
        let head = format!("{} {name:<NAME_WIDTH$}", counter(current, total));

        match &report.status {
            ArchiveStatus::Found { password } => {
                format!("{head} {} {password}", self.paint("FOUND", Color::Green))
            }
            ArchiveStatus::Extracted {
                password,
                destination,
                layout,
            } => format!(
                "{head} {} {password} -> {} ({layout})",
                self.paint("EXTRACTED", Color::Green),
                destination.display()
            ),
            ArchiveStatus::NotFound { last_failure: None } => {
                format!("{head} {}", self.paint("NOT FOUND", Color::Yellow))
            }
            ArchiveStatus::NotFound {
                last_failure: Some(detail),
            } => format!(
                "{head} {} (last error: {})",
                self.paint("NOT FOUND", Color::Yellow),
                first_line(detail)
            ),
            ArchiveStatus::Failed { detail } => {
                format!("{head} {} {}", self.paint("FAILED", Color::Red), first_line(detail))
            }
        }
    }

    fn format_duration(duration: Duration) -> String {
        let secs = duration.as_secs();
        if secs >= 3600 {
            format!("{}h{}m", secs / 3600, (secs % 3600) / 60)
        } else if secs >= 60 {
            format!("{}m{}s", secs / 60, secs % 60)
        } else if secs > 0 {
            format!("{:.1}s", duration.as_secs_f64())
        } else {
            format!("{}ms", duration.as_millis())
        }
    }
}

fn first_line(text: &str) -> &str {
    text.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim()
}

impl OutputFormatter for HumanFormatter {
    fn format_plan(&self, plan: &RunPlan<'_>) {
        if self.quiet {
            return;
        }

        let verb = match plan.operation {
            Operation::Match => "Matching",
            Operation::Extract => "Extracting",
        };
        self.line(&format!(
            "{verb} {} archive(s) against {} password(s) (mode: {})",
            plan.archives, plan.passwords, plan.mode
        ));
        if self.verbose {
            self.line(&format!("  Archive tool: {}", plan.oracle.display()));
            if let Some(log) = plan.result_log {
                self.line(&format!("  Result log:   {}", log.display()));
            }
        }
    }

    fn format_archive_result(&self, report: &ArchiveReport, current: usize, total: usize) {
        if self.quiet {
            return;
        }

        self.line(&self.archive_line(report, current, total));

        if self.verbose {
            self.line(&format!(
                "    {} candidate(s) in {}",
                report.attempts,
                Self::format_duration(report.duration)
            ));
            let detail = match &report.status {
                ArchiveStatus::Failed { detail }
                | ArchiveStatus::NotFound {
                    last_failure: Some(detail),
                } => Some(detail),
                _ => None,
            };
            for line in detail.into_iter().flat_map(|d| d.lines()) {
                self.line(&format!("    | {line}"));
            }
        }
    }

    fn format_run_report(&self, _operation: Operation, report: &RunReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let total = report.archives.len();
        let found = report.found_count();
        let summary = format!(
            "Done in {}: {found}/{total} unlocked, {} not found, {} failed",
            Self::format_duration(report.duration),
            report.not_found_count(),
            report.failed_count()
        );

        self.line("");
        if self.use_colors {
            let mark = if found == total {
                style("✓").green().bold()
            } else {
                style("✗").yellow().bold()
            };
            self.line(&format!("{mark} {summary}"));
        } else {
            self.line(&summary);
        }

        if let Some(log) = &report.result_log {
            self.line(&format!("  Result log: {}", log.display()));
        }

        for warning in &report.warnings {
            self.format_warning(warning);
        }

        Ok(())
    }

    fn format_error(&self, _operation: &str, _error: &anyhow::Error) {
        // Reported by main's error return.
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use arcpass_core::ArchiveTarget;
    use arcpass_core::ResolvedLayout;
    use std::path::PathBuf;

    fn plain() -> HumanFormatter {
        HumanFormatter {
            verbose: false,
            quiet: false,
            use_colors: false,
            term: Term::stdout(),
        }
    }

    fn report(name: &str, status: ArchiveStatus) -> ArchiveReport {
        ArchiveReport {
            target: ArchiveTarget::new(format!("/data/{name}")).unwrap(),
            status,
            attempts: 2,
            duration: Duration::from_millis(20),
        }
    }

    #[test]
    fn test_found_line() {
        let line = plain().archive_line(
            &report(
                "secret.zip",
                ArchiveStatus::Found {
                    password: "hunter2".into(),
                },
            ),
            1,
            3,
        );
        assert!(line.starts_with("[001/003] secret.zip "));
        assert!(line.ends_with("FOUND hunter2"));
    }

    #[test]
    fn test_extracted_line() {
        let line = plain().archive_line(
            &report(
                "bundle.rar",
                ArchiveStatus::Extracted {
                    password: "pw".into(),
                    destination: PathBuf::from("/data/bundle"),
                    layout: ResolvedLayout::CollapseToSibling,
                },
            ),
            2,
            3,
        );
        assert!(line.contains("EXTRACTED pw -> /data/bundle (smart: sibling folder)"));
    }

    #[test]
    fn test_failed_line_uses_first_line() {
        let line = plain().archive_line(
            &report(
                "x.7z",
                ArchiveStatus::Failed {
                    detail: "\nexit status: 2\n--- 7z output ---\nboom".into(),
                },
            ),
            3,
            3,
        );
        assert!(line.ends_with("FAILED exit status: 2"));
    }

    #[test]
    fn test_long_names_truncated() {
        let long = format!("{}.zip", "a".repeat(80));
        let line = plain().archive_line(
            &report(&long, ArchiveStatus::NotFound { last_failure: None }),
            1,
            1,
        );
        assert!(line.contains("..."));
        assert!(!line.contains(&long));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(
            HumanFormatter::format_duration(Duration::from_millis(250)),
            "250ms"
        );
        assert_eq!(
            HumanFormatter::format_duration(Duration::from_millis(1500)),
            "1.5s"
        );
        assert_eq!(HumanFormatter::format_duration(Duration::from_secs(90)), "1m30s");
        assert_eq!(
            HumanFormatter::format_duration(Duration::from_secs(3661)),
            "1h1m"
        );
    }

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("  \n  second \nthird"), "second");
        assert_eq!(first_line(""), "");
    }
}

//! CLI argument parsing using clap.

use arcpass_core::ExtractionMode;
use arcpass_core::TrialMode;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "arcpass")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find the password of each archive without extracting
    Match(MatchArgs),
    /// Find the password of each archive and extract it
    Extract(ExtractArgs),
    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by `match` and `extract`.
#[derive(clap::Args)]
pub struct RunArgs {
    /// Archive file or directory to scan (default: current directory)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Password list, one candidate per line
    #[arg(short, long, value_name = "FILE", default_value = "passwords.txt")]
    pub passwords: PathBuf,

    /// Directory receiving the timestamped result log
    #[arg(long, value_name = "DIR", default_value = "result")]
    pub result_dir: PathBuf,

    /// Do not write a result log
    #[arg(long, conflicts_with = "result_dir")]
    pub no_result_log: bool,

    /// Path to the 7z executable (default: next to arcpass, then PATH)
    #[arg(long, value_name = "PATH")]
    pub oracle: Option<PathBuf>,

    /// Scan subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Skip archives that already have a same-named folder next to them
    #[arg(long)]
    pub exclude_extracted: bool,
}

#[derive(clap::Args)]
pub struct MatchArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Trial mode
    #[arg(short, long, value_enum, default_value_t = ModeArg::Quick)]
    pub mode: ModeArg,

    /// Per-candidate budget in quick mode, in milliseconds
    #[arg(
        long,
        value_name = "MS",
        default_value = "500",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub quick_timeout_ms: u64,
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Destination policy
    #[arg(short, long, value_enum, default_value_t = LayoutArg::Smart)]
    pub layout: LayoutArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Short budget per candidate; a slow test counts as a match
    Quick,
    /// Wait for the archive tool's verdict
    Accurate,
}

impl From<ModeArg> for TrialMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Quick => Self::Quick,
            ModeArg::Accurate => Self::Accurate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
    /// Decide per archive from its top-level entries
    Smart,
    /// Extract next to the archive
    Current,
    /// Extract into a folder named after the archive
    Sibling,
}

impl From<LayoutArg> for ExtractionMode {
    fn from(layout: LayoutArg) -> Self {
        match layout {
            LayoutArg::Smart => Self::Smart,
            LayoutArg::Current => Self::CurrentDirectory,
            LayoutArg::Sibling => Self::SiblingFolder,
        }
    }
}

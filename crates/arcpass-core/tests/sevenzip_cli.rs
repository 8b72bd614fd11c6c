//! Drives the real subprocess adapter against a stand-in `7z` script.
//!
//! Fixture archives are plain text: line 1 is the password, line 2 holds
//! behavior flags (`slow`, `stall`, `broken`), and every further line is an
//! entry path inside the archive.

#![cfg(unix)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use arcpass_core::ArchiveStatus;
use arcpass_core::ArchiveTarget;
use arcpass_core::Error;
use arcpass_core::ExtractionMode;
use arcpass_core::NoopProgress;
use arcpass_core::OracleClient;
use arcpass_core::OracleConfig;
use arcpass_core::Oracles;
use arcpass_core::PasswordSet;
use arcpass_core::ResolvedLayout;
use arcpass_core::SearchOutcome;
use arcpass_core::Session;
use arcpass_core::TrialConfig;
use arcpass_core::TrialEngine;
use arcpass_core::TrialMode;
use arcpass_core::oracle::ArchiveOracle;
use arcpass_core::oracle::SevenZipCli;
use arcpass_core::oracle::TestStatus;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;
use std::time::Instant;
use tempfile::TempDir;

const FAKE_7Z: &str = r#"#!/bin/sh
cmd="$1"
shift
pw=""
out=""
file=""
for arg in "$@"; do
    case "$arg" in
        -p*) pw="${arg#-p}" ;;
        -o*) out="${arg#-o}" ;;
        -y) ;;
        *) file="$arg" ;;
    esac
done

if [ ! -f "$file" ]; then
    echo "ERROR: $file" >&2
    echo "The system cannot find the file specified." >&2
    exit 2
fi

expected=$(sed -n 1p "$file")
flags=$(sed -n 2p "$file")

case "$flags" in *stall*) exec sleep 30 ;; esac

case "$cmd" in
    t)
        if [ "$pw" != "$expected" ]; then
            echo "ERROR: Wrong password : $file" >&2
            exit 2
        fi
        case "$flags" in *slow*) exec sleep 30 ;; esac
        echo "Everything is Ok"
        ;;
    l)
        if [ "$pw" != "$expected" ]; then
            echo "ERROR: $file" >&2
            echo "Can not open encrypted archive. Wrong password?" >&2
            exit 2
        fi
        echo "Listing archive: $file"
        echo ""
        echo "--"
        echo "Path = $file"
        echo ""
        echo "   Date      Time    Attr         Size   Compressed  Name"
        echo "------------------- ----- ------------ ------------  ------------------------"
        tail -n +3 "$file" | while IFS= read -r entry; do
            echo "2024-01-01 00:00:00 ....A           10           10  $entry"
        done
        echo "------------------- ----- ------------ ------------  ------------------------"
        echo "2024-01-01 00:00:00                 10           10  entries"
        ;;
    x)
        if [ "$pw" != "$expected" ]; then
            echo "ERROR: Wrong password : $file" >&2
            exit 2
        fi
        case "$flags" in
            *broken*)
                echo "ERROR: Data Error : $file" >&2
                exit 2
                ;;
        esac
        mkdir -p "$out"
        tail -n +3 "$file" | while IFS= read -r entry; do
            case "$entry" in
                *.*)
                    mkdir -p "$out/$(dirname "$entry")"
                    echo "$entry" > "$out/$entry"
                    ;;
                *) mkdir -p "$out/$entry" ;;
            esac
        done
        echo "Everything is Ok"
        ;;
    *)
        echo "unsupported command: $cmd" >&2
        exit 7
        ;;
esac
"#;

/// Installs the script once per test binary so no test spawns it while
/// another one still has it open for writing.
fn fake_tool() -> &'static Path {
    static TOOL: OnceLock<(TempDir, PathBuf)> = OnceLock::new();
    let (_dir, path) = TOOL.get_or_init(|| {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("7z");
        fs::write(&path, FAKE_7Z).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        (dir, path)
    });
    path
}

fn adapter(trial: &TrialConfig) -> SevenZipCli {
    let config = OracleConfig::with_path(fake_tool()).unwrap();
    SevenZipCli::new(&config, trial).unwrap()
}

fn fixture(dir: &Path, name: &str, password: &str, flags: &str, entries: &[&str]) -> ArchiveTarget {
    let mut body = format!("{password}\n{flags}\n");
    for entry in entries {
        body.push_str(entry);
        body.push('\n');
    }
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    ArchiveTarget::new(path).unwrap()
}

#[test]
fn test_accurate_search() {
    let temp = TempDir::new().unwrap();
    let target = fixture(temp.path(), "secret.zip", "hunter2", "", &[]);
    let tool = adapter(&TrialConfig::default());
    let client = OracleClient::new(&tool, &target);

    let outcome = TrialEngine::default().find_password(
        &client,
        &PasswordSet::from_lines(["123456", "hunter2", "password"]),
        TrialMode::Accurate,
        &mut NoopProgress,
    );

    assert_eq!(
        outcome,
        SearchOutcome::Found {
            password: "hunter2".into(),
            attempts: 2
        }
    );
}

#[test]
fn test_quick_mode_slow_verification_is_a_match() {
    let temp = TempDir::new().unwrap();
    let target = fixture(temp.path(), "big.rar", "hunter2", "slow", &[]);
    let trial = TrialConfig::default().with_quick_budget(Duration::from_millis(1500));
    let tool = adapter(&trial);
    let client = OracleClient::new(&tool, &target);

    let started = Instant::now();
    let outcome = TrialEngine::new(trial).find_password(
        &client,
        &PasswordSet::from_lines(["wrong", "hunter2"]),
        TrialMode::Quick,
        &mut NoopProgress,
    );

    assert_eq!(
        outcome,
        SearchOutcome::Found {
            password: "hunter2".into(),
            attempts: 2
        }
    );
    // The stalled process was killed rather than waited for.
    assert!(started.elapsed() < Duration::from_secs(20));
}

#[test]
fn test_quick_mode_timeout_wins_regardless_of_password() {
    let temp = TempDir::new().unwrap();
    let target = fixture(temp.path(), "stuck.7z", "hunter2", "stall", &[]);
    let trial = TrialConfig::default().with_quick_budget(Duration::from_millis(300));
    let tool = adapter(&trial);

    let status = tool
        .test(&target, "not-it", trial.quick_budget)
        .unwrap();
    assert_eq!(status, TestStatus::TimedOut);

    let client = OracleClient::new(&tool, &target);
    let outcome = TrialEngine::new(trial).find_password(
        &client,
        &PasswordSet::from_lines(["not-it", "hunter2"]),
        TrialMode::Quick,
        &mut NoopProgress,
    );
    assert_eq!(
        outcome,
        SearchOutcome::Found {
            password: "not-it".into(),
            attempts: 1
        }
    );
}

#[test]
fn test_accurate_ceiling_is_a_tool_failure() {
    let temp = TempDir::new().unwrap();
    let target = fixture(temp.path(), "stuck.zip", "pw", "stall", &[]);
    let trial = TrialConfig::default().with_accurate_ceiling(Duration::from_millis(500));
    let tool = adapter(&trial);
    let client = OracleClient::new(&tool, &target);

    let outcome = TrialEngine::new(trial).find_password(
        &client,
        &PasswordSet::from_lines(["pw", "other"]),
        TrialMode::Accurate,
        &mut NoopProgress,
    );
    assert!(matches!(outcome, SearchOutcome::Aborted { attempts: 1, .. }));
}

#[test]
fn test_list_root_entries() {
    let temp = TempDir::new().unwrap();
    let target = fixture(
        temp.path(),
        "bundle.7z",
        "pw",
        "",
        &["bundle", "bundle/readme.txt", "bundle/docs", "bundle/docs/a.txt"],
    );
    let tool = adapter(&TrialConfig::default());

    assert_eq!(tool.list_root_entries(&target, "pw").unwrap(), vec!["bundle"]);
    assert!(matches!(
        tool.list_root_entries(&target, "nope"),
        Err(Error::WrongPassword)
    ));
}

#[test]
fn test_smart_extract_collapses_wrapped_archive() {
    let temp = TempDir::new().unwrap();
    let target = fixture(
        temp.path(),
        "bundle.zip",
        "pw",
        "",
        &["bundle", "bundle/readme.txt"],
    );
    let tool = adapter(&TrialConfig::default());
    let mut session = Session::new(
        Oracles::new().with(arcpass_core::formats::Backend::SevenZip, tool),
        TrialConfig::default(),
    );

    let report = session.extract_archives(
        &[target],
        &PasswordSet::from_lines(["x", "pw"]),
        ExtractionMode::Smart,
        &mut NoopProgress,
    );

    assert_eq!(
        report.archives[0].status,
        ArchiveStatus::Extracted {
            password: "pw".into(),
            destination: temp.path().to_path_buf(),
            layout: ResolvedLayout::CollapseToCurrent,
        }
    );
    assert!(temp.path().join("bundle").join("readme.txt").is_file());
    assert!(!temp.path().join("bundle").join("bundle").exists());
}

#[test]
fn test_smart_extract_loose_files_into_sibling() {
    let temp = TempDir::new().unwrap();
    let target = fixture(
        temp.path(),
        "bundle.rar",
        "hunter2",
        "",
        &["report.pdf", "notes.txt"],
    );
    let tool = adapter(&TrialConfig::default());
    let mut session = Session::new(
        Oracles::new().with(arcpass_core::formats::Backend::SevenZip, tool),
        TrialConfig::default(),
    );

    let report = session.extract_archives(
        &[target],
        &PasswordSet::from_lines(["hunter2"]),
        ExtractionMode::Smart,
        &mut NoopProgress,
    );

    assert_eq!(
        report.archives[0].destination(),
        Some(temp.path().join("bundle").as_path())
    );
    assert!(temp.path().join("bundle").join("report.pdf").is_file());
    assert!(temp.path().join("bundle").join("notes.txt").is_file());
    assert!(!temp.path().join("report.pdf").exists());
}

#[test]
fn test_current_directory_mode() {
    let temp = TempDir::new().unwrap();
    let target = fixture(temp.path(), "flat.zip", "pw", "", &["a.txt"]);
    let tool = adapter(&TrialConfig::default());
    let mut session = Session::new(
        Oracles::new().with(arcpass_core::formats::Backend::SevenZip, tool),
        TrialConfig::default(),
    );

    let report = session.extract_archives(
        &[target],
        &PasswordSet::from_lines(["bad", "pw"]),
        ExtractionMode::CurrentDirectory,
        &mut NoopProgress,
    );

    assert_eq!(report.found_count(), 1);
    assert!(temp.path().join("a.txt").is_file());
}

#[test]
fn test_extraction_failure_reported_with_tool_output() {
    let temp = TempDir::new().unwrap();
    let target = fixture(temp.path(), "damaged.7z", "pw", "broken", &["a.txt"]);
    let tool = adapter(&TrialConfig::default());
    let mut session = Session::new(
        Oracles::new().with(arcpass_core::formats::Backend::SevenZip, tool),
        TrialConfig::default(),
    );

    let report = session.extract_archives(
        &[target],
        &PasswordSet::from_lines(["pw", "other"]),
        ExtractionMode::SiblingFolder,
        &mut NoopProgress,
    );

    let ArchiveStatus::NotFound { last_failure } = &report.archives[0].status else {
        panic!("unexpected status {:?}", report.archives[0].status);
    };
    let detail = last_failure.as_deref().unwrap();
    assert!(detail.contains("--- 7z output ---"));
    assert!(detail.contains("Data Error"));
    assert_eq!(report.archives[0].attempts, 2);
}

#[test]
fn test_relative_tool_path_runs_from_archive_dir() {
    let link_dir = TempDir::new_in(".").unwrap();
    std::os::unix::fs::symlink(fake_tool(), link_dir.path().join("7z")).unwrap();
    let relative = Path::new(".")
        .join(link_dir.path().file_name().unwrap())
        .join("7z");

    let archives = TempDir::new().unwrap();
    let target = fixture(archives.path(), "secret.zip", "hunter2", "", &[]);
    let trial = TrialConfig::default();
    let config = OracleConfig::with_path(&relative).unwrap();
    let tool = SevenZipCli::new(&config, &trial).unwrap();

    assert_eq!(
        tool.test(&target, "hunter2", trial.accurate_ceiling).unwrap(),
        TestStatus::Accepted
    );
}

#[test]
fn test_entry_named_like_rejection_is_not_wrong_password() {
    let temp = TempDir::new().unwrap();
    let target = fixture(
        temp.path(),
        "hints.7z",
        "pw",
        "",
        &["Wrong password hints.txt", "data.bin"],
    );
    let tool = adapter(&TrialConfig::default());

    assert_eq!(
        tool.list_root_entries(&target, "pw").unwrap(),
        vec!["Wrong password hints.txt", "data.bin"]
    );
    assert!(matches!(
        tool.list_root_entries(&target, "nope"),
        Err(Error::WrongPassword)
    ));
}

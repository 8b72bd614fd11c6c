//! `7z` command-line adapter.

use std::path::Path;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncRead;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::runtime::Runtime;
use tracing::debug;
use tracing::warn;

use super::ArchiveOracle;
use super::TestStatus;
use super::listing::parse_root_entries;
use super::listing::signals_wrong_password;
use crate::ArchiveTarget;
use crate::Error;
use crate::OracleConfig;
use crate::Result;
use crate::TrialConfig;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Adapter that drives the external `7z` executable.
///
/// The tool runs with the archive's directory as working directory and the
/// bare file name as argument. Stdin is closed so a password prompt can never
/// block. Calls are executed on a private single-threaded runtime; a call
/// that exceeds its budget has its process killed and reaped before the
/// call returns.
///
/// Invocations:
/// - test: `7z t -p<password> <file>`
/// - list: `7z l -p<password> <file>`
/// - extract: `7z x <file> -p<password> -o<dest> -y`
pub struct SevenZipCli {
    executable: PathBuf,
    ceiling: Duration,
    runtime: Runtime,
}

/// Outcome of one bounded invocation.
enum Invocation {
    Finished {
        status: ExitStatus,
        stdout: Vec<u8>,
        stderr: Vec<u8>,
    },
    TimedOut,
}

impl SevenZipCli {
    /// Creates the adapter from the resolved tool location.
    ///
    /// `trial.accurate_ceiling` bounds listing and extraction calls.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the async runtime cannot be built.
    pub fn new(config: &OracleConfig, trial: &TrialConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            executable: config.executable().to_path_buf(),
            ceiling: trial.accurate_ceiling,
            runtime,
        })
    }

    /// Path of the executable being driven.
    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    fn command(&self, target: &ArchiveTarget) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.current_dir(target.container())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(windows)]
        cmd.creation_flags(CREATE_NO_WINDOW);
        cmd
    }

    fn run(&self, mut cmd: Command, budget: Duration) -> Result<Invocation> {
        self.runtime.block_on(async {
            let mut child = cmd.spawn().map_err(|e| {
                Error::oracle(format!(
                    "cannot run '{}': {e}",
                    self.executable.display()
                ))
            })?;

            let stdout = child.stdout.take();
            let stderr = child.stderr.take();

            let waited = tokio::time::timeout(budget, async {
                tokio::try_join!(child.wait(), drain(stdout), drain(stderr))
            })
            .await;

            match waited {
                Ok(Ok((status, stdout, stderr))) => Ok(Invocation::Finished {
                    status,
                    stdout,
                    stderr,
                }),
                Ok(Err(e)) => Err(Error::oracle(format!(
                    "I/O error while waiting for '{}': {e}",
                    self.executable.display()
                ))),
                Err(_) => {
                    if let Err(e) = child.kill().await {
                        warn!("failed to stop timed out archive tool: {e}");
                    }
                    Ok(Invocation::TimedOut)
                }
            }
        })
    }
}

async fn drain<R: AsyncRead + Unpin>(reader: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut reader) = reader {
        reader.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

fn combined_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut text = String::from_utf8_lossy(stdout).into_owned();
    let err = String::from_utf8_lossy(stderr);
    if !err.trim().is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&err);
    }
    text
}

impl ArchiveOracle for SevenZipCli {
    fn test(&self, target: &ArchiveTarget, password: &str, budget: Duration) -> Result<TestStatus> {
        let mut cmd = self.command(target);
        cmd.arg("t")
            .arg(format!("-p{password}"))
            .arg(target.file_name());

        match self.run(cmd, budget)? {
            Invocation::Finished { status, .. } if status.success() => Ok(TestStatus::Accepted),
            Invocation::Finished { status, .. } => {
                debug!(archive = %target.file_name(), %status, "test rejected");
                Ok(TestStatus::Rejected)
            }
            Invocation::TimedOut => Ok(TestStatus::TimedOut),
        }
    }

    fn list_root_entries(&self, target: &ArchiveTarget, password: &str) -> Result<Vec<String>> {
        let mut cmd = self.command(target);
        cmd.arg("l")
            .arg(format!("-p{password}"))
            .arg(target.file_name());

        match self.run(cmd, self.ceiling)? {
            Invocation::Finished {
                status,
                stdout,
                stderr,
            } => {
                let out = String::from_utf8_lossy(&stdout);
                let err = String::from_utf8_lossy(&stderr);
                // Checked per stream: stderr must never be read as data rows
                // of a listing cut short on stdout.
                if signals_wrong_password(&err) || signals_wrong_password(&out) {
                    return Err(Error::WrongPassword);
                }
                if !status.success() {
                    return Err(Error::oracle(format!(
                        "listing failed ({status}):\n{}",
                        combined_output(&stdout, &stderr).trim_end()
                    )));
                }
                Ok(parse_root_entries(&out))
            }
            Invocation::TimedOut => Err(Error::oracle(format!(
                "listing did not finish within {:?}",
                self.ceiling
            ))),
        }
    }

    fn extract(&self, target: &ArchiveTarget, password: &str, destination: &Path) -> Result<()> {
        let mut out_flag = std::ffi::OsString::from("-o");
        out_flag.push(destination.as_os_str());

        let mut cmd = self.command(target);
        cmd.arg("x")
            .arg(target.file_name())
            .arg(format!("-p{password}"))
            .arg(out_flag)
            .arg("-y");

        match self.run(cmd, self.ceiling)? {
            Invocation::Finished { status, .. } if status.success() => Ok(()),
            Invocation::Finished {
                status,
                stdout,
                stderr,
            } => Err(Error::ExtractionFailed {
                detail: format!(
                    "{status}\n--- 7z output ---\n{}",
                    combined_output(&stdout, &stderr).trim_end()
                ),
            }),
            Invocation::TimedOut => Err(Error::oracle(format!(
                "extraction did not finish within {:?}",
                self.ceiling
            ))),
        }
    }

    fn name(&self) -> &'static str {
        "7z"
    }
}

impl std::fmt::Debug for SevenZipCli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SevenZipCli")
            .field("executable", &self.executable)
            .field("ceiling", &self.ceiling)
            .finish_non_exhaustive()
    }
}

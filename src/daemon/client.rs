// src/daemon/client.rs
use crate::utils::error::TerminalError;
use futures::future::BoxFuture;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Access to the coin daemon's command-line interface
///
/// Every daemon interaction (mining, stats queries, wallet) goes through
/// this trait so that the mining session can be driven by a scripted
/// daemon in tests.
pub trait DaemonRpc: Send + Sync {
    /// Runs one daemon command and returns its stdout
    ///
    /// # Arguments
    /// * `args` - Command and arguments, e.g. `["generate", "1"]`
    ///
    /// # Returns
    /// * `Ok(String)` - Standard output of a successful (zero-exit) run
    /// * `Err(TerminalError::ToolNotFound)` - The binary does not exist
    /// * `Err(TerminalError::ToolInvocation)` - The binary exited non-zero
    fn call<'a>(&'a self, args: &'a [&'a str]) -> BoxFuture<'a, Result<String, TerminalError>>;
}

/// Commands left running if the caller goes away, so the daemon finishes
/// the block instead of being killed mid-`generate`
const DETACHED_COMMANDS: &[&str] = &["generate"];

fn kill_on_drop(args: &[&str]) -> bool {
    args.first().is_none_or(|cmd| !DETACHED_COMMANDS.contains(cmd))
}

/// [`DaemonRpc`] backed by the real daemon CLI binary
#[derive(Debug, Clone)]
pub struct CliDaemon {
    /// Path or bare name (looked up in `PATH`) of the CLI binary
    cli_path: PathBuf,
}

impl CliDaemon {
    /// Creates a client for the given CLI binary
    pub fn new(cli_path: impl Into<PathBuf>) -> Self {
        CliDaemon {
            cli_path: cli_path.into(),
        }
    }

    /// Path of the CLI binary this client invokes
    pub fn cli_path(&self) -> &Path {
        &self.cli_path
    }

    async fn run(&self, args: &[&str]) -> Result<String, TerminalError> {
        log::debug!("{} {}", self.cli_path.display(), args.join(" "));

        let output = Command::new(&self.cli_path)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(kill_on_drop(args))
            .output()
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => {
                    TerminalError::ToolNotFound(self.cli_path.display().to_string())
                }
                _ => TerminalError::IoError(e),
            })?;

        if !output.status.success() {
            return Err(TerminalError::ToolInvocation {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl DaemonRpc for CliDaemon {
    fn call<'a>(&'a self, args: &'a [&'a str]) -> BoxFuture<'a, Result<String, TerminalError>> {
        Box::pin(self.run(args))
    }
}

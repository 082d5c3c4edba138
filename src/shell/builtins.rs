// src/shell/builtins.rs
//! Host-side built-in commands: directory navigation, clock and the
//! fallback to the system shell

use crate::miner::Report;
use crate::utils::error::TerminalError;
use chrono::Local;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// ANSI sequence that clears the screen and homes the cursor
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Help text for `help`
pub const HELP: &str = "\
Strayacoin Terminal Commands:
  mine <blocks>       - Mine specified number of blocks once then stop
  mine -r <blocks>    - Mine specified number of blocks repeatedly until stopped
  stop                - Stop the running mining session (also Ctrl-C)
  wallet [command]    - Interact with Strayacoin wallet
  help                - Show this help
  clear               - Clear the terminal
  exit                - Exit the application

System Commands:
  ls/dir              - List directory contents
  cd <directory>      - Change directory
  pwd                 - Print working directory
  date                - Show current date
  time                - Show current time
  <any command>       - Execute system command";

/// Entries of the current directory, sorted, one per line
pub fn list_directory() -> Result<String, TerminalError> {
    let mut names = std::fs::read_dir(".")?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<Result<Vec<_>, _>>()?;
    names.sort();
    Ok(names.join("\n"))
}

/// Changes the process working directory
pub fn change_directory(dir: &str) -> Result<String, TerminalError> {
    std::env::set_current_dir(Path::new(dir))?;
    Ok(format!("Changed directory to: {}", working_directory()?))
}

/// Current working directory as display text
pub fn working_directory() -> Result<String, TerminalError> {
    Ok(std::env::current_dir()?.display().to_string())
}

/// Today's local date, `YYYY-MM-DD`
pub fn date() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Current local time, `HH:MM:SS`
pub fn time() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Runs a line through the host shell
///
/// # Returns
/// Up to two reports: stdout as output and stderr as an error, each
/// only when non-empty. The exit status itself is not reported.
pub async fn system_command(line: &str) -> Result<Vec<Report>, TerminalError> {
    let mut cmd = if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(line);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(line);
        cmd
    };

    let output = cmd.stdin(Stdio::null()).output().await?;

    let mut reports = Vec::new();
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        reports.push(Report::output(stdout.trim_end()));
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        reports.push(Report::error(stderr.trim_end()));
    }
    Ok(reports)
}

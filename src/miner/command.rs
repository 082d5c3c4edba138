// src/miner/command.rs
use crate::daemon::DaemonRpc;
use crate::utils::error::TerminalError;
use std::sync::Arc;

/// Runs the daemon's mining command
///
/// The daemon does the actual proof-of-work; this only invokes
/// `generate <n>` and hands back what it printed.
#[derive(Clone)]
pub struct MinerCommand {
    daemon: Arc<dyn DaemonRpc>,
}

impl MinerCommand {
    /// Creates a miner command on top of a daemon client
    pub fn new(daemon: Arc<dyn DaemonRpc>) -> Self {
        MinerCommand { daemon }
    }

    /// Mines for the given block position
    ///
    /// The position within the current pass is passed as the `generate`
    /// argument.
    ///
    /// # Returns
    /// * `Ok(String)` - Daemon stdout (typically the list of block hashes)
    /// * `Err(TerminalError::ToolNotFound)` - The daemon CLI is missing
    /// * `Err(TerminalError::ToolInvocation)` - The daemon exited non-zero
    pub async fn run(&self, block: u32) -> Result<String, TerminalError> {
        let count = block.to_string();
        self.daemon.call(&["generate", count.as_str()]).await
    }
}

/// Text of the single error line for a failed mining command
pub fn failure_text(error: &TerminalError) -> String {
    match error {
        TerminalError::ToolNotFound(path) => {
            format!("Mining aborted, daemon CLI not found: {}", path)
        }
        TerminalError::ToolInvocation { stderr, .. } if !stderr.is_empty() => {
            format!("Mining error: {}", stderr)
        }
        TerminalError::ToolInvocation { code, .. } => match code {
            Some(code) => format!("Mining error: daemon exited with status {}", code),
            None => "Mining error: daemon was terminated".to_string(),
        },
        other => format!("Mining error: {}", other),
    }
}

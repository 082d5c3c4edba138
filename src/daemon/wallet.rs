// src/daemon/wallet.rs
//! Thin wallet commands on top of the daemon CLI
//!
//! No key handling happens here: balance, transfers and wallet info are
//! all delegated to the daemon and its output is passed through.

use crate::daemon::client::DaemonRpc;
use crate::utils::error::TerminalError;

/// Wallet subcommands understood by the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletCommand {
    /// `wallet balance`
    Balance,
    /// `wallet send <amount> <address>`
    Send {
        /// Amount as typed by the user, passed through verbatim
        amount: String,
        /// Destination address
        address: String,
    },
    /// `wallet info`
    Info,
}

/// Help text for a bare `wallet`
pub const WALLET_USAGE: &str = "Wallet commands:\n  balance    - Show wallet balance\n  send <amount> <address>\n  info       - Show wallet info";

impl WalletCommand {
    /// Parses the arguments following `wallet`
    ///
    /// # Returns
    /// * `Ok(None)` - No subcommand, the caller should print [`WALLET_USAGE`]
    /// * `Ok(Some(cmd))` - A recognised subcommand
    /// * `Err(TerminalError::InvalidRequest)` - Unknown or malformed subcommand
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Option<Self>, TerminalError> {
        let Some(sub) = args.first() else {
            return Ok(None);
        };

        match (sub.as_ref().to_lowercase().as_str(), args.len()) {
            ("balance", _) => Ok(Some(WalletCommand::Balance)),
            ("info", _) => Ok(Some(WalletCommand::Info)),
            ("send", 3) => Ok(Some(WalletCommand::Send {
                amount: args[1].as_ref().to_string(),
                address: args[2].as_ref().to_string(),
            })),
            _ => Err(TerminalError::InvalidRequest(
                "Invalid wallet command".to_string(),
            )),
        }
    }

    /// Runs the command against the daemon and formats the result line
    pub async fn execute(&self, daemon: &dyn DaemonRpc) -> Result<String, TerminalError> {
        match self {
            WalletCommand::Balance => {
                let out = daemon.call(&["getbalance"]).await?;
                Ok(format!("Wallet balance: {}", out.trim()))
            }
            WalletCommand::Send { amount, address } => {
                let out = daemon
                    .call(&["sendtoaddress", address.as_str(), amount.as_str()])
                    .await?;
                Ok(format!("Transaction ID: {}", out.trim()))
            }
            WalletCommand::Info => {
                let out = daemon.call(&["getwalletinfo"]).await?;
                Ok(out.trim_end().to_string())
            }
        }
    }
}

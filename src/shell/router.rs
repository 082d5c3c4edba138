// src/shell/router.rs
use crate::daemon::{DaemonRpc, WalletCommand, wallet::WALLET_USAGE};
use crate::miner::{Report, ReportSink, SessionManager};
use crate::shell::builtins;
use crate::types::MiningRequest;
use crate::utils::error::TerminalError;
use std::sync::Arc;

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Blank line
    Empty,
    /// `mine [-r] <n>`
    Mine(MiningRequest),
    /// `stop`
    Stop,
    /// `wallet [...]`; `None` prints the wallet usage
    Wallet(Option<WalletCommand>),
    /// `help`
    Help,
    /// `clear`
    Clear,
    /// `exit` / `quit`
    Exit,
    /// `ls` / `dir`
    List,
    /// `cd <dir>`
    ChangeDir(String),
    /// `pwd`
    Pwd,
    /// `date`
    Date,
    /// `time`
    Time,
    /// Anything else, handed to the host shell verbatim
    System(String),
}

impl ShellCommand {
    /// Parses one input line
    ///
    /// Only the command keyword and flags are case-insensitive; other
    /// arguments (paths, addresses) are kept as typed.
    ///
    /// # Returns
    /// * `Err(TerminalError::InvalidRequest)` - Malformed `mine` or `wallet`
    pub fn parse(line: &str) -> Result<Self, TerminalError> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(keyword) = parts.first() else {
            return Ok(ShellCommand::Empty);
        };
        let args = &parts[1..];

        let command = match keyword.to_lowercase().as_str() {
            "mine" => {
                let args: Vec<String> = args.iter().map(|a| a.to_lowercase()).collect();
                ShellCommand::Mine(MiningRequest::from_args(&args)?)
            }
            "stop" => ShellCommand::Stop,
            "wallet" => ShellCommand::Wallet(WalletCommand::parse(args)?),
            "help" => ShellCommand::Help,
            "clear" => ShellCommand::Clear,
            "exit" | "quit" => ShellCommand::Exit,
            "ls" | "dir" => ShellCommand::List,
            "cd" if !args.is_empty() => ShellCommand::ChangeDir(args.join(" ")),
            "pwd" => ShellCommand::Pwd,
            "date" => ShellCommand::Date,
            "time" => ShellCommand::Time,
            _ => ShellCommand::System(line.trim().to_string()),
        };
        Ok(command)
    }
}

/// What the input loop should do after a line was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line
    Continue,
    /// Leave the shell
    Exit,
}

/// Routes input lines to built-ins, the wallet, the mining session or
/// the host shell
///
/// Every command produces its output through the [`ReportSink`]; each
/// failure results in exactly one error (or warning) line.
pub struct Shell {
    sessions: SessionManager,
    daemon: Arc<dyn DaemonRpc>,
    sink: ReportSink,
}

impl Shell {
    /// Creates a shell around a session manager and daemon client
    pub fn new(sessions: SessionManager, daemon: Arc<dyn DaemonRpc>, sink: ReportSink) -> Self {
        Shell {
            sessions,
            daemon,
            sink,
        }
    }

    /// Prints the greeting shown when the shell starts
    pub fn welcome(&self) {
        self.sink.emit(Report::output(format!(
            "Strayacoin Terminal {} on {} {}\nType \"help\" for available commands.",
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS,
            std::env::consts::ARCH
        )));
    }

    /// Session manager used for `mine` / `stop`
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Handles one input line
    pub async fn execute(&self, line: &str) -> Flow {
        match ShellCommand::parse(line) {
            Ok(command) => self.dispatch(command).await,
            Err(e) => {
                self.sink.emit(Report::error(e.to_string()));
                Flow::Continue
            }
        }
    }

    async fn dispatch(&self, command: ShellCommand) -> Flow {
        match command {
            ShellCommand::Empty => {}
            ShellCommand::Mine(request) => {
                // Rejection already produced its warning line.
                if let Err(e) = self.sessions.start(request) {
                    log::debug!("Start rejected: {}", e);
                }
            }
            ShellCommand::Stop => {
                self.sessions.stop();
            }
            ShellCommand::Wallet(None) => self.sink.emit(Report::output(WALLET_USAGE)),
            ShellCommand::Wallet(Some(wallet)) => match wallet.execute(self.daemon.as_ref()).await
            {
                Ok(text) => {
                    let report = match wallet {
                        WalletCommand::Send { .. } => Report::success(text),
                        _ => Report::output(text),
                    };
                    self.sink.emit(report);
                }
                Err(e) => self.sink.emit(Report::error(format!("Wallet error: {}", e))),
            },
            ShellCommand::Help => self.sink.emit(Report::output(builtins::HELP)),
            ShellCommand::Clear => self.sink.emit(Report::output(builtins::CLEAR_SCREEN)),
            ShellCommand::Exit => {
                if self.sessions.is_active() {
                    self.sessions.stop();
                }
                return Flow::Exit;
            }
            ShellCommand::List => self.emit_result(builtins::list_directory()),
            ShellCommand::ChangeDir(dir) => self.emit_result(builtins::change_directory(&dir)),
            ShellCommand::Pwd => self.emit_result(builtins::working_directory()),
            ShellCommand::Date => self.sink.emit(Report::output(builtins::date())),
            ShellCommand::Time => self.sink.emit(Report::output(builtins::time())),
            ShellCommand::System(line) => match builtins::system_command(&line).await {
                Ok(reports) => reports.into_iter().for_each(|r| self.sink.emit(r)),
                Err(e) => self.sink.emit(Report::error(format!("Error: {}", e))),
            },
        }
        Flow::Continue
    }

    fn emit_result(&self, result: Result<String, TerminalError>) {
        match result {
            Ok(text) => self.sink.emit(Report::output(text)),
            Err(e) => self.sink.emit(Report::error(format!("Error: {}", e))),
        }
    }
}

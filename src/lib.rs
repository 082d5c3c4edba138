//! Strayacoin Terminal - a line-oriented shell for operating the Strayacoin daemon
//!
//! This crate provides:
//! - A cancellable, optionally repeating mining session driven through the daemon CLI
//! - Per-block network statistics gathered from the daemon, the block explorer and an
//!   exchange ticker, each source failing independently
//! - Wallet shortcuts and a small command shell around it all

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Mining command, session control and reports
pub mod miner;

/// Daemon CLI access and wallet commands
pub mod daemon;

/// Statistics fetching and derivation
pub mod stats;

/// Interactive shell: parsing and dispatch
pub mod shell;

/// Utility functions and error handling
pub mod utils;

/// Command-line interface definitions
pub mod cli;

/// Configuration management
pub mod config;

/// Shared type definitions
pub mod types;

// Core exports
pub use cli::Commands;
pub use config::Config;
pub use daemon::{CliDaemon, DaemonRpc};
pub use miner::{MinerCommand, Report, ReportKind, ReportSink, SessionManager};
pub use shell::Shell;
pub use stats::{StatsAggregator, StatsProvider};
pub use types::{MiningRequest, ReportMode};
pub use utils::{TerminalError, init_logging};

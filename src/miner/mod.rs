// src/miner/mod.rs
//! Mining orchestration
//!
//! Mining itself is done by the daemon. This module drives it:
//! - Invoking the daemon's mining command once per block
//! - Running cancellable, optionally repeating sessions
//! - Turning each mined block into a report line

/// Daemon mining command
pub mod command;

/// Report lines and block report formatting
pub mod report;

/// Session manager and worker loop
pub mod session;

// Re-export main components for cleaner imports
pub use self::command::MinerCommand;
pub use self::report::{BlockReport, Report, ReportKind, ReportSink};
pub use self::session::{CancelToken, SessionHandle, SessionManager};

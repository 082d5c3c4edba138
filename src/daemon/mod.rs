// src/daemon/mod.rs
//! Daemon access
//!
//! The coin daemon is only ever reached through its CLI binary, run as
//! a subprocess per call.

/// Subprocess client and the [`DaemonRpc`] seam
pub mod client;

/// Wallet commands delegated to the daemon
pub mod wallet;

pub use client::{CliDaemon, DaemonRpc};
pub use wallet::WalletCommand;

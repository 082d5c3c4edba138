// src/shell/mod.rs
//! Line-oriented command shell
//!
//! Parses user input and routes it to the mining session, the wallet,
//! a handful of built-ins or the host shell.

/// Directory, clock and host-shell built-ins
pub mod builtins;

/// Command parsing and dispatch
pub mod router;

pub use router::{Flow, Shell, ShellCommand};

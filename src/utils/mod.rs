// src/utils/mod.rs
//! Utilities module for common functionality
//!
//! Shared error handling, logging and number formatting.

/// Error types and handling utilities
///
/// Contains the [`TerminalError`] enum which defines all error conditions
/// surfaced by the terminal, along with conversion implementations.
pub mod error;

/// Logging configuration
pub mod logging;

/// Report number formatting
pub mod format;

// Re-export for easier access
pub use error::TerminalError;
pub use logging::init_logging;

//! Logging configuration and utilities
//!
//! Diagnostics go to stderr through `env_logger` so they never mix with
//! the report lines the terminal prints on stdout.

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::env;

/// Initializes the logging subsystem
///
/// # Configuration
/// - Logs to stderr
/// - Default log level: Warn, or Debug when `verbose` is set
/// - Respects `RUST_LOG` environment variable if set
pub fn init_logging(verbose: bool) {
    let mut builder = common_log_config();

    if env::var("RUST_LOG").is_err() {
        builder.filter_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        });
    } else {
        builder.parse_env("RUST_LOG");
    }

    // A second init (e.g. from tests) is harmless.
    let _ = builder.try_init();
}

/// Creates a base logger builder with the shared line format
///
/// Format: `[<ts> <level> <module>:<line>] <message>`
fn common_log_config() -> Builder {
    let mut builder = Builder::new();

    builder
        .format(|buf, record| {
            use std::io::Write;
            let ts = buf.timestamp_seconds();
            let level = record.level();
            let module = record.module_path().unwrap_or_default();
            let line = record.line().unwrap_or(0);

            writeln!(
                buf,
                "[{} {} {}:{}] {}",
                ts,
                level,
                module,
                line,
                record.args()
            )
        })
        .target(Target::Stderr);

    builder
}

//! Ambient logging setup plus the CLI's own fatal-error printer.
//!
//! Pipeline progress (`log::debug!`/`log::trace!` in [crate::first_pass]
//! and [crate::lib]) goes through `env_logger`. User-facing diagnostics —
//! the `AsmError` reported to the user on a bad assembly — are a separate
//! channel: [error] prints them straight to stderr regardless of the
//! configured log level, the way the original CHIP-8 tooling's `error()`
//! helper always surfaced a failure reason.

use colored::Colorize;
use log::LevelFilter;

/// Initialize the global logger at a level derived from a `-v` count:
/// 0 verbose flags is `warn`, 1 is `info`, 2 is `debug`, 3+ is `trace`.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).init();
}

/// Pretty-print a fatal assembly error to the console.
pub fn error(message: impl std::fmt::Display) {
    let error_title = "error:".red().bold();
    eprintln!("{} {}", error_title, message);
}

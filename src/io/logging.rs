//! Console log backend that cooperates with progress bars
//!
//! Library code reports through the `log` macros. The binary installs
//! [`ConsoleLogger`], which writes to stderr and hides any active progress
//! bars while a line is printed.

use indicatif::MultiProgress;
use log::{LevelFilter, Log, Metadata, Record};

/// Stderr logger with optional progress bar coordination
pub struct ConsoleLogger {
    level: LevelFilter,
    progress: Option<MultiProgress>,
}

impl ConsoleLogger {
    /// Create a logger passing records at or above `level`
    pub const fn new(level: LevelFilter, progress: Option<MultiProgress>) -> Self {
        Self { level, progress }
    }

    /// Render a record as a single line
    pub fn format_record(record: &Record<'_>) -> String {
        format!("[{:<5}] {}", record.level(), record.args())
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    // Allow print for the log sink itself
    #[allow(clippy::print_stderr)]
    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = Self::format_record(record);
        match &self.progress {
            Some(progress) => progress.suspend(|| eprintln!("{line}")),
            None => eprintln!("{line}"),
        }
    }

    fn flush(&self) {}
}

/// Level implied by the `--quiet` and `--verbose` flags
///
/// Quiet wins when both are given.
pub const fn level_for(quiet: bool, verbose: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Install the console logger as the global `log` backend
///
/// Returns `false` if a logger was already installed, in which case the
/// existing one stays active.
pub fn init(level: LevelFilter, progress: Option<MultiProgress>) -> bool {
    let logger: &'static ConsoleLogger = Box::leak(Box::new(ConsoleLogger::new(level, progress)));
    let installed = log::set_logger(logger).is_ok();
    if installed {
        log::set_max_level(level);
    }
    installed
}

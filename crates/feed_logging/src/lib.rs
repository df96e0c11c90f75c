#![deny(missing_docs)]
//! Shared logging utilities for the feed workspace.
//!
//! Every crate logs through the `feed_*` macros so that all records share the
//! `feed` target prefix and can be filtered as one group. The initializers
//! install a `simplelog` backend for the binary and for tests.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Default log file written by [`LogDestination::File`] and [`LogDestination::Both`].
pub const DEFAULT_LOG_FILE: &str = "./feed.log";

/// Logs a trace-level message under the `feed` target.
#[macro_export]
macro_rules! feed_trace {
    ($($arg:tt)*) => {{
        log::trace!(target: "feed", $($arg)*);
    }};
}

/// Logs a debug-level message under the `feed` target.
#[macro_export]
macro_rules! feed_debug {
    ($($arg:tt)*) => {{
        log::debug!(target: "feed", $($arg)*);
    }};
}

/// Logs an info-level message under the `feed` target.
#[macro_export]
macro_rules! feed_info {
    ($($arg:tt)*) => {{
        log::info!(target: "feed", $($arg)*);
    }};
}

/// Logs a warn-level message under the `feed` target.
#[macro_export]
macro_rules! feed_warn {
    ($($arg:tt)*) => {{
        log::warn!(target: "feed", $($arg)*);
    }};
}

/// Logs an error-level message under the `feed` target.
#[macro_export]
macro_rules! feed_error {
    ($($arg:tt)*) => {{
        log::error!(target: "feed", $($arg)*);
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to the terminal (stderr/stdout mixed).
    Terminal,
    /// Write to the given file, truncating it first.
    File(PathBuf),
    /// Write to both the terminal and the given file.
    Both(PathBuf),
}

impl LogDestination {
    /// File destination at [`DEFAULT_LOG_FILE`].
    pub fn default_file() -> Self {
        LogDestination::File(PathBuf::from(DEFAULT_LOG_FILE))
    }
}

/// Installs the global logger for the given destination.
///
/// Returns `false` when nothing was installed, either because the log file
/// could not be created (and no terminal logger was requested) or because a
/// logger is already set.
pub fn initialize(destination: LogDestination, level: LevelFilter) -> bool {
    let config = build_config();

    let loggers: Vec<Box<dyn SharedLogger>> = match destination {
        LogDestination::Terminal => vec![terminal_logger(level, config)],
        LogDestination::File(path) => match file_logger(&path, level, config) {
            Some(logger) => vec![logger],
            None => return false,
        },
        LogDestination::Both(path) => {
            let mut loggers = vec![terminal_logger(level, config.clone())];
            if let Some(logger) = file_logger(&path, level, config) {
                loggers.push(logger);
            }
            loggers
        }
    };

    CombinedLogger::init(loggers).is_ok()
}

/// Initializes a terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = CombinedLogger::init(vec![terminal_logger(level, Config::default())]);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn terminal_logger(level: LevelFilter, config: Config) -> Box<dyn SharedLogger> {
    TermLogger::new(level, config, TerminalMode::Mixed, ColorChoice::Auto)
}

fn file_logger(path: &Path, level: LevelFilter, config: Config) -> Option<Box<dyn SharedLogger>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: could not create log file at {path:?}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_logger_is_none_for_unwritable_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = temp.path().join("no_such_dir").join("feed.log");
        assert!(file_logger(&missing, LevelFilter::Info, Config::default()).is_none());
    }

    #[test]
    fn default_file_destination_points_at_feed_log() {
        assert_eq!(
            LogDestination::default_file(),
            LogDestination::File(PathBuf::from(DEFAULT_LOG_FILE))
        );
    }

    #[test]
    fn macros_expand_without_a_logger() {
        feed_trace!("trace {}", 1);
        feed_debug!("debug {}", 2);
        feed_info!("info {}", 3);
        feed_warn!("warn {}", 4);
        feed_error!("error {}", 5);
    }
}

//! Logging setup for the terminal app.
//!
//! File logging is the default so log lines do not interleave with the feed
//! printed on stdout.

use feed_logging::{initialize, LogDestination, DEFAULT_LOG_FILE};
use log::LevelFilter;

use crate::cli::LogTarget;

pub fn init(target: LogTarget, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let destination = match target {
        LogTarget::Terminal => LogDestination::Terminal,
        LogTarget::File => LogDestination::default_file(),
        LogTarget::Both => LogDestination::Both(DEFAULT_LOG_FILE.into()),
    };
    if !initialize(destination, level) {
        eprintln!("Warning: logging is disabled");
    }
}

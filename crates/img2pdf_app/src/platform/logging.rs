//! Logging setup for the `img2pdf` binary.
//!
//! Logs go to `./img2pdf.log` unless `--log terminal` is given.

use std::path::PathBuf;

use engine_logging::{LogSettings, DEFAULT_LOG_FILE};
use log::LevelFilter;

use crate::cli::LogTarget;

pub fn log_settings(target: LogTarget, verbose: bool) -> LogSettings {
    LogSettings {
        destination: target.into(),
        level: if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        },
        file_path: PathBuf::from(".").join(DEFAULT_LOG_FILE),
    }
}

pub fn initialize(target: LogTarget, verbose: bool) {
    if !engine_logging::initialize(&log_settings(target, verbose)) {
        eprintln!("warning: logging is disabled");
    }
}

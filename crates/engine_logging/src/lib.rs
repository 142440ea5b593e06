#![deny(missing_docs)]
//! Shared logging utilities for the img2pdf workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase,
//! the `simplelog` setup used by the binary, and a minimal test initializer
//! for the global logger.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Default log file name, created in the current working directory.
pub const DEFAULT_LOG_FILE: &str = "img2pdf.log";

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogDestination {
    /// Write to the log file only.
    #[default]
    File,
    /// Write to the terminal (stderr for warnings and errors).
    Terminal,
    /// Write to both file and terminal.
    Both,
}

/// Logger settings chosen by the binary at startup.
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Where log records go.
    pub destination: LogDestination,
    /// Maximum level that is recorded.
    pub level: LevelFilter,
    /// Log file path, used for `File` and `Both`.
    pub file_path: PathBuf,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            destination: LogDestination::File,
            level: LevelFilter::Info,
            file_path: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

/// Initialize the global logger.
///
/// Returns `false` when no logger could be installed: either a logger was
/// already set, or the only requested sink (the file) could not be created.
pub fn initialize(settings: &LogSettings) -> bool {
    let config = build_config();
    let level = settings.level;

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if matches!(
        settings.destination,
        LogDestination::Terminal | LogDestination::Both
    ) {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }
    if matches!(
        settings.destination,
        LogDestination::File | LogDestination::Both
    ) {
        if let Some(file_logger) = create_file_logger(&settings.file_path, level, config) {
            loggers.push(file_logger);
        }
    }

    if loggers.is_empty() {
        return false;
    }
    CombinedLogger::init(loggers).is_ok()
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#![deny(missing_docs)]
//! Shared logging utilities for the storefront workspace.
//!
//! This crate provides the `store_*` logging macros used across the codebase,
//! the application logger setup and a minimal test initializer for the global
//! logger.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use log::{LevelFilter, SetLoggerError};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use thiserror::Error;

/// Default log file, relative to the working directory.
pub const LOG_FILE: &str = "storefront.log";

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! store_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! store_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! store_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! store_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! store_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogDestination {
    /// Append to [`LogSettings::file`].
    File,
    /// Write to stderr, leaving stdout to the program's own output.
    #[default]
    Terminal,
    /// Write to both file and terminal.
    Both,
}

impl LogDestination {
    /// True when records go to stderr.
    pub fn writes_terminal(self) -> bool {
        matches!(self, Self::Terminal | Self::Both)
    }

    /// True when records go to the log file.
    pub fn writes_file(self) -> bool {
        matches!(self, Self::File | Self::Both)
    }
}

/// How the application logger is set up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Where records are written.
    pub destination: LogDestination,
    /// Most verbose level that is recorded.
    pub level: LevelFilter,
    /// File used by [`LogDestination::File`] and [`LogDestination::Both`].
    pub file: PathBuf,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            destination: LogDestination::default(),
            level: LevelFilter::Info,
            file: PathBuf::from(LOG_FILE),
        }
    }
}

/// Failure to install the application logger.
#[derive(Debug, Error)]
pub enum LogSetupError {
    /// The log file could not be opened for appending.
    #[error("cannot open log file {}: {source}", path.display())]
    File {
        /// Path that was tried.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Another global logger is already installed.
    #[error("a global logger is already installed")]
    AlreadySet(#[from] SetLoggerError),
}

/// Installs the global logger described by `settings`.
///
/// The log file is opened before anything is installed, so a bad path leaves
/// the process without a logger and the caller free to retry.
pub fn initialize(settings: &LogSettings) -> Result<(), LogSetupError> {
    let config = build_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if settings.destination.writes_file() {
        let file = open_log_file(&settings.file)?;
        loggers.push(WriteLogger::new(settings.level, config.clone(), file));
    }
    if settings.destination.writes_terminal() {
        loggers.push(TermLogger::new(
            settings.level,
            config,
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Another test may have installed it already.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Never,
    )]);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn open_log_file(path: &Path) -> Result<File, LogSetupError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LogSetupError::File {
            path: path.to_path_buf(),
            source,
        })
}

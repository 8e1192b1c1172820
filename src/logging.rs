//! File logging for Resift
//!
//! The interactive page owns the terminal, so nothing is ever printed to
//! stdout/stderr from library code. Instead every component writes tagged
//! lines into a single log file:
//!
//! ```text
//! [2026-10-18 14:02:11.532] [INFO ] [STORE] upsert key='R' entry='shoes' len=2
//! ```
//!
//! Logging is a no-op until [`init`] has been called.

use chrono::Local;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

/// Global logger instance
static LOGGER: OnceLock<Mutex<ResiftLogger>> = OnceLock::new();

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        // pad so `{:5}` lines the columns up
        f.pad(name)
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

/// Main logger struct
pub struct ResiftLogger {
    file: Option<File>,
    path: PathBuf,
    min_level: LogLevel,
}

impl ResiftLogger {
    fn new(path: &Path, min_level: LogLevel) -> Self {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok();

        Self {
            file,
            path: path.to_path_buf(),
            min_level,
        }
    }

    fn log(&mut self, level: LogLevel, module: &str, message: &str) {
        if level < self.min_level {
            return;
        }

        let entry = format_entry(level, module, message);

        if let Some(ref mut file) = self.file {
            let _ = file.write_all(entry.as_bytes());
        }
    }
}

fn format_entry(level: LogLevel, module: &str, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    format!("[{}] [{:5}] [{}] {}\n", timestamp, level, module, message)
}

/// Default log file location: the local data directory, or the current directory.
pub fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("resift"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("resift.log")
}

/// Initialize the global logger. Only the first call takes effect.
pub fn init(path: &Path, min_level: LogLevel) {
    let _ = LOGGER.set(Mutex::new(ResiftLogger::new(path, min_level)));
}

/// Path of the active log file, if logging was initialized
pub fn log_path() -> Option<PathBuf> {
    LOGGER.get().map(|l| l.lock().path.clone())
}

fn log(level: LogLevel, module: &str, message: &str) {
    if let Some(logger) = LOGGER.get() {
        logger.lock().log(level, module, message);
    }
}

/// Log debug message
pub fn debug(module: &str, message: &str) {
    log(LogLevel::Debug, module, message);
}

/// Log info message
pub fn info(module: &str, message: &str) {
    log(LogLevel::Info, module, message);
}

/// Log warning message
pub fn warn(module: &str, message: &str) {
    log(LogLevel::Warn, module, message);
}

/// Log error message
pub fn error(module: &str, message: &str) {
    log(LogLevel::Error, module, message);
}

// ============================================================================
// Specialized logging functions for different components
// ============================================================================

/// Log a full-list write to the recent searches store
pub fn log_store_write(op: &str, key: &str, entry: &str, len: usize) {
    let msg = format!("{} key='{}' entry='{}' len={}", op, key, entry, len);
    debug("STORE", &msg);
}

/// Log a stored value that could not be decoded and was read as empty
pub fn log_malformed_value(key: &str, reason: &str) {
    let msg = format!("key='{}' holds a malformed list, reading as empty: {}", key, reason);
    debug("STORE", &msg);
}

/// Log a lifecycle hook invocation on a widget
pub fn log_lifecycle(widget_type: &str, key: &str, hook: &str) {
    let msg = format!("{} [{}] {}", widget_type, key, hook);
    debug("WIDGET", &msg);
}

/// Log a lifecycle call the host should never have made
pub fn log_lifecycle_violation(widget_type: &str, key: &str, hook: &str, phase: &str) {
    let msg = format!(
        "{} [{}] {} called while {}; host contract violated",
        widget_type, key, hook, phase
    );
    warn("WIDGET", &msg);
}

/// Flush the log file
pub fn flush() {
    if let Some(logger) = LOGGER.get() {
        if let Some(ref mut file) = logger.lock().file {
            let _ = file.flush();
        }
    }
}

/// Write a separator line for readability
pub fn separator(label: &str) {
    let msg = format!("========== {} ==========", label);
    info("---", &msg);
}

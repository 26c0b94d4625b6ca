//! Centralized logging infrastructure for csdkit
//!
//! This module provides:
//! - Structured logging with tracing
//! - Configurable log levels (Off, Error, Warn, Info, Debug, Trace)
//! - Optional daily-rotated log file
//! - Re-initialisation that only swaps the level filter

use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::reload::Handle;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

use crate::config;

lazy_static! {
    // Global handle for reloading log level dynamically
    static ref LOG_RELOAD_HANDLE: Mutex<Option<Handle<EnvFilter, Registry>>> = Mutex::new(None);
}

/// Log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "off" => Ok(LogLevel::Off),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            LogLevel::Off => "Off",
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        };
        write!(f, "{}", value)
    }
}

impl From<LogLevel> for Option<Level> {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

/// Filter directive string for `log_level`
pub fn filter_directive(log_level: LogLevel) -> String {
    let level: Option<Level> = log_level.into();
    match level {
        Some(lvl) => format!("csdkit={}", lvl.as_str().to_lowercase()),
        None => "off".to_string(),
    }
}

/// Get the platform-specific logs directory, creating it if needed
pub fn get_logs_dir() -> Result<PathBuf> {
    // Linux: ~/.local/share/csdkit/logs
    let logs_dir = dirs::data_local_dir()
        .context("Failed to get local data directory")?
        .join(config::APP_DIR_NAME)
        .join("logs");

    if !logs_dir.exists() {
        fs::create_dir_all(&logs_dir)
            .with_context(|| format!("Failed to create logs directory: {:?}", logs_dir))?;
    }

    Ok(logs_dir)
}

/// Initialize the logging system
///
/// # Arguments
/// * `log_level` - The minimum log level to record
/// * `log_to_file` - Whether to also write logs to a daily-rotated file
///
/// Calling this again only reloads the level filter; the file choice made
/// on the first call stays.
pub fn init_logging(log_level: LogLevel, log_to_file: bool) -> Result<()> {
    let level_filter = EnvFilter::try_new(filter_directive(log_level))
        .context("Failed to build log filter")?;

    let mut handle_guard = LOG_RELOAD_HANDLE
        .lock()
        .map_err(|_| anyhow!("Log reload handle poisoned"))?;
    if let Some(handle) = handle_guard.as_ref() {
        handle.reload(level_filter).context("Failed to reload log filter")?;
        return Ok(());
    }

    let (filter_layer, reload_handle) = tracing_subscriber::reload::Layer::new(level_filter);

    // Commands are often driven from a terminal; keep stdout clean
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    if log_to_file {
        let logs_dir = get_logs_dir()?;
        let appender =
            RollingFileAppender::new(Rotation::DAILY, &logs_dir, config::logging::LOG_FILE_NAME);

        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(appender)
            .with_target(false)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .with(file_layer)
            .try_init()
            .context("Failed to install tracing subscriber")?;
    } else {
        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .try_init()
            .context("Failed to install tracing subscriber")?;
    }

    *handle_guard = Some(reload_handle);
    Ok(())
}

/// Clean up old log files
///
/// # Arguments
/// * `logs_dir` - Directory containing log files
/// * `keep_days` - Number of days to keep (files older than this will be deleted)
///
/// # Returns
/// * Number of files deleted
pub fn cleanup_old_logs(logs_dir: &Path, keep_days: u32) -> Result<usize> {
    let now = std::time::SystemTime::now();
    let keep_duration = std::time::Duration::from_secs(keep_days as u64 * 24 * 60 * 60);

    let mut deleted_count = 0;

    for entry in fs::read_dir(logs_dir)
        .with_context(|| format!("Failed to read logs directory: {:?}", logs_dir))?
    {
        let entry = entry?;
        let path = entry.path();

        // Rotated files are named csdkit.log.YYYY-MM-DD
        let is_log = path
            .file_name()
            .and_then(|s| s.to_str())
            .map(|name| name.starts_with(config::logging::LOG_FILE_NAME))
            .unwrap_or(false);
        if !path.is_file() || !is_log {
            continue;
        }

        let metadata = entry.metadata()?;
        if let Ok(modified) = metadata.modified() {
            if let Ok(age) = now.duration_since(modified) {
                if age > keep_duration && fs::remove_file(&path).is_ok() {
                    deleted_count += 1;
                    tracing::debug!(
                        file = ?path,
                        age_days = age.as_secs() / 86400,
                        "Deleted old log file"
                    );
                }
            }
        }
    }

    Ok(deleted_count)
}

/// Delete stale logs in `logs_dir` before returning, reporting the outcome
///
/// Failures are logged and count as zero deletions.
pub fn prune_logs(logs_dir: &Path, keep_days: u32) -> usize {
    match cleanup_old_logs(logs_dir, keep_days) {
        Ok(count) => {
            if count > 0 {
                tracing::info!(deleted_count = count, "Cleaned up old log files");
            }
            count
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to cleanup old log files");
            0
        }
    }
}

/// Startup cleanup of the default logs directory
///
/// Runs on the calling thread and returns once the directory is scanned.
pub fn auto_cleanup_old_logs(keep_days: u32) -> usize {
    match get_logs_dir() {
        Ok(logs_dir) => prune_logs(&logs_dir, keep_days),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to locate logs directory");
            0
        }
    }
}

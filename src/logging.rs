//! Logging bootstrap and the structured event helper.
//!
//! # Invariants
//! - Logging init is idempotent for the same directory and level.
//! - Logging initialization must not panic.
//! - Emitting an event never fails the caller.

use anyhow::{anyhow, Context, Result};
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{info, Level};
use once_cell::sync::OnceCell;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "notedo";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const MAX_MESSAGE_CHARS: usize = 500;
const EVENT_SOURCE: &str = "cli";

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    log_dir: PathBuf,
    _logger: LoggerHandle,
}

/// Levels accepted by [`log_event`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

impl LogLevel {
    /// Parse a level name; unknown names are logged at info
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "warn" | "warning" => Self::Warn,
            "error" => Self::Error,
            "debug" => Self::Debug,
            _ => Self::Info,
        }
    }

    fn as_log_level(self) -> Level {
        match self {
            Self::Info => Level::Info,
            Self::Warn => Level::Warn,
            Self::Error => Level::Error,
            Self::Debug => Level::Debug,
        }
    }
}

/// Initialize rotating file logging in `log_dir`.
///
/// # Errors
/// - `level` is not one of trace|debug|info|warn|error.
/// - `log_dir` cannot be created or the logger backend fails to start.
/// - Logging is already active with a different level or directory.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<()> {
    let level = normalize_level(level)?;

    if let Some(state) = LOGGING_STATE.get() {
        return check_same(state, level, log_dir);
    }

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState> {
        std::fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let logger = Logger::try_with_str(level)
            .with_context(|| format!("Invalid log level: {}", level))?
            .log_to_file(
                FileSpec::default()
                    .directory(log_dir)
                    .basename(LOG_FILE_BASENAME),
            )
            .rotate(
                Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(MAX_LOG_FILES),
            )
            .duplicate_to_stderr(Duplicate::Warn)
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .format_for_files(flexi_logger::detailed_format)
            .start()
            .context("Failed to start logger")?;

        info!(
            "event=app_start module=logging status=ok version={} level={} log_dir={}",
            env!("CARGO_PKG_VERSION"),
            level,
            log_dir.display()
        );

        Ok(LoggingState {
            level,
            log_dir: log_dir.to_path_buf(),
            _logger: logger,
        })
    })?;

    check_same(state, level, log_dir)
}

fn check_same(state: &LoggingState, level: &str, log_dir: &Path) -> Result<()> {
    if state.log_dir != log_dir {
        return Err(anyhow!(
            "logging already initialized at `{}`; refusing to switch to `{}`",
            state.log_dir.display(),
            log_dir.display()
        ));
    }
    if state.level != level {
        return Err(anyhow!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            state.level,
            level
        ));
    }
    Ok(())
}

fn normalize_level(level: &str) -> Result<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(anyhow!(
            "unsupported log level `{}`; expected trace|debug|info|warn|error",
            other
        )),
    }
}

/// Emit an application event with free-form details.
///
/// The record is a single JSON object: the detail fields, then `message`
/// and `source`. Non-object details are stored under `details`.
pub fn log_event(level: LogLevel, message: &str, details: Value) {
    log::log!(level.as_log_level(), "{}", event_record(message, details));
}

fn event_record(message: &str, details: Value) -> String {
    let mut record = match details {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("details".to_string(), other);
            map
        }
    };
    record.insert(
        "message".to_string(),
        Value::String(sanitize_message(message, MAX_MESSAGE_CHARS)),
    );
    record.insert("source".to_string(), Value::String(EVENT_SOURCE.to_string()));
    Value::Object(record).to_string()
}

fn sanitize_message(value: &str, max_chars: usize) -> String {
    let normalized = value.replace(['\n', '\r'], " ");
    let mut truncated = normalized.chars().take(max_chars).collect::<String>();
    if normalized.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}

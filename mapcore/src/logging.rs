//! Logging set-up.
//!
//! Installs a global `tracing` subscriber with two outputs:
//! - a log file, truncated at start-up, written through a non-blocking worker
//! - stderr, so stdout stays free for command output
//!
//! `RUST_LOG` takes precedence over the configured level.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILE: &str = "mapcore.log";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Keeps the file writer alive. Dropping it flushes and closes the log file.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize logging to `log_dir/log_file` and stderr.
///
/// `level` is an `EnvFilter` directive such as `info` or `mapcore=debug`.
///
/// # Errors
///
/// Fails if the directory or file cannot be created, if `level` is not a
/// valid directive, or if a global subscriber is already installed.
pub fn init_logging(log_dir: &Path, log_file: &str, level: &str) -> io::Result<LoggingGuard> {
    prepare_log_file(log_dir, log_file)?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_timer(LocalTime::rfc_3339())
        .with_ansi(false);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_timer(LocalTime::rfc_3339())
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter(level)?)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(io::Error::other)?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Filter from `RUST_LOG`, falling back to `level`.
fn env_filter(level: &str) -> io::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e)),
    }
}

/// Create the log directory and truncate the log file.
fn prepare_log_file(log_dir: &Path, log_file: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(log_dir)?;
    let path = log_dir.join(log_file);
    fs::write(&path, "")?;
    Ok(path)
}

/// `logs` inside the configuration directory.
pub fn default_log_dir() -> PathBuf {
    crate::config::config_directory().join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_creates_nested_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("deep").join("logs");

        let path = prepare_log_file(&dir, "test.log").unwrap();

        assert!(dir.is_dir());
        assert_eq!(fs::read_to_string(path).unwrap(), "");
    }

    #[test]
    fn test_prepare_truncates_previous_session() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.log");
        fs::write(&path, "old session").unwrap();

        prepare_log_file(temp.path(), "test.log").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_invalid_level_rejected() {
        // only meaningful when RUST_LOG is not set in the test environment
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(env_filter("mapcore=loud").is_err());
            assert!(env_filter("mapcore=debug").is_ok());
        }
    }

    #[test]
    fn test_default_log_dir() {
        assert!(default_log_dir().ends_with(".mapcore/logs"));
    }

    #[test]
    fn test_guard_holds_worker() {
        let (writer, guard) = tracing_appender::non_blocking(io::sink());
        drop(writer);
        let _logging_guard = LoggingGuard { _file_guard: guard };
    }
}

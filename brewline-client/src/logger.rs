//! Logging Infrastructure
//!
//! Console logging via `tracing-subscriber`, plus an optional daily rolling
//! file when a log directory is configured.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::ClientConfig;

/// Initialize the logger at `info`
pub fn init_logger() -> Option<WorkerGuard> {
    init_logger_with_file(None, false, None)
}

/// Initialize the logger from the client configuration
pub fn init_from_config(config: &ClientConfig) -> Option<WorkerGuard> {
    init_logger_with_file(Some(&config.log_level), false, config.log_dir.as_deref())
}

/// Initialize the logger with optional JSON formatting and file output
///
/// The returned guard must be kept alive for file output to be flushed.
/// Calling this twice is harmless: the second subscriber is not installed.
pub fn init_logger_with_file(
    log_level: Option<&str>,
    json: bool,
    log_dir: Option<&Path>,
) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_new(log_level.unwrap_or("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir
        && dir.is_dir()
    {
        let file_appender = tracing_appender::rolling::daily(dir, "brewline-client");
        let (writer, guard) = tracing_appender::non_blocking(file_appender);
        let builder = builder.with_ansi(false).with_writer(writer);
        let _ = if json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
        return Some(guard);
    }

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_logging_keeps_guard() {
        let dir = tempfile::tempdir().unwrap();
        let guard = init_logger_with_file(Some("debug"), false, Some(dir.path()));
        assert!(guard.is_some());
        tracing::info!(target: "brewline_client", "logger ready");
    }

    #[test]
    fn test_missing_dir_falls_back_to_console() {
        let guard = init_logger_with_file(Some("not a valid filter ["), true, Some(Path::new("/nonexistent/brewline")));
        assert!(guard.is_none());
    }
}

//! Logging system with daily rotation.

use anyhow::{Context, Result};
use std::fs;
use std::io::IsTerminal;
use std::path::Path;
use std::time::{Duration, SystemTime};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

const LOG_FILE_PREFIX: &str = "sns-report";

/// How long rotated notification logs are kept.
const LOG_RETENTION: Duration = Duration::from_secs(2 * 24 * 60 * 60);

/// Initialize file logging at DEBUG level.
///
/// Fails when the log directory cannot be created; callers on the safe
/// notify path fall back to [`init_stderr`].
pub fn init(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.log_path)
        .with_context(|| format!("Failed to create log directory: {}", config.log_path.display()))?;
    cleanup_old_logs(&config.log_path)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &config.log_path, LOG_FILE_PREFIX);

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(local_timer()),
        );

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    Ok(())
}

/// Local wall-clock timestamps, UTC when the offset is unknown.
fn local_timer() -> OffsetTime<&'static [BorrowedFormatItem<'static>]> {
    let offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    OffsetTime::new(
        offset,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    )
}

/// Initialize compact stderr logging, WARN by default.
///
/// Keeps swallowed failures visible when file logging is off.
pub fn init_stderr() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .with_target(false)
            .without_time()
            .compact(),
    );

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    Ok(())
}

/// Remove our rotated log files older than [`LOG_RETENTION`].
pub fn cleanup_old_logs(log_path: &Path) -> Result<()> {
    if !log_path.is_dir() {
        return Ok(());
    }
    let cutoff = SystemTime::now() - LOG_RETENTION;

    for entry in fs::read_dir(log_path)?.flatten() {
        let path = entry.path();
        let ours = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(LOG_FILE_PREFIX));
        if !ours || !path.is_file() {
            continue;
        }

        let expired = entry
            .metadata()
            .and_then(|m| m.modified())
            .is_ok_and(|modified| modified < cutoff);
        if expired {
            // Best effort; a locked file is retried next run
            let _ = fs::remove_file(&path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_keeps_fresh_and_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let ours = dir.path().join("sns-report.2026-10-19");
        let other = dir.path().join("unrelated.log");
        fs::write(&ours, "fresh").unwrap();
        fs::write(&other, "x").unwrap();

        cleanup_old_logs(dir.path()).unwrap();

        assert!(ours.exists());
        assert!(other.exists());
    }

    #[test]
    fn test_init_reports_uncreatable_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file").unwrap();
        let config = Config {
            log_path: blocker.join("logs"),
            ..Config::default()
        };

        let err = init(&config).unwrap_err();
        assert!(err.to_string().contains("Failed to create log directory"));
    }

    #[test]
    fn test_cleanup_missing_dir_is_ok() {
        assert!(cleanup_old_logs(Path::new("/nonexistent/sns-report/logs")).is_ok());
    }
}

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Keeps the non-blocking log writers alive. Hold this for the lifetime
/// of the process; dropping it flushes and stops the writers.
pub struct LoggingGuards {
    _guards: Vec<WorkerGuard>,
}

/// Logs to stderr, filtered by `RUST_LOG` (defaults to `info`).
pub fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false),
    );

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global tracing subscriber");
}

/// Logs to a daily-rolling file in `log_dir`, filtered by `RUST_LOG`.
pub fn init_file_logging(log_dir: &Path) -> LoggingGuards {
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir).expect("Failed to create logs directory");
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "todo.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false),
    );

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global tracing subscriber");

    tracing::info!(target: "todo", "Logging initialized at {:?}", log_dir);

    LoggingGuards {
        _guards: vec![guard],
    }
}

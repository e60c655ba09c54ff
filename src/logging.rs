//! File logging for the TUI.
//!
//! The terminal belongs to ratatui, so logs go only to a daily rolling file
//! under the data directory.  Filtering follows `RUST_LOG` and defaults to
//! `info`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE: &str = "yha-browse.log";

/// Initialize logging into `<data_dir>/logs`.
///
/// The returned guard flushes buffered lines on drop and must live until the
/// process exits.
pub fn init(data_dir: &Path) -> WorkerGuard {
    let log_dir = data_dir.join("logs");
    let log_dir = match fs::create_dir_all(&log_dir) {
        Ok(()) => log_dir,
        // Fall back to the working directory rather than losing logs.
        Err(_) => PathBuf::from("."),
    };

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_filter(env_filter);

    // No stdout layer; the TUI owns the terminal.
    tracing_subscriber::registry().with(file_layer).init();

    tracing::info!(dir = %log_dir.display(), "logging initialized");
    guard
}

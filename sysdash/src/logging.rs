//! Logging setup. The TUI owns the terminal, so interactive runs log to a file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_FILE: &str = "sysdash.log";

/// `SYSDASH_LOG` wins over `RUST_LOG`; default is `info`.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env("SYSDASH_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log to `<dir>/sysdash.log`. Keep the guard alive until exit or buffered lines are lost.
pub fn init_file_logging(dir: &Path) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(dir)?;
    let file_appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    // A second init (e.g. in tests) keeps the first subscriber.
    let _ = fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
    Ok(guard)
}

/// Log to stderr, for headless runs.
pub fn init_stderr_logging() {
    let _ = fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

//! Tracing configuration and log routing.
//!
//! Logs go to stdout using a compact formatter. When `RUSTY_PARTITION_LOG_FILE` is set, a
//! second non‑blocking layer appends to that path as well. Nothing is written to disk otherwise.
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable naming an optional log file.
pub const LOG_FILE_ENV: &str = "RUSTY_PARTITION_LOG_FILE";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Configure tracing subscribers for stdout and optional file logging.
///
/// - Respects `RUST_LOG` for filtering (defaults to `info`).
/// - Installs a compact stdout layer and, when requested, a file layer.
/// - Returns `false` without touching the existing setup when a global subscriber is already
///   installed, so repeated calls are harmless.
pub fn init_tracing() -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(false).compact();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer);

    let installed = if let Some(writer) = configure_file_writer() {
        let file_layer = fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_ansi(false)
            .compact();

        registry.with(file_layer).try_init()
    } else {
        registry.try_init()
    };
    installed.is_ok()
}

/// Build a non‑blocking writer for file logging.
///
/// Returns `None` when no log file is configured or the target file cannot be opened.
fn configure_file_writer() -> Option<NonBlocking> {
    let path = std::env::var(LOG_FILE_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())?;
    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let _ = LOG_GUARD.set(guard);
            Some(non_blocking)
        }
        Err(err) => {
            eprintln!("Failed to open log file {path}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialization_is_a_no_op() {
        init_tracing();
        assert!(!init_tracing());
        tracing::info!("tracing initialized");
    }
}

use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Setup logging to a daily rotating file in `log_dir`.
///
/// # Arguments
/// * `log_dir` - Directory for log files (e.g., "logs")
/// * `log_prefix` - Prefix for log files (e.g., "unleveler")
/// * `debug_mode` - If true, log per-record decisions at debug level
///
/// # Returns
/// A guard that must be held until the run ends so buffered lines are flushed
pub fn setup_logging(log_dir: &str, log_prefix: &str, debug_mode: bool) -> Result<WorkerGuard> {
    setup_logging_with_console(log_dir, log_prefix, debug_mode, false)
}

/// Setup file logging, optionally mirrored to the console.
///
/// `RUST_LOG` takes precedence over `debug_mode` when set.
pub fn setup_logging_with_console(
    log_dir: &str,
    log_prefix: &str,
    debug_mode: bool,
    console_output: bool,
) -> Result<WorkerGuard> {
    let (non_blocking, guard) = file_writer(log_dir, log_prefix)?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    // Console output stays terse; the file has the full detail.
    let console_layer = console_output.then(|| {
        tracing_subscriber::fmt::layer()
            .with_ansi(true)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(env_filter(debug_mode))
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    tracing::info!(
        "Logging initialized: dir={}, prefix={}, debug={}, console={}",
        log_dir,
        log_prefix,
        debug_mode,
        console_output
    );

    Ok(guard)
}

fn env_filter(debug_mode: bool) -> EnvFilter {
    let default_level = if debug_mode { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn file_writer(log_dir: &str, log_prefix: &str) -> Result<(NonBlocking, WorkerGuard)> {
    let log_path = Utf8Path::new(log_dir);
    if !log_path.exists() {
        fs::create_dir_all(log_path)
            .with_context(|| format!("Failed to create log directory: {}", log_dir))?;
    }

    let file_appender = rolling::daily(log_dir, log_prefix);
    Ok(tracing_appender::non_blocking(file_appender))
}

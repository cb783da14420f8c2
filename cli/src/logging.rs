//! Logging setup for the CLI.
//!
//! Log lines go to stderr and to `tocsin.log` in the platform config
//! directory (`~/.config/tocsin` on Linux), rotated at 5 MB. Set
//! `DEBUG_LOGGING=1` to see per-alarm debug events from tocsin crates.

use std::path::PathBuf;

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const MAX_LOG_BYTES: u64 = 5 * 1024 * 1024;

fn filter(debug_logging: bool) -> EnvFilter {
    if debug_logging {
        EnvFilter::new("info,tocsin_core=debug,tocsin_cli=debug")
    } else {
        EnvFilter::new("warn,tocsin_cli=info")
    }
}

fn console_layer<S>() -> fmt::Layer<S, fmt::format::DefaultFields, fmt::format::Format, fn() -> std::io::Stderr> {
    fmt::layer().with_writer(std::io::stderr as fn() -> std::io::Stderr).with_target(true)
}

fn log_path() -> Option<PathBuf> {
    let dir = dirs::config_dir()?.join("tocsin");
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Failed to create log directory {}: {e}", dir.display());
        return None;
    }
    Some(dir.join("tocsin.log"))
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held
/// until the program exits. `None` means stderr-only logging.
pub fn init() -> Option<WorkerGuard> {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let appender = log_path().and_then(|path| {
        BasicRollingFileAppender::new(&path, RollingConditionBasic::new().max_size(MAX_LOG_BYTES), 1)
            .map_err(|e| eprintln!("Failed to open log file {}: {e}", path.display()))
            .ok()
            .map(|appender| (path, appender))
    });

    let Some((path, appender)) = appender else {
        tracing_subscriber::registry()
            .with(console_layer())
            .with(filter(debug_logging))
            .init();
        tracing::debug!(debug_logging, "logging initialized (stderr only)");
        return None;
    };

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = fmt::layer().with_writer(writer).with_ansi(false).with_target(true);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer())
        .with(filter(debug_logging))
        .init();

    tracing::debug!(log_file = ?path, debug_logging, "logging initialized");
    Some(guard)
}

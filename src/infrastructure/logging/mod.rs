//! Logging setup: console always, daily rolling file in production.

use crate::infrastructure::config::paths;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

fn default_filter(is_production: bool) -> EnvFilter {
    let level = if is_production { "info" } else { "debug" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Initialize logging with console and optional file output.
///
/// `RUST_LOG` overrides the level. In production, logs also go to
/// `<config dir>/sau-desktop/logs/`. Keep the returned guard alive for the
/// whole session or buffered file output is lost.
pub fn setup(is_production: bool) -> Option<WorkerGuard> {
    let console_layer = fmt::layer()
        .with_target(true)
        .with_filter(default_filter(is_production));

    let mut guard = None;
    let file_layer = if is_production {
        let log_dir = paths::log_dir();

        if let Err(e) = std::fs::create_dir_all(&log_dir) {
            eprintln!(
                "Warning: Failed to create log directory {:?}: {}",
                log_dir, e
            );
            None
        } else {
            let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "sau-desktop.log");
            let (writer, worker_guard) = tracing_appender::non_blocking(file_appender);
            guard = Some(worker_guard);

            Some(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(EnvFilter::new("info")),
            )
        }
    } else {
        None
    };

    let result = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();

    if let Err(e) = result {
        eprintln!("Warning: logging already initialized: {}", e);
    }

    if is_production && guard.is_some() {
        tracing::info!("File logging enabled: {:?}", paths::log_dir());
    }
    tracing::info!("Logging initialized (production={})", is_production);

    guard
}

//! Structured logging setup from [`crate::config::LogConfig`].
//!
//! A non-blocking rolling file appender via `tracing-appender`, a stdout
//! layer, and an `EnvFilter` seeded from the configured level.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogConfig;

/// Initializes the global tracing subscriber. The returned `WorkerGuard`
/// must be held for the lifetime of the process — dropping it flushes and
/// stops the background writer thread.
pub fn init(config: &LogConfig) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(&config.directory, &config.file_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false).json();
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    guard
}

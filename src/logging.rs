//! Structured logging configuration
//!
//! Provides tracing output with:
//! - JSON or pretty formatting
//! - Console, file, or combined output
//! - Configurable via config file and environment variables

use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::get_config;

// Keeps the non-blocking file writer alive for the rest of the process.
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize the logging system based on configuration.
pub fn init_logging() {
    let config = get_config();

    let log_level = &config.logging.level;
    let log_format = &config.logging.format;
    let log_output = &config.logging.output;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    match log_output.as_str() {
        "file" => init_file_logging(env_filter, log_format),
        "both" => init_combined_logging(env_filter, log_format),
        _ => init_console_logging(env_filter, log_format),
    }
}

fn init_console_logging(filter: EnvFilter, format: &str) {
    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        "json" => {
            subscriber
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .init();
        }
        _ => {
            subscriber
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_ansi(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
}

fn init_file_logging(filter: EnvFilter, format: &str) {
    let (non_blocking, guard) = file_writer();
    let _ = FILE_GUARD.set(guard);

    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        "json" => {
            subscriber
                .with(fmt::layer().json().with_writer(non_blocking))
                .init();
        }
        _ => {
            subscriber
                .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                .init();
        }
    }
}

fn init_combined_logging(filter: EnvFilter, format: &str) {
    let (non_blocking, guard) = file_writer();
    let _ = FILE_GUARD.set(guard);

    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        "json" => {
            subscriber
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .with(fmt::layer().json().with_writer(non_blocking))
                .init();
        }
        _ => {
            subscriber
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
                .init();
        }
    }
}

fn file_writer() -> (tracing_appender::non_blocking::NonBlocking, WorkerGuard) {
    let config = get_config();
    let file_appender = tracing_appender::rolling::daily(&config.logging.directory, "rlm-usage.log");
    tracing_appender::non_blocking(file_appender)
}

//! Tracing configuration for ProctorDesk
//!
//! Installs the global `tracing-subscriber` registry: an env filter, a stderr
//! fmt layer, an optional file layer in the app logs directory and an
//! optional Sentry layer.
//!
//! ## Architecture / 架构
//!
//! - Command layer creates root spans (`command.*`)
//! - UseCase layer creates child spans (`usecase.*`)
//! - Platform adapters log through `log`, which `tracing-subscriber` bridges

use std::{fs, io, path::Path, sync::OnceLock};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry};

use pd_core::app_dirs::AppDirs;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static SENTRY_GUARD: OnceLock<sentry::ClientInitGuard> = OnceLock::new();

const LOG_FILE_NAME: &str = "proctordesk.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Check if running in development environment
fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Build the default filter directives for tracing
///
/// ## Behavior / 行为
/// - **Development**: debug level for app crates
/// - **Production**: info level for app crates
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    let level = if is_dev { "debug" } else { "info" };
    vec![
        level.to_string(),
        format!("pd_platform={level}"),
        format!("pd_infra={level}"),
        "sentry=warn".to_string(),
    ]
}

/// Initialize the tracing subscriber with appropriate configuration
///
/// - **Environment filter**: Respects RUST_LOG, with sensible defaults
/// - **File output**: `<app_dirs>/logs/proctordesk.log` when `app_dirs` is given
/// - **Sentry**: Enabled only when `SENTRY_DSN` is set
///
/// ## Errors / 错误
///
/// Returns `Err` if a global subscriber is already registered.
pub fn init_tracing_subscriber(app_dirs: Option<&AppDirs>) -> anyhow::Result<()> {
    let is_dev = is_development();

    let filter_directives = build_filter_directives(is_dev);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter_directives.join(",")));

    // Guard must be kept alive for the process lifetime.
    let sentry_layer = if let Ok(dsn) = std::env::var("SENTRY_DSN") {
        let guard = sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                traces_sample_rate: 1.0,
                ..Default::default()
            },
        ));

        if SENTRY_GUARD.set(guard).is_err() {
            eprintln!("Sentry guard already initialized");
        }

        Some(sentry_tracing::layer())
    } else {
        None
    };

    let console_writer: BoxMakeWriter = BoxMakeWriter::new(io::stderr);
    let file_writer = match app_dirs.map(|dirs| build_file_writer(&dirs.logs_dir())) {
        Some(Ok(writer)) => Some(writer),
        Some(Err(err)) => {
            eprintln!("Failed to initialize file logging, falling back to stderr: {err}");
            None
        }
        None => None,
    };

    // "2026-01-15 10:30:45.123 INFO [file.rs:42] [target] message"
    let console_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(console_writer);

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
    });

    // MUST be called once, before any logging occurs
    let subscriber = registry()
        .with(env_filter)
        .with(sentry_layer)
        .with(console_layer);

    if let Some(layer) = file_layer {
        subscriber.with(layer).try_init()?;
    } else {
        subscriber.try_init()?;
    }

    Ok(())
}

fn build_file_writer(logs_dir: &Path) -> anyhow::Result<NonBlocking> {
    fs::create_dir_all(logs_dir)?;

    let file_appender = tracing_appender::rolling::never(logs_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}

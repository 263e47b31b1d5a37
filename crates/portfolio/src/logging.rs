use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use color_eyre::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config;

lazy_static::lazy_static! {
    pub static ref LOG_ENV: String = format!("{}_LOG_LEVEL", config::PROJECT_NAME.clone());
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

static GUARD: Mutex<Option<WorkerGuard>> = Mutex::new(None);

/// Route tracing output into `<data_dir>/portfolio.log`.
///
/// The terminal belongs to ratatui, so nothing is written to stdout. The level
/// comes from `RUST_LOG`, then `PORTFOLIO_LOG_LEVEL`, then `info`. Lines are
/// written by a background worker until [`flush`] is called.
pub fn init() -> Result<()> {
    let directory = config::get_data_dir();
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::never(&directory, LOG_FILE.as_str());
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::builder().with_default_directive(tracing::Level::INFO.into());
    // Wenn RUST_LOG nicht gesetzt ist, fällt der Filter auf PORTFOLIO_LOG_LEVEL zurück
    let env_filter = env_filter
        .try_from_env()
        .or_else(|_| env_filter.with_env_var(LOG_ENV.clone()).from_env())?;

    let file_subscriber = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(non_blocking)
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .try_init()?;

    *GUARD.lock().unwrap_or_else(PoisonError::into_inner) = Some(guard);
    tracing::info!("logging to {}", log_path().display());
    Ok(())
}

/// Flush buffered lines and stop the writer; later events are dropped.
pub fn flush() {
    let guard = GUARD.lock().unwrap_or_else(PoisonError::into_inner).take();
    drop(guard);
}

/// Location of the log file `init` writes to.
pub fn log_path() -> PathBuf {
    config::get_data_dir().join(LOG_FILE.as_str())
}

/// Record a panic report without color codes, then flush.
pub fn panic_report(report: &str) {
    tracing::error!(target: "panic", "{}", plain(report));
    flush();
}

fn plain(report: &str) -> String {
    strip_ansi_escapes::strip_str(report)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn panic_reports_lose_their_color_codes() {
        let report = "\u{1b}[31mThe application panicked\u{1b}[0m: boom";
        assert_eq!(plain(report), "The application panicked: boom");
    }

    #[test]
    fn log_file_lives_in_the_data_dir() {
        assert_eq!(log_path(), config::get_data_dir().join("portfolio.log"));
    }
}

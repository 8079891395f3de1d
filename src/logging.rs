use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::app_dirs::AppDirs;

pub const LOG_FILE: &str = "tak.log";
pub const LOG_ENV: &str = "TAK_LOG";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a file-backed subscriber in `dir`.
///
/// The returned guard flushes the writer on drop and must outlive the app.
/// Returns `None` when the directory is unusable or a subscriber is already set.
pub fn init_in(dir: &Path) -> Option<WorkerGuard> {
    std::fs::create_dir_all(dir).ok()?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .ok()?;

    Some(guard)
}

/// Log to the application state directory; the terminal stays untouched
pub fn init() -> Option<WorkerGuard> {
    AppDirs::log_dir().and_then(|dir| init_in(&dir))
}

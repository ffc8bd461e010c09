use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const DEFAULT_FILTER: &str =
    "watch_engine=info,watch_fetcher=info,watch_notifier=info,watch_common=info";
const LOG_FILE_PREFIX: &str = "watch-bot.log";

/// Number of daily log files kept; older ones are deleted on rotation.
pub const MAX_LOG_FILES: usize = 5;

/// Daily-rolling file appender in `dir` that keeps at most [`MAX_LOG_FILES`] files.
pub fn file_appender(dir: &Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .max_log_files(MAX_LOG_FILES)
        .build(dir)
}

/// Install the global tracing subscriber.
///
/// Console output is always on. When `log_dir` is given, JSON lines are also
/// written to a daily-rolling file in that directory; keep the returned guard
/// alive for as long as the process runs or buffered lines are lost.
///
/// Nothing is installed when the log directory cannot be opened, so the caller
/// may fall back to `init_tracing(None)`.
pub fn init_tracing(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>, InitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(dir)?);
            let layer = tracing_subscriber::fmt::layer().json().with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    Ok(guard)
}

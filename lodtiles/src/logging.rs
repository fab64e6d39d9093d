//! Logging infrastructure for LodTiles.
//!
//! Long tiling runs need a durable record of which cells were staged,
//! tiled, skipped, or failed, so output goes to both a session log file and
//! stdout. Verbosity is controlled via the RUST_LOG environment variable
//! and defaults to `info`.

use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Keeps the background log writer alive.
///
/// Hold this for the whole run; dropping it flushes pending records and
/// closes the session log file.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Set up the tracing subscriber for a tiling run.
///
/// Writes `log_dir/log_file` fresh each session (the previous run's log is
/// truncated) and mirrors records to stdout. Filter defaults to `info`
/// unless `RUST_LOG` says otherwise.
///
/// # Errors
///
/// Fails if the log directory cannot be created or the old session log
/// cannot be truncated.
pub fn init_logging(log_dir: &str, log_file: &str) -> Result<LoggingGuard, io::Error> {
    fs::create_dir_all(log_dir)?;

    // One log per session: truncate whatever the previous run left
    let log_path = Path::new(log_dir).join(log_file);
    fs::write(&log_path, "")?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_target(true);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_ansi(true)
        .with_target(false);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Get default log directory path.
pub fn default_log_dir() -> &'static str {
    "logs"
}

/// Get default log file name.
pub fn default_log_file() -> &'static str {
    "lodtiles.log"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        assert_eq!(default_log_dir(), "logs");
        assert_eq!(default_log_file(), "lodtiles.log");
    }

    #[test]
    fn test_session_log_is_truncated() {
        // init_logging installs a global subscriber, so only the file
        // handling is exercised here
        let dir = tempfile::TempDir::new().unwrap();
        let log_path = dir.path().join("lodtiles.log");
        fs::write(&log_path, "previous session").unwrap();

        fs::write(&log_path, "").unwrap();
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "");
    }
}

use crate::config::Config;
use crate::error::AppError;
use std::io::stderr;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_FILE_NAME: &str = "rift_aggregator.log";
const DEFAULT_DIRECTIVE: &str = "rift_aggregator=info";

/// Splits a custom log path into directory and file name, or falls back to
/// the default log directory.
pub fn resolve_log_location(custom_path: Option<&str>) -> (String, String) {
    match custom_path {
        Some(custom_path) => {
            let path = Path::new(custom_path);
            let parent = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(LOG_FILE_NAME);
            (parent.to_string_lossy().to_string(), file_name.to_string())
        }
        None => (Config::get_log_dir_path(), LOG_FILE_NAME.to_string()),
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Sets up logging for the application.
///
/// - Always logs to a daily rolling file
/// - With `debug`, also logs to stderr so stdout stays reserved for JSON output
/// - Creates the log directory if it doesn't exist
///
/// Returns the path to the log file and the guard that must be kept alive
/// for the duration of the program to ensure proper log flushing.
pub async fn setup_logging(
    custom_path: Option<&str>,
    debug: bool,
) -> Result<(String, WorkerGuard), AppError> {
    let (log_dir, log_file_name) = resolve_log_location(custom_path);

    if !Path::new(&log_dir).exists() {
        tokio::fs::create_dir_all(&log_dir).await.map_err(|e| {
            AppError::log_setup_error(format!("Failed to create log directory: {e}"))
        })?;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, &log_file_name);

    // The guard must outlive every log call or buffered lines are lost.
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::Layer::new()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(env_filter());

    let registry = tracing_subscriber::registry().with(file_layer);
    let result = if debug {
        registry
            .with(
                fmt::Layer::new()
                    .with_writer(stderr)
                    .with_ansi(true)
                    .with_filter(env_filter()),
            )
            .try_init()
    } else {
        registry.try_init()
    };
    result.map_err(|e| AppError::log_setup_error(format!("Failed to install subscriber: {e}")))?;

    let log_file_path = format!("{log_dir}/{log_file_name}");
    Ok((log_file_path, guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_log_path_is_split() {
        let (dir, file) = resolve_log_location(Some("/var/log/rift/app.log"));
        assert_eq!(dir, "/var/log/rift");
        assert_eq!(file, "app.log");
    }

    #[test]
    fn test_bare_file_name_uses_current_dir() {
        let (dir, file) = resolve_log_location(Some("app.log"));
        assert_eq!(dir, ".");
        assert_eq!(file, "app.log");
    }

    #[test]
    fn test_default_log_location() {
        let (dir, file) = resolve_log_location(None);
        assert!(dir.ends_with("logs"));
        assert_eq!(file, LOG_FILE_NAME);
    }
}

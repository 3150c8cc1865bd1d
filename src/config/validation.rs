use std::path::Path;

use super::Config;
use crate::constants::HOST_PLACEHOLDER;
use crate::error::AppError;
use crate::scheduler::QueueClass;

/// Validates the configuration settings
///
/// # Validation Rules
/// - The upstream credential must be present
/// - The host template must be an http(s) URL containing `{host}`
/// - The HTTP timeout must be at least one second
/// - Every scheduler lane must allow at least one request in flight
/// - The probe order cannot be empty
/// - If a log file path is provided, it cannot be empty and its directory must be creatable
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    if config.api_key.is_blank() {
        return Err(AppError::config_error(
            "Upstream API key is missing; set RIOT_API_KEY",
        ));
    }

    let template = config.host_template.trim();
    if !template.starts_with("http://") && !template.starts_with("https://") {
        return Err(AppError::config_error(
            "Host template must start with http:// or https://",
        ));
    }
    if !template.contains(HOST_PLACEHOLDER) {
        return Err(AppError::config_error(format!(
            "Host template must contain the {HOST_PLACEHOLDER} placeholder"
        )));
    }

    if config.http_timeout_seconds == 0 {
        return Err(AppError::config_error(
            "HTTP timeout must be at least 1 second",
        ));
    }

    for class in QueueClass::ALL {
        if config.scheduler.lane(class).max_concurrent == 0 {
            return Err(AppError::config_error(format!(
                "Scheduler lane {class} must allow at least one concurrent request"
            )));
        }
    }

    if config.probe_order.is_empty() {
        return Err(AppError::config_error("Probe order cannot be empty"));
    }

    if let Some(log_path) = &config.log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        if let Some(parent) = Path::new(log_path).parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

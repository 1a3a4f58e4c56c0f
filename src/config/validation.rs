use crate::error::AppError;
use std::path::Path;

/// Validates a URL-valued setting.
///
/// The value must be non-empty and use the http or https scheme.
pub fn validate_url(name: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::config_error(format!("{name} cannot be empty")));
    }

    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .ok_or_else(|| {
            AppError::config_error(format!("{name} must start with http:// or https://"))
        })?;

    if rest.is_empty() || rest.starts_with('/') {
        return Err(AppError::config_error(format!("{name} is missing a host")));
    }

    Ok(())
}

/// Validates the configuration settings
///
/// # Validation Rules
/// - API base URL and version check URL must be http(s) URLs with a host
/// - HTTP timeout must be greater than zero
/// - If log file path is provided, it cannot be empty
/// - Log file path parent directory must exist or be creatable
pub fn validate_config(
    api_base_url: &str,
    version_check_url: &str,
    http_timeout_seconds: u64,
    log_file_path: &Option<String>,
) -> Result<(), AppError> {
    validate_url("API base URL", api_base_url)?;
    validate_url("Version check URL", version_check_url)?;

    if http_timeout_seconds == 0 {
        return Err(AppError::config_error(
            "HTTP timeout must be at least one second",
        ));
    }

    if let Some(log_path) = log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        if let Some(parent) = Path::new(log_path).parent()
            && !parent.as_os_str().is_empty()
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

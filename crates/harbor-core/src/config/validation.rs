use crate::config::types::HarborConfig;
use crate::errors::ConfigError;
use crate::window::LoadTarget;

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidConfiguration {
        message: message.into(),
    }
}

/// Validate a merged configuration.
pub fn validate_config(config: &HarborConfig) -> Result<(), ConfigError> {
    LoadTarget::parse(config.window.load_url())?;

    let (width, height) = config.window.size();
    let (min_width, min_height) = config.window.min_size();
    if min_width == 0 || min_height == 0 {
        return Err(invalid("window minimum size must be positive"));
    }
    if min_width > width || min_height > height {
        return Err(invalid(format!(
            "window minimum size {min_width}x{min_height} exceeds initial size {width}x{height}"
        )));
    }

    let readiness = &config.readiness;
    if readiness.initial_backoff_ms() == 0 {
        return Err(invalid("readiness.initial_backoff_ms must be positive"));
    }
    if readiness.max_backoff_ms() < readiness.initial_backoff_ms() {
        return Err(invalid(
            "readiness.max_backoff_ms must not be smaller than readiness.initial_backoff_ms",
        ));
    }
    if readiness.probe_timeout_ms() == 0 {
        return Err(invalid("readiness.probe_timeout_ms must be positive"));
    }
    if let Some(path) = &readiness.health_path
        && !path.starts_with('/')
    {
        return Err(invalid(format!(
            "readiness.health_path '{path}' must start with '/'"
        )));
    }

    if config.backend.env_var().is_empty() {
        return Err(invalid("backend.env_var must not be empty"));
    }

    Ok(())
}

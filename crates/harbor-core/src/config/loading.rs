//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.harbor/config.toml` (global user preferences)
//! 3. **Project config** - `./.harbor/config.toml` (project-specific overrides)
//! 4. **CLI arguments** - Command-line flags (highest priority, applied by the binary)

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::defaults::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, RESOURCES_DIR_ENV};
use crate::config::types::{BackendConfig, HarborConfig, ReadinessConfig, WindowConfig};
use crate::errors::ConfigError;

/// Load configuration from the hierarchy of config files.
///
/// # Errors
///
/// Returns an error if a present file cannot be read or parsed. Missing
/// config files are not errors. The result is not validated: CLI overrides
/// still apply on top, so callers validate once they are merged in.
pub fn load_hierarchy() -> Result<HarborConfig, ConfigError> {
    let mut sources = Vec::new();
    if let Some(home) = dirs::home_dir() {
        sources.push(home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
    }
    let cwd = std::env::current_dir().map_err(|e| ConfigError::ConfigReadError {
        path: CONFIG_DIR_NAME.to_string(),
        message: format!("cannot determine the current directory: {}", e),
    })?;
    sources.push(cwd.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));

    load_from_paths(&sources)
}

/// Load and merge the given files in order.
pub fn load_from_paths(paths: &[PathBuf]) -> Result<HarborConfig, ConfigError> {
    let mut config = HarborConfig::default();

    for path in paths {
        match load_config_file(path)? {
            Some(file_config) => {
                info!(event = "core.config.file_loaded", path = %path.display());
                config = merge_configs(config, file_config);
            }
            None => debug!(event = "core.config.file_absent", path = %path.display()),
        }
    }

    Ok(config)
}

/// Load a single configuration file. A file that does not exist yields `None`.
fn load_config_file(path: &Path) -> Result<Option<HarborConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ConfigError::ConfigReadError {
                path: path.display().to_string(),
                message: e.to_string(),
            });
        }
    };

    let config = toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        message: format!("{}: {}", path.display(), e),
    })?;

    Ok(Some(config))
}

/// Merge two configurations, with override_config taking precedence.
///
/// Each field of the override replaces the base value only if it is set.
pub fn merge_configs(base: HarborConfig, override_config: HarborConfig) -> HarborConfig {
    let b = base;
    let o = override_config;

    HarborConfig {
        backend: BackendConfig {
            dev_runner: o.backend.dev_runner.or(b.backend.dev_runner),
            dev_runner_args: o.backend.dev_runner_args.or(b.backend.dev_runner_args),
            entry_module: o.backend.entry_module.or(b.backend.entry_module),
            bundle_path: o.backend.bundle_path.or(b.backend.bundle_path),
            runtime: o.backend.runtime.or(b.backend.runtime),
            env_var: o.backend.env_var.or(b.backend.env_var),
            working_dir: o.backend.working_dir.or(b.backend.working_dir),
        },
        window: WindowConfig {
            title: o.window.title.or(b.window.title),
            width: o.window.width.or(b.window.width),
            height: o.window.height.or(b.window.height),
            min_width: o.window.min_width.or(b.window.min_width),
            min_height: o.window.min_height.or(b.window.min_height),
            load_url: o.window.load_url.or(b.window.load_url),
            keep_resident: o.window.keep_resident.or(b.window.keep_resident),
        },
        readiness: ReadinessConfig {
            strategy: o.readiness.strategy.or(b.readiness.strategy),
            dev_delay_ms: o.readiness.dev_delay_ms.or(b.readiness.dev_delay_ms),
            prod_delay_ms: o.readiness.prod_delay_ms.or(b.readiness.prod_delay_ms),
            health_path: o.readiness.health_path.or(b.readiness.health_path),
            initial_backoff_ms: o
                .readiness
                .initial_backoff_ms
                .or(b.readiness.initial_backoff_ms),
            max_backoff_ms: o.readiness.max_backoff_ms.or(b.readiness.max_backoff_ms),
            dev_max_wait_ms: o.readiness.dev_max_wait_ms.or(b.readiness.dev_max_wait_ms),
            prod_max_wait_ms: o
                .readiness
                .prod_max_wait_ms
                .or(b.readiness.prod_max_wait_ms),
            probe_timeout_ms: o
                .readiness
                .probe_timeout_ms
                .or(b.readiness.probe_timeout_ms),
        },
    }
}

/// Resolve the packaged resources directory.
///
/// Resolution order:
/// 1. Explicit override (CLI flag)
/// 2. `HARBOR_RESOURCES_DIR`
/// 3. Next to the executable: `../Resources` on macOS, `resources/` elsewhere
pub fn resolve_resources_dir(explicit: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }

    if let Ok(dir) = std::env::var(RESOURCES_DIR_ENV)
        && !dir.is_empty()
    {
        return Ok(PathBuf::from(dir));
    }

    let exe = std::env::current_exe().map_err(|e| ConfigError::ResourcesDirUnavailable {
        message: format!("cannot locate the executable: {}", e),
    })?;
    let exe_dir = exe
        .parent()
        .ok_or_else(|| ConfigError::ResourcesDirUnavailable {
            message: format!("executable '{}' has no parent directory", exe.display()),
        })?;

    if cfg!(target_os = "macos") {
        Ok(exe_dir.join("..").join("Resources"))
    } else {
        Ok(exe_dir.join("resources"))
    }
}

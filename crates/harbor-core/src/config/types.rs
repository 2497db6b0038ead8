//! Configuration type definitions for Harbor.
//!
//! These types are deserialized from TOML config files. Every field is
//! optional so that user and project files can be merged field by field;
//! accessors on each section fill in the built-in defaults.
//!
//! # Example Configuration
//!
//! ```toml
//! [backend]
//! dev_runner = "nodemon"
//! entry_module = "backend/index.js"
//! bundle_path = "backend/server"
//! env_var = "APP_ENV"
//!
//! [window]
//! title = "Alerts"
//! load_url = "http://localhost:3000"
//!
//! [readiness]
//! strategy = "probe"
//! health_path = "/health"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::defaults;

/// Main configuration loaded from TOML config files.
///
/// Loaded from:
/// 1. User config: `~/.harbor/config.toml`
/// 2. Project config: `./.harbor/config.toml`
///
/// Project config values override user config values.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HarborConfig {
    /// How the backend service is launched
    #[serde(default)]
    pub backend: BackendConfig,

    /// The single UI window and its load target
    #[serde(default)]
    pub window: WindowConfig,

    /// When the backend is presumed reachable
    #[serde(default)]
    pub readiness: ReadinessConfig,
}

/// Backend launch configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BackendConfig {
    /// Watch-and-reload runner used in development mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_runner: Option<String>,

    /// Extra arguments passed to the runner before the entry module.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_runner_args: Option<Vec<String>>,

    /// Backend entry module the runner watches (development).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_module: Option<PathBuf>,

    /// Packaged backend entry point, relative to the resources directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_path: Option<PathBuf>,

    /// Interpreter used to run the bundle. When unset the bundle is executed directly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,

    /// Environment variable carrying the launch mode marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_var: Option<String>,

    /// Working directory for the backend process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
}

impl BackendConfig {
    pub fn dev_runner(&self) -> &str {
        self.dev_runner
            .as_deref()
            .unwrap_or(defaults::DEFAULT_DEV_RUNNER)
    }

    pub fn dev_runner_args(&self) -> &[String] {
        self.dev_runner_args.as_deref().unwrap_or(&[])
    }

    pub fn entry_module(&self) -> &Path {
        self.entry_module
            .as_deref()
            .unwrap_or(Path::new(defaults::DEFAULT_ENTRY_MODULE))
    }

    pub fn bundle_path(&self) -> &Path {
        self.bundle_path
            .as_deref()
            .unwrap_or(Path::new(defaults::DEFAULT_BUNDLE_PATH))
    }

    pub fn env_var(&self) -> &str {
        self.env_var.as_deref().unwrap_or(defaults::DEFAULT_ENV_VAR)
    }
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WindowConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<u32>,

    /// Local address the backend serves the UI on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_url: Option<String>,

    /// Stay resident after the last window closes.
    /// Default: platform convention (macOS only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_resident: Option<bool>,
}

impl WindowConfig {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(defaults::DEFAULT_TITLE)
    }

    pub fn size(&self) -> (u32, u32) {
        (
            self.width.unwrap_or(defaults::DEFAULT_WIDTH),
            self.height.unwrap_or(defaults::DEFAULT_HEIGHT),
        )
    }

    pub fn min_size(&self) -> (u32, u32) {
        (
            self.min_width.unwrap_or(defaults::DEFAULT_MIN_WIDTH),
            self.min_height.unwrap_or(defaults::DEFAULT_MIN_HEIGHT),
        )
    }

    pub fn load_url(&self) -> &str {
        self.load_url
            .as_deref()
            .unwrap_or(defaults::DEFAULT_LOAD_URL)
    }
}

/// How the readiness gate decides the backend is reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadinessStrategy {
    /// Poll the backend's port with exponential backoff.
    Probe,
    /// Wait a fixed, mode-dependent delay.
    Fixed,
}

/// Readiness gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ReadinessConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<ReadinessStrategy>,

    /// Fixed delay in development mode. Default: 5000ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_delay_ms: Option<u64>,

    /// Fixed delay in production mode. Default: 2000ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prod_delay_ms: Option<u64>,

    /// HTTP path that must answer 2xx. When unset a TCP connect is enough.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_backoff_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_backoff_ms: Option<u64>,

    /// Longest probe wait in development mode. Default: 30000ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_max_wait_ms: Option<u64>,

    /// Longest probe wait in production mode. Default: 10000ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prod_max_wait_ms: Option<u64>,

    /// Timeout for a single probe attempt. Default: 500ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe_timeout_ms: Option<u64>,
}

impl ReadinessConfig {
    pub fn strategy(&self) -> ReadinessStrategy {
        self.strategy.unwrap_or(ReadinessStrategy::Probe)
    }

    pub fn dev_delay_ms(&self) -> u64 {
        self.dev_delay_ms.unwrap_or(defaults::DEFAULT_DEV_DELAY_MS)
    }

    pub fn prod_delay_ms(&self) -> u64 {
        self.prod_delay_ms.unwrap_or(defaults::DEFAULT_PROD_DELAY_MS)
    }

    pub fn initial_backoff_ms(&self) -> u64 {
        self.initial_backoff_ms
            .unwrap_or(defaults::DEFAULT_INITIAL_BACKOFF_MS)
    }

    pub fn max_backoff_ms(&self) -> u64 {
        self.max_backoff_ms
            .unwrap_or(defaults::DEFAULT_MAX_BACKOFF_MS)
    }

    pub fn dev_max_wait_ms(&self) -> u64 {
        self.dev_max_wait_ms
            .unwrap_or(defaults::DEFAULT_DEV_MAX_WAIT_MS)
    }

    pub fn prod_max_wait_ms(&self) -> u64 {
        self.prod_max_wait_ms
            .unwrap_or(defaults::DEFAULT_PROD_MAX_WAIT_MS)
    }

    pub fn probe_timeout_ms(&self) -> u64 {
        self.probe_timeout_ms
            .unwrap_or(defaults::DEFAULT_PROBE_TIMEOUT_MS)
    }
}

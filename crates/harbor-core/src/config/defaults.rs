//! Built-in fallback values for every configuration field.

pub const DEFAULT_DEV_RUNNER: &str = "nodemon";
pub const DEFAULT_ENTRY_MODULE: &str = "backend/index.js";
pub const DEFAULT_BUNDLE_PATH: &str = "backend/index.js";
pub const DEFAULT_ENV_VAR: &str = "HARBOR_ENV";

pub const DEFAULT_TITLE: &str = "Harbor";
pub const DEFAULT_WIDTH: u32 = 1200;
pub const DEFAULT_HEIGHT: u32 = 800;
pub const DEFAULT_MIN_WIDTH: u32 = 800;
pub const DEFAULT_MIN_HEIGHT: u32 = 600;
pub const DEFAULT_LOAD_URL: &str = "http://localhost:3000";

/// The development backend compiles and starts its watcher first, so it gets
/// the longer delay.
pub const DEFAULT_DEV_DELAY_MS: u64 = 5000;
pub const DEFAULT_PROD_DELAY_MS: u64 = 2000;

/// Probe backoff: 100ms, 200ms, 400ms ... capped at 2s.
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 100;
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 2000;
pub const DEFAULT_DEV_MAX_WAIT_MS: u64 = 30_000;
pub const DEFAULT_PROD_MAX_WAIT_MS: u64 = 10_000;
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 500;

/// Name of the per-user and per-project config directory.
pub const CONFIG_DIR_NAME: &str = ".harbor";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Overrides the packaged resources directory.
pub const RESOURCES_DIR_ENV: &str = "HARBOR_RESOURCES_DIR";

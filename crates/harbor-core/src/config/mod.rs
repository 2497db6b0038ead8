//! # Configuration System
//!
//! Hierarchical TOML configuration for the Harbor host.
//!
//! ## Configuration Hierarchy
//!
//! 1. **Hardcoded defaults** - see [`defaults`]
//! 2. **User config** - `~/.harbor/config.toml`
//! 3. **Project config** - `./.harbor/config.toml`
//! 4. **CLI arguments** - applied by the binary
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use harbor_core::config::HarborConfig;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = HarborConfig::load_hierarchy()?;
//!     let target = config.load_target()?;
//!     println!("UI will load from {}", target);
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

pub use loading::{merge_configs, resolve_resources_dir};
pub use types::{BackendConfig, HarborConfig, ReadinessConfig, ReadinessStrategy, WindowConfig};
pub use validation::validate_config;

use crate::errors::ConfigError;
use crate::window::LoadTarget;

impl HarborConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, ConfigError> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate_config(self)
    }

    /// The parsed address the UI window loads once the backend is ready.
    pub fn load_target(&self) -> Result<LoadTarget, ConfigError> {
        LoadTarget::parse(self.window.load_url())
    }
}

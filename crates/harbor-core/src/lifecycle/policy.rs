use crate::config::WindowConfig;

/// Platform conventions the coordinator follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformPolicy {
    /// Keep the host alive with no windows, waiting for reactivation.
    pub keep_resident_without_windows: bool,
}

impl PlatformPolicy {
    /// macOS apps conventionally stay in the dock after their last window closes.
    pub fn for_current_platform() -> Self {
        Self {
            keep_resident_without_windows: cfg!(target_os = "macos"),
        }
    }

    /// Platform default, overridden by `[window] keep_resident`.
    pub fn from_config(config: &WindowConfig) -> Self {
        let platform = Self::for_current_platform();
        Self {
            keep_resident_without_windows: config
                .keep_resident
                .unwrap_or(platform.keep_resident_without_windows),
        }
    }
}

impl Default for PlatformPolicy {
    fn default() -> Self {
        Self::for_current_platform()
    }
}

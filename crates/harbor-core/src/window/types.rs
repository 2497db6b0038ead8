use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::WindowConfig;
use crate::errors::ConfigError;

/// Identifies one created window. Each new window gets a higher number, so
/// callbacks armed for a window that has since been destroyed can be told
/// apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowGeneration(u64);

impl WindowGeneration {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Hidden,
    Shown,
}

/// Everything the host needs to build the native window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    pub generation: WindowGeneration,
    pub title: String,
    pub size: (u32, u32),
    pub min_size: (u32, u32),
    /// Injected before any page script runs; the page's only route to the host.
    pub bridge_script: String,
}

impl WindowSpec {
    pub fn from_config(
        generation: WindowGeneration,
        config: &WindowConfig,
        bridge_script: &str,
    ) -> Self {
        Self {
            generation,
            title: config.title().to_string(),
            size: config.size(),
            min_size: config.min_size(),
            bridge_script: bridge_script.to_string(),
        }
    }
}

/// The backend's local address the window loads once the gate opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTarget {
    url: Url,
}

impl LoadTarget {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(raw).map_err(|e| ConfigError::InvalidConfiguration {
            message: format!("load_url '{raw}' is not a valid URL: {e}"),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidConfiguration {
                message: format!("load_url '{raw}' must use http or https"),
            });
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(ConfigError::InvalidConfiguration {
                message: format!("load_url '{raw}' has no host"),
            });
        }

        Ok(Self { url })
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or("localhost")
    }

    /// Explicit port, or the scheme default.
    pub fn port(&self) -> u16 {
        self.url.port_or_known_default().unwrap_or(80)
    }
}

impl fmt::Display for LoadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_target_parses_loopback_url() {
        let target = LoadTarget::parse("http://localhost:3000").unwrap();
        assert_eq!(target.host(), "localhost");
        assert_eq!(target.port(), 3000);
        assert_eq!(target.as_str(), "http://localhost:3000/");
    }

    #[test]
    fn test_load_target_default_port() {
        let target = LoadTarget::parse("https://127.0.0.1").unwrap();
        assert_eq!(target.port(), 443);
    }

    #[test]
    fn test_load_target_rejects_other_schemes() {
        assert!(LoadTarget::parse("file:///tmp/index.html").is_err());
        assert!(LoadTarget::parse("not a url").is_err());
    }

    #[test]
    fn test_window_spec_from_config() {
        let config = WindowConfig {
            title: Some("Alerts".to_string()),
            min_width: Some(640),
            ..Default::default()
        };
        let spec = WindowSpec::from_config(WindowGeneration::new(2), &config, "/* bridge */");
        assert_eq!(spec.title, "Alerts");
        assert_eq!(spec.min_size, (640, 600));
        assert_eq!(spec.bridge_script, "/* bridge */");
    }
}

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which backend executable the supervisor launches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    /// Watch-and-reload runner against the backend's entry module.
    Development,
    /// Packaged backend entry point under the resources directory.
    Production,
}

impl LaunchMode {
    /// Mode matching the build profile of the host binary.
    pub fn from_build() -> Self {
        if cfg!(debug_assertions) {
            LaunchMode::Development
        } else {
            LaunchMode::Production
        }
    }

    /// Value written to the backend's mode marker variable.
    pub fn marker(&self) -> &'static str {
        match self {
            LaunchMode::Development => "development",
            LaunchMode::Production => "production",
        }
    }
}

impl fmt::Display for LaunchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Everything needed to spawn the backend, resolved ahead of time.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchPlan {
    pub mode: LaunchMode,
    pub program: OsString,
    pub args: Vec<OsString>,
    /// Added on top of the inherited host environment.
    pub env: Vec<(String, String)>,
    pub working_dir: Option<PathBuf>,
}

impl LaunchPlan {
    pub fn program_display(&self) -> String {
        self.program.to_string_lossy().to_string()
    }
}

/// The live backend process, owned by the supervisor.
#[derive(Debug, Clone, PartialEq)]
pub struct SubprocessHandle {
    /// May be absent if the OS did not report one.
    pub pid: Option<u32>,
    pub mode: LaunchMode,
    pub started_at: DateTime<Utc>,
}

/// How the backend process ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitReport {
    pub pid: Option<u32>,
    /// `None` when terminated by a signal or when waiting failed.
    pub code: Option<i32>,
    /// Set when the exit status could not be collected.
    pub error: Option<String>,
}

impl ExitReport {
    pub fn from_status(pid: Option<u32>, status: std::process::ExitStatus) -> Self {
        Self {
            pid,
            code: status.code(),
            error: None,
        }
    }

    pub fn wait_failed(pid: Option<u32>, error: impl Into<String>) -> Self {
        Self {
            pid,
            code: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

use std::path::PathBuf;

use crate::errors::HarborError;

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Backend bundle not found at '{}'", path.display())]
    BundleMissing { path: PathBuf },

    #[error("Backend runner '{program}' not found: {message}")]
    RunnerNotFound { program: String, message: String },

    #[error("Failed to spawn '{program}': {message}")]
    SpawnFailed { program: String, message: String },

    #[error("Backend already running (pid {pid:?})")]
    AlreadyRunning { pid: Option<u32> },
}

impl HarborError for ProcessError {
    fn error_code(&self) -> &'static str {
        match self {
            ProcessError::BundleMissing { .. } => "PROCESS_BUNDLE_MISSING",
            ProcessError::RunnerNotFound { .. } => "PROCESS_RUNNER_NOT_FOUND",
            ProcessError::SpawnFailed { .. } => "PROCESS_SPAWN_FAILED",
            ProcessError::AlreadyRunning { .. } => "PROCESS_ALREADY_RUNNING",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ProcessError::BundleMissing { .. } | ProcessError::RunnerNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_missing_display() {
        let error = ProcessError::BundleMissing {
            path: PathBuf::from("/app/resources/backend/index.js"),
        };
        assert_eq!(
            error.to_string(),
            "Backend bundle not found at '/app/resources/backend/index.js'"
        );
        assert_eq!(error.error_code(), "PROCESS_BUNDLE_MISSING");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_spawn_failure_is_not_user_error() {
        let error = ProcessError::SpawnFailed {
            program: "node".to_string(),
            message: "permission denied".to_string(),
        };
        assert!(!error.is_user_error());
    }
}

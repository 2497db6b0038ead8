use crate::errors::HarborError;

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("Failed to create window: {message}")]
    CreateFailed { message: String },

    #[error("Failed to load '{url}': {message}")]
    LoadFailed { url: String, message: String },

    #[error("Failed to run script in window: {message}")]
    ScriptFailed { message: String },
}

impl HarborError for WindowError {
    fn error_code(&self) -> &'static str {
        match self {
            WindowError::CreateFailed { .. } => "WINDOW_CREATE_FAILED",
            WindowError::LoadFailed { .. } => "WINDOW_LOAD_FAILED",
            WindowError::ScriptFailed { .. } => "WINDOW_SCRIPT_FAILED",
        }
    }
}

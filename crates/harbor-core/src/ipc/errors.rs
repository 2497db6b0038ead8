use crate::errors::HarborError;

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("Malformed bridge message: {message}")]
    Malformed { message: String },

    #[error("Unknown bridge operation '{op}'")]
    UnknownOperation { op: String },

    #[error("Operation '{op}' cannot be used as '{kind}'")]
    WrongKind { op: String, kind: String },

    #[error("Invalid payload for '{op}': {message}")]
    InvalidPayload { op: String, message: String },
}

impl HarborError for ProtocolError {
    fn error_code(&self) -> &'static str {
        match self {
            ProtocolError::Malformed { .. } => "IPC_MALFORMED",
            ProtocolError::UnknownOperation { .. } => "IPC_UNKNOWN_OPERATION",
            ProtocolError::WrongKind { .. } => "IPC_WRONG_KIND",
            ProtocolError::InvalidPayload { .. } => "IPC_INVALID_PAYLOAD",
        }
    }

    fn is_user_error(&self) -> bool {
        // Bad messages come from page script, not from the host
        true
    }
}

/// A message that could not be parsed, with its request id when one was readable.
#[derive(Debug)]
pub struct RejectedMessage {
    pub id: Option<u64>,
    pub error: ProtocolError,
}

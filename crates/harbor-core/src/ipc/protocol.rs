//! Messages exchanged between the injected page script and the host.
//!
//! The page posts JSON strings. Request/response operations carry an `id`
//! and always get exactly one [`BridgeReply`]; one-way window commands carry
//! no id and get nothing back.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::ipc::errors::{ProtocolError, RejectedMessage};
use crate::window::LoadTarget;

/// The closed set of operations the page can reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SelectDirectory,
    WriteFile,
    GetAppVersion,
    MinimizeWindow,
    MaximizeWindow,
    CloseWindow,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::SelectDirectory,
        Operation::WriteFile,
        Operation::GetAppVersion,
        Operation::MinimizeWindow,
        Operation::MaximizeWindow,
        Operation::CloseWindow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::SelectDirectory => "select-directory",
            Operation::WriteFile => "write-file",
            Operation::GetAppVersion => "get-app-version",
            Operation::MinimizeWindow => "minimize-window",
            Operation::MaximizeWindow => "maximize-window",
            Operation::CloseWindow => "close-window",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == name)
    }

    /// One-way operations are fire-and-forget and have no reply slot.
    pub fn is_one_way(&self) -> bool {
        matches!(
            self,
            Operation::MinimizeWindow | Operation::MaximizeWindow | Operation::CloseWindow
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request/response operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityRequest {
    SelectDirectory,
    WriteFile { path: String, content: String },
    GetAppVersion,
}

impl CapabilityRequest {
    pub fn operation(&self) -> Operation {
        match self {
            CapabilityRequest::SelectDirectory => Operation::SelectDirectory,
            CapabilityRequest::WriteFile { .. } => Operation::WriteFile,
            CapabilityRequest::GetAppVersion => Operation::GetAppVersion,
        }
    }
}

/// One-way window operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCommand {
    Minimize,
    /// Maximize, or restore when already maximized.
    Maximize,
    Close,
}

impl WindowCommand {
    pub fn operation(&self) -> Operation {
        match self {
            WindowCommand::Minimize => Operation::MinimizeWindow,
            WindowCommand::Maximize => Operation::MaximizeWindow,
            WindowCommand::Close => Operation::CloseWindow,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Invoke { id: u64, request: CapabilityRequest },
    Send(WindowCommand),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    kind: String,
    #[serde(default)]
    id: Option<u64>,
    op: String,
    #[serde(default)]
    payload: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct WriteFilePayload {
    path: String,
    content: String,
}

/// Parse one message posted by the page.
pub fn parse_inbound(body: &str) -> Result<Inbound, RejectedMessage> {
    let envelope: Envelope = serde_json::from_str(body).map_err(|e| RejectedMessage {
        id: None,
        error: ProtocolError::Malformed {
            message: e.to_string(),
        },
    })?;

    let id = envelope.id;
    let reject = |error| RejectedMessage { id, error };

    let op = Operation::from_name(&envelope.op).ok_or_else(|| {
        reject(ProtocolError::UnknownOperation {
            op: envelope.op.clone(),
        })
    })?;

    let request = match (envelope.kind.as_str(), op) {
        ("send", Operation::MinimizeWindow) => return Ok(Inbound::Send(WindowCommand::Minimize)),
        ("send", Operation::MaximizeWindow) => return Ok(Inbound::Send(WindowCommand::Maximize)),
        ("send", Operation::CloseWindow) => return Ok(Inbound::Send(WindowCommand::Close)),
        ("invoke", Operation::SelectDirectory) => CapabilityRequest::SelectDirectory,
        ("invoke", Operation::GetAppVersion) => CapabilityRequest::GetAppVersion,
        ("invoke", Operation::WriteFile) => {
            let payload = envelope.payload.unwrap_or(serde_json::Value::Null);
            let payload: WriteFilePayload = serde_json::from_value(payload).map_err(|e| {
                reject(ProtocolError::InvalidPayload {
                    op: op.to_string(),
                    message: e.to_string(),
                })
            })?;
            CapabilityRequest::WriteFile {
                path: payload.path,
                content: payload.content,
            }
        }
        ("invoke" | "send", _) => {
            return Err(reject(ProtocolError::WrongKind {
                op: op.to_string(),
                kind: envelope.kind.clone(),
            }));
        }
        (other, _) => {
            return Err(reject(ProtocolError::Malformed {
                message: format!("unknown message kind '{other}'"),
            }));
        }
    };

    match id {
        Some(id) => Ok(Inbound::Invoke { id, request }),
        None => Err(reject(ProtocolError::Malformed {
            message: format!("'{op}' invoked without an id"),
        })),
    }
}

/// Result of `select-directory`. Cancelling the dialog is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DirectorySelection {
    Selected { path: String },
    NoneSelected,
}

/// Result of `write-file`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteFileOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WriteFileOutcome {
    pub fn written() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CapabilityResponse {
    Directory(DirectorySelection),
    FileWritten(WriteFileOutcome),
    AppVersion { version: String },
}

/// Host to page answer for one invoked request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeReply {
    pub id: u64,
    #[serde(flatten)]
    pub outcome: ReplyOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReplyOutcome {
    Resolved { result: CapabilityResponse },
    /// The request itself was unusable. The page still gets a settled promise.
    Rejected { error: String },
}

impl BridgeReply {
    pub fn resolved(id: u64, result: CapabilityResponse) -> Self {
        Self {
            id,
            outcome: ReplyOutcome::Resolved { result },
        }
    }

    pub fn rejected(id: u64, error: impl Into<String>) -> Self {
        Self {
            id,
            outcome: ReplyOutcome::Rejected {
                error: error.into(),
            },
        }
    }
}

/// Only the page served from the load target may use the bridge.
pub fn is_trusted_origin(source_url: &str, target: &LoadTarget) -> bool {
    match Url::parse(source_url) {
        Ok(source) => source.origin() == target.url().origin(),
        Err(_) => false,
    }
}

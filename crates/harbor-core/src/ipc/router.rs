use std::path::PathBuf;

use futures::future::BoxFuture;
use tracing::{debug, info, warn};

use crate::ipc::errors::ProtocolError;
use crate::ipc::protocol::{
    BridgeReply, CapabilityRequest, CapabilityResponse, DirectorySelection, WriteFileOutcome,
};

/// Shows a native directory chooser. `None` means the user cancelled.
pub trait DirectoryPicker: Send + Sync {
    fn pick_directory(&self) -> BoxFuture<'static, Option<PathBuf>>;
}

/// Answers request/response operations.
///
/// Every request resolves: failures are encoded in the result so nothing
/// thrown on the host side ever reaches the page as a fault.
pub struct CapabilityRouter<P> {
    picker: P,
    app_version: String,
}

impl<P: DirectoryPicker> CapabilityRouter<P> {
    pub fn new(picker: P, app_version: impl Into<String>) -> Self {
        Self {
            picker,
            app_version: app_version.into(),
        }
    }

    pub async fn handle(&self, id: u64, request: CapabilityRequest) -> BridgeReply {
        let op = request.operation();
        debug!(event = "core.ipc.request_started", id, op = %op);

        let response = match request {
            CapabilityRequest::SelectDirectory => {
                CapabilityResponse::Directory(self.select_directory().await)
            }
            CapabilityRequest::WriteFile { path, content } => {
                CapabilityResponse::FileWritten(write_file(&path, &content).await)
            }
            CapabilityRequest::GetAppVersion => CapabilityResponse::AppVersion {
                version: self.app_version.clone(),
            },
        };

        debug!(event = "core.ipc.request_completed", id, op = %op);
        BridgeReply::resolved(id, response)
    }

    pub fn reject(&self, id: u64, error: &ProtocolError) -> BridgeReply {
        warn!(event = "core.ipc.request_rejected", id, error = %error);
        BridgeReply::rejected(id, error.to_string())
    }

    async fn select_directory(&self) -> DirectorySelection {
        match self.picker.pick_directory().await {
            Some(path) => {
                info!(event = "core.ipc.directory_selected", path = %path.display());
                DirectorySelection::Selected {
                    path: path.to_string_lossy().into_owned(),
                }
            }
            None => {
                debug!(event = "core.ipc.directory_cancelled");
                DirectorySelection::NoneSelected
            }
        }
    }
}

async fn write_file(path: &str, content: &str) -> WriteFileOutcome {
    if path.trim().is_empty() {
        return WriteFileOutcome::failed("path is empty");
    }

    match tokio::fs::write(path, content).await {
        Ok(()) => {
            info!(event = "core.ipc.file_written", path = %path, bytes = content.len());
            WriteFileOutcome::written()
        }
        Err(e) => {
            warn!(event = "core.ipc.file_write_failed", path = %path, error = %e);
            WriteFileOutcome::failed(e.to_string())
        }
    }
}

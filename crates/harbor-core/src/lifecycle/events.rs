use serde::{Deserialize, Serialize};

use crate::lifecycle::types::{HostProcessState, ShutdownReason};
use crate::process::LaunchMode;
use crate::readiness::ReadinessOutcome;
use crate::window::WindowGeneration;

/// What a dispatched signal changed.
///
/// Each variant describes _what happened_. Failures that the host survives
/// (missing bundle, window creation errors) are events too, since none of
/// them stop the lifecycle from moving on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    StateChanged {
        from: HostProcessState,
        to: HostProcessState,
    },
    BridgeRegistered,
    BackendStarted {
        pid: Option<u32>,
        mode: LaunchMode,
    },
    /// The backend could not be started; the UI will load without it.
    BackendUnavailable { error: String },
    BackendStopped,
    BackendExited {
        pid: Option<u32>,
        code: Option<i32>,
    },
    WindowCreated { generation: WindowGeneration },
    WindowCreateFailed { error: String },
    ReadinessScheduled { generation: WindowGeneration },
    TargetLoaded {
        generation: WindowGeneration,
        outcome: ReadinessOutcome,
    },
    /// A readiness wait finished for a window that no longer exists.
    ReadinessAbandoned { generation: WindowGeneration },
    WindowShown { generation: WindowGeneration },
    WindowLoadFailed {
        generation: WindowGeneration,
        error: String,
    },
    WindowDestroyed { generation: WindowGeneration },
    /// Shutdown finished but the host keeps running without windows.
    StayResident,
    /// The host should leave its event loop. Emitted at most once.
    ExitRequested { reason: ShutdownReason },
}

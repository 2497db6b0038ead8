use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ipc::{BridgeReply, WindowCommand};
use crate::process::ExitReport;
use crate::readiness::ReadinessOutcome;
use crate::window::WindowGeneration;

/// Process-wide lifecycle state, owned by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostProcessState {
    Uninitialized,
    Starting,
    Running,
    ShuttingDown,
    Stopped,
}

impl HostProcessState {
    /// Transitions only move forward, except back to `Starting` when a
    /// window is recreated on reactivation.
    pub fn can_transition_to(&self, next: HostProcessState) -> bool {
        use HostProcessState::*;
        matches!(
            (self, next),
            (Uninitialized, Starting)
                | (Starting, Running)
                | (Running, Starting)
                | (Stopped, Starting)
                | (Uninitialized | Starting | Running, ShuttingDown)
                | (ShuttingDown, Stopped)
        )
    }
}

impl fmt::Display for HostProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HostProcessState::Uninitialized => "uninitialized",
            HostProcessState::Starting => "starting",
            HostProcessState::Running => "running",
            HostProcessState::ShuttingDown => "shutting_down",
            HostProcessState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Everything the coordinator reacts to.
///
/// Lifecycle signals come from the windowing toolkit; the rest are results of
/// background work handed back to the event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum HostSignal {
    HostReady,
    /// Dock or taskbar re-invocation.
    Activate,
    WindowPainted {
        generation: WindowGeneration,
    },
    WindowLoadFailed {
        generation: WindowGeneration,
        code: i32,
        description: String,
    },
    /// The user closed the window through the OS.
    WindowClosed,
    AllWindowsClosed,
    BeforeQuit,
    WillQuit,
    ReadinessElapsed {
        generation: WindowGeneration,
        outcome: ReadinessOutcome,
    },
    BackendExited(ExitReport),
    WindowCommand(WindowCommand),
    BridgeReply(BridgeReply),
}

/// Why a shutdown was started. Decides whether the host stays resident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownReason {
    AllWindowsClosed,
    BeforeQuit,
    WillQuit,
}

impl ShutdownReason {
    /// Only the last window going away may leave the host resident. Quit
    /// requests always exit.
    pub fn allows_residency(&self) -> bool {
        matches!(self, ShutdownReason::AllWindowsClosed)
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShutdownReason::AllWindowsClosed => "all_windows_closed",
            ShutdownReason::BeforeQuit => "before_quit",
            ShutdownReason::WillQuit => "will_quit",
        };
        f.write_str(name)
    }
}

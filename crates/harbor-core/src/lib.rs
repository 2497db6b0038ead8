//! harbor-core: Host orchestration for desktop apps backed by a local service
//!
//! This library owns the parts of the host that do not depend on a windowing
//! toolkit: starting and stopping the backend process, deciding when the UI
//! may load, the page-facing capability bridge and the lifecycle state
//! machine tying them together. The `harbor` binary supplies the native
//! window, dialogs and event loop.
//!
//! # Main Entry Points
//!
//! - [`lifecycle`] - Coordinator driven by host signals
//! - [`process`] - Backend subprocess supervision
//! - [`readiness`] - Readiness gate (port probe or fixed delay)
//! - [`window`] - Single-window management behind a toolkit trait
//! - [`ipc`] - Capability bridge protocol, router and injected script
//! - [`config`] - Configuration management

pub mod config;
pub mod errors;
pub mod events;
pub mod ipc;
pub mod lifecycle;
pub mod logging;
pub mod process;
pub mod readiness;
pub mod window;

// Re-export commonly used types at crate root for convenience
pub use config::HarborConfig;
pub use errors::{ConfigError, HarborError, HarborResult};
pub use ipc::{BridgeReply, CapabilityRouter, DirectoryPicker, Inbound, WindowCommand};
pub use lifecycle::{Coordinator, HostProcessState, HostSignal, LifecycleEvent, PlatformPolicy};
pub use process::{ExitReport, LaunchMode, ProcessError, Supervisor, TokioLauncher};
pub use readiness::{ReadinessOutcome, ReadinessPolicy, TokioReadinessScheduler};
pub use window::{LoadTarget, NativeWindow, WindowError, WindowGeneration, WindowHost, WindowSpec};

// Re-export logging initialization
pub use logging::init_logging;

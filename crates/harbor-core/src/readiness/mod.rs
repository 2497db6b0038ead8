//! Readiness gate: decides when the window may load its target.
//!
//! The contract is "never load before the gate reports ready". The default
//! mechanism polls the backend's port with exponential backoff; a fixed,
//! mode-dependent delay remains available for backends without a reachable
//! port to probe.

pub mod probe;
pub mod scheduler;
pub mod types;

pub use probe::{backoff_delay, wait_until_ready};
pub use scheduler::{ReadinessScheduler, ReadyCallback, TokioReadinessScheduler};
pub use types::{ProbeSettings, ReadinessOutcome, ReadinessPolicy};

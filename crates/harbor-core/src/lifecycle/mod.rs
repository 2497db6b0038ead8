pub mod coordinator;
pub mod events;
pub mod policy;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use coordinator::Coordinator;
pub use events::LifecycleEvent;
pub use policy::PlatformPolicy;
pub use types::{HostProcessState, HostSignal, ShutdownReason};

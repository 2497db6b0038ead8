use std::collections::HashMap;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::readiness::probe::wait_until_ready;
use crate::readiness::types::{ReadinessOutcome, ReadinessPolicy};
use crate::window::WindowGeneration;

/// Arms the readiness gate for a window without blocking the caller.
///
/// Implementations report back asynchronously (the host turns that into a
/// `ReadinessElapsed` signal). A released generation may still report if the
/// wait already finished; the window manager ignores stale generations.
pub trait ReadinessScheduler {
    fn schedule(&mut self, generation: WindowGeneration);

    /// Forget a generation, abandoning its wait if it is still running.
    fn release(&mut self, generation: WindowGeneration);
}

pub type ReadyCallback = Arc<dyn Fn(WindowGeneration, ReadinessOutcome) + Send + Sync>;

/// Runs [`wait_until_ready`] on a tokio runtime, one task per window.
pub struct TokioReadinessScheduler {
    runtime: Handle,
    policy: ReadinessPolicy,
    on_ready: ReadyCallback,
    pending: HashMap<WindowGeneration, CancellationToken>,
}

impl TokioReadinessScheduler {
    pub fn new(runtime: Handle, policy: ReadinessPolicy, on_ready: ReadyCallback) -> Self {
        Self {
            runtime,
            policy,
            on_ready,
            pending: HashMap::new(),
        }
    }

    pub fn policy(&self) -> &ReadinessPolicy {
        &self.policy
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl ReadinessScheduler for TokioReadinessScheduler {
    fn schedule(&mut self, generation: WindowGeneration) {
        let token = CancellationToken::new();
        if let Some(previous) = self.pending.insert(generation, token.clone()) {
            previous.cancel();
        }

        let policy = self.policy.clone();
        let on_ready = Arc::clone(&self.on_ready);

        debug!(event = "core.readiness.scheduled", generation = %generation);
        self.runtime.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!(event = "core.readiness.abandoned", generation = %generation);
                }
                outcome = wait_until_ready(&policy) => on_ready(generation, outcome),
            }
        });
    }

    fn release(&mut self, generation: WindowGeneration) {
        if let Some(token) = self.pending.remove(&generation) {
            token.cancel();
        }
    }
}

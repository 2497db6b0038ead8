use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ReadinessConfig, ReadinessStrategy};
use crate::process::LaunchMode;
use crate::window::LoadTarget;

/// How long to hold the window's load, decided per launch mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadinessPolicy {
    /// Wait a fixed delay, then signal ready regardless of the backend.
    FixedDelay(Duration),
    /// Poll the backend until it answers or `max_wait` runs out.
    Probe(ProbeSettings),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSettings {
    pub host: String,
    pub port: u16,
    /// When set, the probe issues `GET <health_path>` and requires a 2xx status.
    pub health_path: Option<String>,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub max_wait: Duration,
    pub probe_timeout: Duration,
}

impl ReadinessPolicy {
    pub fn for_mode(mode: LaunchMode, config: &ReadinessConfig, target: &LoadTarget) -> Self {
        match config.strategy() {
            ReadinessStrategy::Fixed => {
                let delay_ms = match mode {
                    LaunchMode::Development => config.dev_delay_ms(),
                    LaunchMode::Production => config.prod_delay_ms(),
                };
                ReadinessPolicy::FixedDelay(Duration::from_millis(delay_ms))
            }
            ReadinessStrategy::Probe => {
                let max_wait_ms = match mode {
                    LaunchMode::Development => config.dev_max_wait_ms(),
                    LaunchMode::Production => config.prod_max_wait_ms(),
                };
                ReadinessPolicy::Probe(ProbeSettings {
                    host: target.host().to_string(),
                    port: target.port(),
                    health_path: config.health_path.clone(),
                    initial_backoff: Duration::from_millis(config.initial_backoff_ms()),
                    max_backoff: Duration::from_millis(config.max_backoff_ms()),
                    max_wait: Duration::from_millis(max_wait_ms),
                    probe_timeout: Duration::from_millis(config.probe_timeout_ms()),
                })
            }
        }
    }
}

/// What the gate observed before signalling ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReadinessOutcome {
    /// The fixed delay elapsed; reachability is assumed.
    DelayElapsed,
    /// The backend answered a probe.
    Reachable { attempts: u32, waited_ms: u64 },
    /// The backend never answered; the load is attempted anyway.
    TimedOut { attempts: u32, waited_ms: u64 },
}

impl ReadinessOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, ReadinessOutcome::Reachable { .. })
    }
}

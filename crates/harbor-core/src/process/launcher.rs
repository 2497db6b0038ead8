//! Launching the backend and watching it exit.
//!
//! The supervisor only talks to the [`ProcessLauncher`] and [`RunningProcess`]
//! traits so that tests can substitute a recording fake. [`TokioLauncher`] is
//! the real implementation used by the host.

use std::process::Stdio;
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

use crate::process::errors::ProcessError;
use crate::process::types::{ExitReport, LaunchPlan};

/// A spawned backend process.
pub trait RunningProcess {
    fn pid(&self) -> Option<u32>;

    /// Ask the OS to end the process. Returns immediately; the exit is
    /// observed separately through the launcher's exit callback.
    fn terminate(&mut self);
}

/// Spawns backend processes from a resolved [`LaunchPlan`].
pub trait ProcessLauncher {
    fn launch(&mut self, plan: &LaunchPlan) -> Result<Box<dyn RunningProcess>, ProcessError>;
}

/// Called from the runtime once a launched process has exited.
pub type ExitCallback = Arc<dyn Fn(ExitReport) + Send + Sync>;

/// Launcher backed by `tokio::process`.
///
/// Each child gets a watcher task on `runtime` that waits for the exit status
/// and reports it through `on_exit`. Children are spawned with
/// `kill_on_drop`, so tearing down the runtime also takes them down.
pub struct TokioLauncher {
    runtime: Handle,
    on_exit: ExitCallback,
}

impl TokioLauncher {
    pub fn new(runtime: Handle, on_exit: ExitCallback) -> Self {
        Self { runtime, on_exit }
    }
}

impl ProcessLauncher for TokioLauncher {
    fn launch(&mut self, plan: &LaunchPlan) -> Result<Box<dyn RunningProcess>, ProcessError> {
        // tokio::process needs a reactor in scope at spawn time
        let _guard = self.runtime.enter();

        let mut command = tokio::process::Command::new(&plan.program);
        command
            .args(&plan.args)
            .envs(plan.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(dir) = &plan.working_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|e| ProcessError::SpawnFailed {
            program: plan.program_display(),
            message: e.to_string(),
        })?;

        let pid = child.id();
        info!(
            event = "core.process.spawned",
            pid = ?pid,
            program = %plan.program_display(),
            mode = %plan.mode
        );

        let on_exit = Arc::clone(&self.on_exit);
        self.runtime.spawn(async move {
            let report = match child.wait().await {
                Ok(status) => ExitReport::from_status(pid, status),
                Err(e) => ExitReport::wait_failed(pid, e.to_string()),
            };
            debug!(event = "core.process.watcher_finished", pid = ?pid, code = ?report.code);
            on_exit(report);
        });

        Ok(Box::new(TokioProcess {
            pid,
            terminated: false,
        }))
    }
}

struct TokioProcess {
    pid: Option<u32>,
    terminated: bool,
}

impl RunningProcess for TokioProcess {
    fn pid(&self) -> Option<u32> {
        self.pid
    }

    fn terminate(&mut self) {
        if self.terminated {
            return;
        }
        self.terminated = true;

        let Some(pid) = self.pid else {
            warn!(
                event = "core.process.terminate_skipped",
                reason = "no pid reported for backend process"
            );
            return;
        };

        match request_termination(pid) {
            Ok(()) => debug!(event = "core.process.terminate_requested", pid),
            Err(message) => error!(event = "core.process.terminate_failed", pid, error = %message),
        }
    }
}

/// Deliver a termination request synchronously, so it is already on its way
/// even if the host exits right after.
#[cfg(unix)]
fn request_termination(pid: u32) -> Result<(), String> {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let raw = i32::try_from(pid).map_err(|_| format!("pid {pid} out of range"))?;
    kill(Pid::from_raw(raw), Signal::SIGTERM).map_err(|e| e.to_string())
}

#[cfg(windows)]
fn request_termination(pid: u32) -> Result<(), String> {
    let status = std::process::Command::new("taskkill")
        .args(["/PID", &pid.to_string(), "/T", "/F"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| e.to_string())?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("taskkill exited with {status}"))
    }
}

use std::path::PathBuf;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::config::BackendConfig;
use crate::process::errors::ProcessError;
use crate::process::launcher::{ProcessLauncher, RunningProcess};
use crate::process::operations::resolve_launch_plan;
use crate::process::types::{ExitReport, LaunchMode, SubprocessHandle};

struct LiveProcess {
    handle: SubprocessHandle,
    process: Box<dyn RunningProcess>,
}

/// Starts, monitors and terminates the backend service process.
///
/// At most one process is live at a time. Failures are logged and returned,
/// never panicked on: a dead backend leaves the host running with a UI that
/// cannot reach it.
pub struct Supervisor<L: ProcessLauncher> {
    launcher: L,
    config: BackendConfig,
    resources_dir: PathBuf,
    live: Option<LiveProcess>,
    last_exit: Option<ExitReport>,
    last_error: Option<String>,
}

impl<L: ProcessLauncher> Supervisor<L> {
    pub fn new(launcher: L, config: BackendConfig, resources_dir: PathBuf) -> Self {
        Self {
            launcher,
            config,
            resources_dir,
            live: None,
            last_exit: None,
            last_error: None,
        }
    }

    /// Launch the backend for `mode`.
    ///
    /// Must not be called while a process is live; doing so is refused with
    /// [`ProcessError::AlreadyRunning`] and leaves the live process alone.
    pub fn start(&mut self, mode: LaunchMode) -> Result<(), ProcessError> {
        if let Some(live) = &self.live {
            warn!(
                event = "core.process.start_refused",
                pid = ?live.handle.pid,
                reason = "backend already running"
            );
            return Err(ProcessError::AlreadyRunning {
                pid: live.handle.pid,
            });
        }

        info!(event = "core.process.start_started", mode = %mode);

        let result = resolve_launch_plan(mode, &self.config, &self.resources_dir)
            .and_then(|plan| self.launcher.launch(&plan));

        match result {
            Ok(process) => {
                let handle = SubprocessHandle {
                    pid: process.pid(),
                    mode,
                    started_at: Utc::now(),
                };
                info!(event = "core.process.start_completed", pid = ?handle.pid, mode = %mode);
                self.live = Some(LiveProcess { handle, process });
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                error!(event = "core.process.start_failed", mode = %mode, error = %e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Request termination of the live process and forget its handle.
    ///
    /// Idempotent: returns `false` when there was nothing to stop. Does not
    /// wait for the process to exit.
    pub fn stop(&mut self) -> bool {
        let Some(mut live) = self.live.take() else {
            debug!(event = "core.process.stop_skipped", reason = "no live backend");
            return false;
        };

        info!(event = "core.process.stop_started", pid = ?live.handle.pid);
        live.process.terminate();
        true
    }

    /// Record an exit reported by the launcher.
    ///
    /// Clears the handle when the report belongs to the live process. Exits
    /// of an already stopped process are kept for diagnostics only.
    pub fn record_exit(&mut self, report: ExitReport) {
        let is_live = self
            .live
            .as_ref()
            .is_some_and(|live| live.handle.pid == report.pid);

        if is_live {
            self.live = None;
            if report.is_success() {
                info!(event = "core.process.exited", pid = ?report.pid, code = ?report.code);
            } else {
                error!(
                    event = "core.process.exited_unexpectedly",
                    pid = ?report.pid,
                    code = ?report.code,
                    error = ?report.error
                );
                self.last_error = Some(match &report.error {
                    Some(e) => e.clone(),
                    None => format!("backend exited with code {:?}", report.code),
                });
            }
        } else {
            debug!(
                event = "core.process.exit_after_stop",
                pid = ?report.pid,
                code = ?report.code
            );
        }

        self.last_exit = Some(report);
    }

    pub fn handle(&self) -> Option<&SubprocessHandle> {
        self.live.as_ref().map(|live| &live.handle)
    }

    pub fn is_running(&self) -> bool {
        self.live.is_some()
    }

    pub fn last_exit(&self) -> Option<&ExitReport> {
        self.last_exit.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

impl<L: ProcessLauncher> Drop for Supervisor<L> {
    fn drop(&mut self) {
        self.stop();
    }
}

use tracing::{debug, error, info, warn};

use crate::config::WindowConfig;
use crate::ipc::{WindowCommand, bridge_script};
use crate::lifecycle::events::LifecycleEvent;
use crate::lifecycle::policy::PlatformPolicy;
use crate::lifecycle::types::{HostProcessState, HostSignal, ShutdownReason};
use crate::process::{LaunchMode, ProcessLauncher, Supervisor};
use crate::readiness::{ReadinessOutcome, ReadinessScheduler};
use crate::window::{
    GateOutcome, LoadTarget, NativeWindow, WindowCreation, WindowGeneration, WindowHost,
    WindowManager,
};

/// Binds host lifecycle signals to the supervisor, window manager and
/// readiness gate.
///
/// Owns all three and is driven from a single thread. Overlapping shutdown
/// signals are expected; every step of shutdown is an idempotent call on the
/// owning component, guarded by the lifecycle state.
pub struct Coordinator<L: ProcessLauncher, N: NativeWindow, S: ReadinessScheduler> {
    state: HostProcessState,
    mode: LaunchMode,
    supervisor: Supervisor<L>,
    windows: WindowManager<N>,
    scheduler: S,
    window_config: WindowConfig,
    load_target: LoadTarget,
    policy: PlatformPolicy,
    bridge_script: Option<String>,
    exit_requested: bool,
}

impl<L, N, S> Coordinator<L, N, S>
where
    L: ProcessLauncher,
    N: NativeWindow,
    S: ReadinessScheduler,
{
    pub fn new(
        mode: LaunchMode,
        supervisor: Supervisor<L>,
        scheduler: S,
        window_config: WindowConfig,
        load_target: LoadTarget,
        policy: PlatformPolicy,
    ) -> Self {
        Self {
            state: HostProcessState::Uninitialized,
            mode,
            supervisor,
            windows: WindowManager::new(),
            scheduler,
            window_config,
            load_target,
            policy,
            bridge_script: None,
            exit_requested: false,
        }
    }

    /// React to one signal and report what changed.
    pub fn dispatch<H: WindowHost<Window = N>>(
        &mut self,
        signal: HostSignal,
        host: &mut H,
    ) -> Vec<LifecycleEvent> {
        let mut events = Vec::new();

        match signal {
            HostSignal::HostReady => self.on_host_ready(host, &mut events),
            HostSignal::Activate => self.on_activate(host, &mut events),
            HostSignal::WindowPainted { generation } => {
                if self.windows.mark_ready_to_show(generation) {
                    self.on_shown(generation, &mut events);
                }
            }
            HostSignal::WindowLoadFailed {
                generation,
                code,
                description,
            } => {
                if self.windows.current_generation() == Some(generation) {
                    let shown = self
                        .windows
                        .record_load_failure(generation, code, &description);
                    events.push(LifecycleEvent::WindowLoadFailed {
                        generation,
                        error: description,
                    });
                    if shown {
                        self.on_shown(generation, &mut events);
                    }
                }
            }
            HostSignal::ReadinessElapsed {
                generation,
                outcome,
            } => self.on_readiness_elapsed(generation, outcome, &mut events),
            HostSignal::WindowClosed => {
                if let Some(generation) = self.windows.handle_closed() {
                    self.scheduler.release(generation);
                    events.push(LifecycleEvent::WindowDestroyed { generation });
                }
                self.shutdown(ShutdownReason::AllWindowsClosed, &mut events);
            }
            HostSignal::AllWindowsClosed => {
                self.shutdown(ShutdownReason::AllWindowsClosed, &mut events)
            }
            HostSignal::BeforeQuit => self.shutdown(ShutdownReason::BeforeQuit, &mut events),
            HostSignal::WillQuit => self.shutdown(ShutdownReason::WillQuit, &mut events),
            HostSignal::BackendExited(report) => {
                events.push(LifecycleEvent::BackendExited {
                    pid: report.pid,
                    code: report.code,
                });
                self.supervisor.record_exit(report);
            }
            HostSignal::WindowCommand(command) => {
                self.on_window_command(command, &mut events)
            }
            HostSignal::BridgeReply(reply) => {
                self.windows.deliver(&reply);
            }
        }

        events
    }

    fn on_host_ready<H: WindowHost<Window = N>>(
        &mut self,
        host: &mut H,
        events: &mut Vec<LifecycleEvent>,
    ) {
        if self.state != HostProcessState::Uninitialized {
            warn!(event = "core.lifecycle.host_ready_ignored", state = %self.state);
            return;
        }
        self.transition(HostProcessState::Starting, events);

        // Bridge first so the very first window already carries it
        self.bridge_script = Some(bridge_script());
        info!(event = "core.lifecycle.bridge_registered");
        events.push(LifecycleEvent::BridgeRegistered);

        match self.supervisor.start(self.mode) {
            Ok(()) => events.push(LifecycleEvent::BackendStarted {
                pid: self.supervisor.handle().and_then(|h| h.pid),
                mode: self.mode,
            }),
            Err(e) => events.push(LifecycleEvent::BackendUnavailable {
                error: e.to_string(),
            }),
        }

        self.open_window(host, events);
    }

    fn on_activate<H: WindowHost<Window = N>>(
        &mut self,
        host: &mut H,
        events: &mut Vec<LifecycleEvent>,
    ) {
        if self.exit_requested || self.windows.is_open() {
            debug!(
                event = "core.lifecycle.activate_ignored",
                exiting = self.exit_requested,
                window_open = self.windows.is_open()
            );
            return;
        }
        if !matches!(
            self.state,
            HostProcessState::Running | HostProcessState::Stopped
        ) {
            debug!(event = "core.lifecycle.activate_ignored", state = %self.state);
            return;
        }

        info!(event = "core.lifecycle.reactivated", backend_running = self.supervisor.is_running());
        self.transition(HostProcessState::Starting, events);
        self.open_window(host, events);
    }

    /// Create the window and arm the readiness gate for it.
    fn open_window<H: WindowHost<Window = N>>(
        &mut self,
        host: &mut H,
        events: &mut Vec<LifecycleEvent>,
    ) {
        let script = self.bridge_script.as_deref().unwrap_or_default();
        match self.windows.create_window(host, &self.window_config, script) {
            Ok(WindowCreation::Created(generation)) => {
                events.push(LifecycleEvent::WindowCreated { generation });
                self.scheduler.schedule(generation);
                events.push(LifecycleEvent::ReadinessScheduled { generation });
            }
            Ok(WindowCreation::AlreadyOpen(_)) => {}
            Err(e) => events.push(LifecycleEvent::WindowCreateFailed {
                error: e.to_string(),
            }),
        }
    }

    fn on_readiness_elapsed(
        &mut self,
        generation: WindowGeneration,
        outcome: ReadinessOutcome,
        events: &mut Vec<LifecycleEvent>,
    ) {
        self.scheduler.release(generation);

        if !outcome.is_confirmed() {
            warn!(
                event = "core.lifecycle.backend_unconfirmed",
                generation = %generation,
                outcome = ?outcome
            );
        }

        match self.windows.open_gate(generation, &self.load_target) {
            GateOutcome::Stale => {
                events.push(LifecycleEvent::ReadinessAbandoned { generation });
            }
            GateOutcome::AlreadyLoaded => {}
            GateOutcome::Loaded { shown } => {
                events.push(LifecycleEvent::TargetLoaded {
                    generation,
                    outcome,
                });
                if shown {
                    self.on_shown(generation, events);
                }
            }
            GateOutcome::LoadFailed { error, shown } => {
                events.push(LifecycleEvent::WindowLoadFailed { generation, error });
                if shown {
                    self.on_shown(generation, events);
                }
            }
        }
    }

    fn on_shown(&mut self, generation: WindowGeneration, events: &mut Vec<LifecycleEvent>) {
        events.push(LifecycleEvent::WindowShown { generation });
        if self.state == HostProcessState::Starting {
            self.transition(HostProcessState::Running, events);
        }
    }

    fn on_window_command(&mut self, command: WindowCommand, events: &mut Vec<LifecycleEvent>) {
        debug!(event = "core.lifecycle.window_command", op = %command.operation());
        match command {
            WindowCommand::Minimize => self.windows.minimize(),
            WindowCommand::Maximize => self.windows.toggle_maximize(),
            WindowCommand::Close => {
                // Same path as the user closing the window
                if let Some(generation) = self.windows.request_close() {
                    self.scheduler.release(generation);
                    events.push(LifecycleEvent::WindowDestroyed { generation });
                    self.shutdown(ShutdownReason::AllWindowsClosed, events);
                }
            }
        }
    }

    /// Stop the backend, then destroy the window. Safe to call repeatedly.
    fn shutdown(&mut self, reason: ShutdownReason, events: &mut Vec<LifecycleEvent>) {
        if matches!(
            self.state,
            HostProcessState::Uninitialized | HostProcessState::Starting | HostProcessState::Running
        ) {
            info!(event = "core.lifecycle.shutdown_started", reason = %reason, state = %self.state);
            self.transition(HostProcessState::ShuttingDown, events);

            if self.supervisor.stop() {
                events.push(LifecycleEvent::BackendStopped);
            }
            if let Some(generation) = self.windows.destroy() {
                self.scheduler.release(generation);
                events.push(LifecycleEvent::WindowDestroyed { generation });
            }

            self.transition(HostProcessState::Stopped, events);
            info!(event = "core.lifecycle.shutdown_completed", reason = %reason);

            if reason.allows_residency() && self.policy.keep_resident_without_windows {
                info!(event = "core.lifecycle.staying_resident");
                events.push(LifecycleEvent::StayResident);
                return;
            }
        } else {
            debug!(event = "core.lifecycle.shutdown_skipped", reason = %reason, state = %self.state);
            if reason.allows_residency() && self.policy.keep_resident_without_windows {
                return;
            }
        }

        if !self.exit_requested {
            self.exit_requested = true;
            info!(event = "core.lifecycle.exit_requested", reason = %reason);
            events.push(LifecycleEvent::ExitRequested { reason });
        }
    }

    /// Last-resort cleanup after a fault escaped `dispatch`. Stops the
    /// backend and marks the host as exiting; window and lifecycle state may
    /// be half-updated, so they are left alone.
    pub fn stop_after_fault(&mut self) -> bool {
        let stopped = self.supervisor.stop();
        self.exit_requested = true;
        error!(event = "core.lifecycle.fault_cleanup", backend_stopped = stopped, state = %self.state);
        stopped
    }

    fn transition(&mut self, next: HostProcessState, events: &mut Vec<LifecycleEvent>) {
        if !self.state.can_transition_to(next) {
            error!(
                event = "core.lifecycle.transition_refused",
                from = %self.state,
                to = %next
            );
            return;
        }
        debug!(event = "core.lifecycle.state_changed", from = %self.state, to = %next);
        events.push(LifecycleEvent::StateChanged {
            from: self.state,
            to: next,
        });
        self.state = next;
    }

    pub fn state(&self) -> HostProcessState {
        self.state
    }

    pub fn mode(&self) -> LaunchMode {
        self.mode
    }

    pub fn supervisor(&self) -> &Supervisor<L> {
        &self.supervisor
    }

    pub fn windows(&self) -> &WindowManager<N> {
        &self.windows
    }

    pub fn load_target(&self) -> &LoadTarget {
        &self.load_target
    }

    pub fn is_exit_requested(&self) -> bool {
        self.exit_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::{BridgeReply, CapabilityResponse};
    use crate::lifecycle::test_support::{
        FakeLauncher, FakeScheduler, FakeWindow, FakeWindowHost, backend_config_for_tests,
    };
    use crate::process::ExitReport;
    use crate::window::Visibility;
    use tempfile::TempDir;

    struct Harness {
        coordinator: Coordinator<FakeLauncher, FakeWindow, FakeScheduler>,
        launcher: FakeLauncher,
        scheduler: FakeScheduler,
        host: FakeWindowHost,
        _dir: TempDir,
    }

    impl Harness {
        fn new(mode: LaunchMode, keep_resident: bool) -> Self {
            Self::build(mode, keep_resident, true, FakeWindowHost::new())
        }

        fn build(
            mode: LaunchMode,
            keep_resident: bool,
            with_bundle: bool,
            host: FakeWindowHost,
        ) -> Self {
            let dir = TempDir::new().unwrap();
            let config = backend_config_for_tests();
            if with_bundle {
                let bundle = dir.path().join(config.bundle_path());
                std::fs::create_dir_all(bundle.parent().unwrap()).unwrap();
                std::fs::write(bundle, "#!/bin/sh\n").unwrap();
            }

            let launcher = FakeLauncher::new();
            let scheduler = FakeScheduler::new();
            let supervisor = Supervisor::new(launcher.clone(), config, dir.path().to_path_buf());
            let coordinator = Coordinator::new(
                mode,
                supervisor,
                scheduler.clone(),
                WindowConfig::default(),
                LoadTarget::parse("http://localhost:3000").unwrap(),
                PlatformPolicy {
                    keep_resident_without_windows: keep_resident,
                },
            );

            Self {
                coordinator,
                launcher,
                scheduler,
                host,
                _dir: dir,
            }
        }

        fn send(&mut self, signal: HostSignal) -> Vec<LifecycleEvent> {
            self.coordinator.dispatch(signal, &mut self.host)
        }

        fn generation(&self) -> WindowGeneration {
            self.coordinator.windows().current_generation().unwrap()
        }

        fn elapse(&mut self, generation: WindowGeneration) -> Vec<LifecycleEvent> {
            self.send(HostSignal::ReadinessElapsed {
                generation,
                outcome: ReadinessOutcome::DelayElapsed,
            })
        }
    }

    fn count<F: Fn(&LifecycleEvent) -> bool>(events: &[LifecycleEvent], f: F) -> usize {
        events.iter().filter(|e| f(*e)).count()
    }

    #[test]
    fn test_host_ready_starts_backend_before_window() {
        let mut h = Harness::new(LaunchMode::Development, false);

        let events = h.send(HostSignal::HostReady);

        let started = events
            .iter()
            .position(|e| matches!(e, LifecycleEvent::BackendStarted { .. }))
            .unwrap();
        let created = events
            .iter()
            .position(|e| matches!(e, LifecycleEvent::WindowCreated { .. }))
            .unwrap();
        let bridge = events
            .iter()
            .position(|e| matches!(e, LifecycleEvent::BridgeRegistered))
            .unwrap();
        assert!(bridge < started && started < created);

        assert_eq!(h.coordinator.state(), HostProcessState::Starting);
        assert_eq!(h.launcher.launch_count(), 1);
        assert_eq!(h.scheduler.scheduled(), vec![h.generation()]);
        assert!(h.host.log().specs[0].bridge_script.contains("window.ipc.postMessage"));
    }

    #[test]
    fn test_development_backend_gets_mode_marker() {
        let mut h = Harness::new(LaunchMode::Development, false);
        h.send(HostSignal::HostReady);

        let plan = h.launcher.last_plan().unwrap();
        assert!(
            plan.env
                .contains(&("HARBOR_ENV".to_string(), "development".to_string()))
        );
    }

    #[test]
    fn test_window_not_shown_before_both_paint_and_readiness() {
        let mut h = Harness::new(LaunchMode::Development, false);
        h.send(HostSignal::HostReady);
        let generation = h.generation();

        h.send(HostSignal::WindowPainted { generation });
        assert_eq!(h.host.log().shows, 0);
        assert!(h.host.log().loads.is_empty(), "loaded before readiness");

        let events = h.elapse(generation);
        assert_eq!(h.host.log().shows, 1);
        assert_eq!(count(&events, |e| matches!(e, LifecycleEvent::WindowShown { .. })), 1);
        assert_eq!(h.coordinator.state(), HostProcessState::Running);
    }

    #[test]
    fn test_readiness_before_paint_waits_for_paint() {
        let mut h = Harness::new(LaunchMode::Production, false);
        h.send(HostSignal::HostReady);
        let generation = h.generation();

        h.elapse(generation);
        assert_eq!(h.host.log().loads.len(), 1);
        assert_eq!(h.host.log().shows, 0);
        assert_eq!(h.coordinator.state(), HostProcessState::Starting);

        h.send(HostSignal::WindowPainted { generation });
        assert_eq!(h.host.log().shows, 1);
        assert_eq!(
            h.coordinator.windows().visibility(),
            Some(Visibility::Shown)
        );
    }

    #[test]
    fn test_missing_bundle_still_creates_window_and_schedules_load() {
        let mut h = Harness::build(LaunchMode::Production, false, false, FakeWindowHost::new());

        let events = h.send(HostSignal::HostReady);

        assert!(!h.coordinator.supervisor().is_running());
        assert_eq!(h.launcher.launch_count(), 0);
        assert_eq!(
            count(&events, |e| matches!(e, LifecycleEvent::BackendUnavailable { .. })),
            1
        );
        assert_eq!(
            count(&events, |e| matches!(e, LifecycleEvent::WindowCreated { .. })),
            1
        );
        assert_eq!(h.scheduler.scheduled().len(), 1);

        // The load is still attempted; the page will show a connection error
        let generation = h.generation();
        let events = h.elapse(generation);
        assert_eq!(
            count(&events, |e| matches!(e, LifecycleEvent::TargetLoaded { .. })),
            1
        );
        assert!(!h.coordinator.is_exit_requested());
    }

    #[test]
    fn test_window_create_failure_does_not_stop_backend() {
        let mut host = FakeWindowHost::new();
        host.fail_creates();
        let mut h = Harness::build(LaunchMode::Development, false, true, host);

        let events = h.send(HostSignal::HostReady);

        assert!(h.coordinator.supervisor().is_running());
        assert_eq!(
            count(&events, |e| matches!(e, LifecycleEvent::WindowCreateFailed { .. })),
            1
        );
        assert!(h.scheduler.scheduled().is_empty());
    }

    #[test]
    fn test_overlapping_shutdown_signals_terminate_once() {
        let mut h = Harness::new(LaunchMode::Development, false);
        h.send(HostSignal::HostReady);

        let mut events = h.send(HostSignal::AllWindowsClosed);
        events.extend(h.send(HostSignal::BeforeQuit));
        events.extend(h.send(HostSignal::WillQuit));

        assert_eq!(h.launcher.termination_count(), 1);
        assert_eq!(h.host.log().closes, 1);
        assert_eq!(
            count(&events, |e| matches!(e, LifecycleEvent::ExitRequested { .. })),
            1
        );
        assert_eq!(h.coordinator.state(), HostProcessState::Stopped);
        assert!(!h.coordinator.supervisor().is_running());
    }

    #[test]
    fn test_shutdown_stops_backend_before_destroying_window() {
        let mut h = Harness::new(LaunchMode::Development, false);
        h.send(HostSignal::HostReady);

        let events = h.send(HostSignal::BeforeQuit);

        let stopped = events
            .iter()
            .position(|e| matches!(e, LifecycleEvent::BackendStopped))
            .unwrap();
        let destroyed = events
            .iter()
            .position(|e| matches!(e, LifecycleEvent::WindowDestroyed { .. }))
            .unwrap();
        assert!(stopped < destroyed);
    }

    #[test]
    fn test_resident_platform_keeps_running_and_reactivates_without_restart() {
        let mut h = Harness::new(LaunchMode::Development, true);
        h.send(HostSignal::HostReady);
        let first = h.generation();

        let events = h.send(HostSignal::AllWindowsClosed);
        assert_eq!(h.launcher.termination_count(), 1);
        assert!(!h.coordinator.windows().is_open());
        assert!(events.contains(&LifecycleEvent::StayResident));
        assert!(!h.coordinator.is_exit_requested());

        let events = h.send(HostSignal::Activate);
        let second = h.generation();
        assert!(second > first);
        assert!(events.contains(&LifecycleEvent::WindowCreated { generation: second }));
        assert_eq!(h.launcher.launch_count(), 1, "backend must not be restarted");
        assert_eq!(h.scheduler.scheduled(), vec![first, second]);
        assert_eq!(h.coordinator.state(), HostProcessState::Starting);
    }

    #[test]
    fn test_quit_while_resident_exits() {
        let mut h = Harness::new(LaunchMode::Development, true);
        h.send(HostSignal::HostReady);
        h.send(HostSignal::AllWindowsClosed);

        let events = h.send(HostSignal::BeforeQuit);

        assert!(events.contains(&LifecycleEvent::ExitRequested {
            reason: ShutdownReason::BeforeQuit
        }));
        assert_eq!(h.launcher.termination_count(), 1);
    }

    #[test]
    fn test_non_resident_platform_exits_on_window_close() {
        let mut h = Harness::new(LaunchMode::Development, false);
        h.send(HostSignal::HostReady);

        let events = h.send(HostSignal::WindowClosed);

        assert!(events.contains(&LifecycleEvent::ExitRequested {
            reason: ShutdownReason::AllWindowsClosed
        }));
        assert_eq!(h.launcher.termination_count(), 1);
        assert_eq!(h.host.log().closes, 1);
    }

    #[test]
    fn test_activate_with_open_window_is_ignored() {
        let mut h = Harness::new(LaunchMode::Development, true);
        h.send(HostSignal::HostReady);

        let events = h.send(HostSignal::Activate);

        assert!(events.is_empty());
        assert_eq!(h.host.log().specs.len(), 1);
    }

    #[test]
    fn test_activate_after_exit_requested_is_ignored() {
        let mut h = Harness::new(LaunchMode::Development, false);
        h.send(HostSignal::HostReady);
        h.send(HostSignal::BeforeQuit);

        let events = h.send(HostSignal::Activate);

        assert!(events.is_empty());
        assert!(!h.coordinator.windows().is_open());
    }

    #[test]
    fn test_readiness_for_destroyed_window_is_abandoned() {
        let mut h = Harness::new(LaunchMode::Development, true);
        h.send(HostSignal::HostReady);
        let first = h.generation();
        h.send(HostSignal::AllWindowsClosed);
        assert!(h.scheduler.released().contains(&first));

        let events = h.elapse(first);

        assert!(events.contains(&LifecycleEvent::ReadinessAbandoned { generation: first }));
        assert!(h.host.log().loads.is_empty());
    }

    #[test]
    fn test_backend_exit_does_not_change_state() {
        let mut h = Harness::new(LaunchMode::Development, false);
        h.send(HostSignal::HostReady);
        let pid = h.coordinator.supervisor().handle().unwrap().pid;

        let events = h.send(HostSignal::BackendExited(ExitReport {
            pid,
            code: Some(1),
            error: None,
        }));

        assert_eq!(events, vec![LifecycleEvent::BackendExited { pid, code: Some(1) }]);
        assert_eq!(h.coordinator.state(), HostProcessState::Starting);
        assert!(!h.coordinator.supervisor().is_running());
        assert!(!h.coordinator.is_exit_requested());
    }

    #[test]
    fn test_window_commands_without_window_are_noops() {
        let mut h = Harness::new(LaunchMode::Development, false);

        let mut events = h.send(HostSignal::WindowCommand(WindowCommand::Minimize));
        events.extend(h.send(HostSignal::WindowCommand(WindowCommand::Maximize)));
        events.extend(h.send(HostSignal::WindowCommand(WindowCommand::Close)));

        assert!(events.is_empty());
        assert_eq!(h.coordinator.state(), HostProcessState::Uninitialized);
    }

    #[test]
    fn test_close_command_follows_close_lifecycle() {
        let mut h = Harness::new(LaunchMode::Development, false);
        h.send(HostSignal::HostReady);

        let events = h.send(HostSignal::WindowCommand(WindowCommand::Close));

        assert_eq!(h.host.log().closes, 1);
        assert_eq!(h.launcher.termination_count(), 1);
        assert!(events.contains(&LifecycleEvent::ExitRequested {
            reason: ShutdownReason::AllWindowsClosed
        }));
    }

    #[test]
    fn test_minimize_and_maximize_reach_window() {
        let mut h = Harness::new(LaunchMode::Development, false);
        h.send(HostSignal::HostReady);

        h.send(HostSignal::WindowCommand(WindowCommand::Minimize));
        h.send(HostSignal::WindowCommand(WindowCommand::Maximize));

        assert_eq!(h.host.log().minimizes, 1);
        assert!(h.host.log().maximized);
    }

    #[test]
    fn test_bridge_reply_is_posted_to_page() {
        let mut h = Harness::new(LaunchMode::Development, false);
        h.send(HostSignal::HostReady);

        h.send(HostSignal::BridgeReply(BridgeReply::resolved(
            11,
            CapabilityResponse::AppVersion {
                version: "0.1.0".to_string(),
            },
        )));

        let scripts = h.host.log().scripts;
        assert_eq!(scripts.len(), 1);
        assert!(scripts[0].contains("\"id\":11"));
    }

    #[test]
    fn test_load_failure_is_reported_not_retried() {
        let mut host = FakeWindowHost::new();
        host.fail_loads();
        let mut h = Harness::build(LaunchMode::Development, false, true, host);
        h.send(HostSignal::HostReady);
        let generation = h.generation();

        let events = h.elapse(generation);
        assert_eq!(
            count(&events, |e| matches!(e, LifecycleEvent::WindowLoadFailed { .. })),
            1
        );

        h.elapse(generation);
        assert_eq!(h.host.log().loads.len(), 1);
        assert!(!h.coordinator.is_exit_requested());
    }

    #[test]
    fn test_load_failure_after_paint_still_shows_window() {
        let mut host = FakeWindowHost::new();
        host.fail_loads();
        let mut h = Harness::build(LaunchMode::Development, false, true, host);
        h.send(HostSignal::HostReady);
        let generation = h.generation();
        h.send(HostSignal::WindowPainted { generation });

        let events = h.elapse(generation);

        assert_eq!(h.host.log().shows, 1);
        assert_eq!(
            count(&events, |e| matches!(e, LifecycleEvent::WindowShown { .. })),
            1
        );
        assert_eq!(h.coordinator.windows().visibility(), Some(Visibility::Shown));
        assert_eq!(h.coordinator.state(), HostProcessState::Running);

        // The visible window can be closed, which shuts the host down
        h.send(HostSignal::WindowClosed);
        assert_eq!(h.launcher.termination_count(), 1);
        assert!(h.coordinator.is_exit_requested());
    }

    #[test]
    fn test_reported_load_failure_shows_window() {
        let mut h = Harness::new(LaunchMode::Development, false);
        h.send(HostSignal::HostReady);
        let generation = h.generation();
        h.elapse(generation);

        let events = h.send(HostSignal::WindowLoadFailed {
            generation,
            code: -2,
            description: "connection refused".to_string(),
        });

        assert_eq!(h.host.log().shows, 1);
        assert_eq!(
            count(&events, |e| matches!(e, LifecycleEvent::WindowShown { .. })),
            1
        );
        assert_eq!(h.coordinator.state(), HostProcessState::Running);
    }

    #[test]
    fn test_stop_after_fault_terminates_backend_once() {
        let mut h = Harness::new(LaunchMode::Development, false);
        h.send(HostSignal::HostReady);

        assert!(h.coordinator.stop_after_fault());
        assert!(!h.coordinator.stop_after_fault());
        assert!(h.coordinator.is_exit_requested());

        // The loop tearing down afterwards does not signal the backend again
        let events = h.send(HostSignal::WillQuit);
        assert_eq!(h.launcher.termination_count(), 1);
        assert_eq!(
            count(&events, |e| matches!(e, LifecycleEvent::ExitRequested { .. })),
            0
        );
        assert!(!h.coordinator.windows().is_open());
    }

    #[test]
    fn test_second_host_ready_is_ignored() {
        let mut h = Harness::new(LaunchMode::Development, false);
        h.send(HostSignal::HostReady);

        let events = h.send(HostSignal::HostReady);

        assert!(events.is_empty());
        assert_eq!(h.launcher.launch_count(), 1);
    }
}

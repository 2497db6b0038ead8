//! Recording fakes for the OS seams: launcher, window host and readiness
//! scheduler. Each fake shares its log with its clones, so a test can hand
//! one copy to the code under test and inspect the other.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use crate::config::BackendConfig;
use crate::process::{LaunchPlan, ProcessError, ProcessLauncher, RunningProcess};
use crate::readiness::ReadinessScheduler;
use crate::window::{NativeWindow, WindowError, WindowGeneration, WindowHost, WindowSpec};

pub(crate) fn backend_config_for_tests() -> BackendConfig {
    BackendConfig {
        dev_runner: Some("sh".to_string()),
        bundle_path: Some(PathBuf::from("backend/server.sh")),
        ..Default::default()
    }
}

#[derive(Debug, Default)]
struct LauncherLog {
    plans: Vec<LaunchPlan>,
    terminations: usize,
    fail_next: Option<String>,
}

#[derive(Clone, Default)]
pub(crate) struct FakeLauncher {
    log: Rc<RefCell<LauncherLog>>,
}

impl FakeLauncher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn launch_count(&self) -> usize {
        self.log.borrow().plans.len()
    }

    pub(crate) fn termination_count(&self) -> usize {
        self.log.borrow().terminations
    }

    pub(crate) fn last_plan(&self) -> Option<LaunchPlan> {
        self.log.borrow().plans.last().cloned()
    }

    pub(crate) fn fail_next_launch(&self, message: &str) {
        self.log.borrow_mut().fail_next = Some(message.to_string());
    }
}

impl ProcessLauncher for FakeLauncher {
    fn launch(&mut self, plan: &LaunchPlan) -> Result<Box<dyn RunningProcess>, ProcessError> {
        let mut log = self.log.borrow_mut();
        if let Some(message) = log.fail_next.take() {
            return Err(ProcessError::SpawnFailed {
                program: plan.program_display(),
                message,
            });
        }
        log.plans.push(plan.clone());
        let pid = 4000 + log.plans.len() as u32;

        Ok(Box::new(FakeProcess {
            pid,
            log: Rc::clone(&self.log),
        }))
    }
}

struct FakeProcess {
    pid: u32,
    log: Rc<RefCell<LauncherLog>>,
}

impl RunningProcess for FakeProcess {
    fn pid(&self) -> Option<u32> {
        Some(self.pid)
    }

    fn terminate(&mut self) {
        self.log.borrow_mut().terminations += 1;
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct WindowLog {
    pub(crate) specs: Vec<WindowSpec>,
    pub(crate) shows: usize,
    pub(crate) loads: Vec<String>,
    pub(crate) closes: usize,
    pub(crate) minimizes: usize,
    pub(crate) maximized: bool,
    pub(crate) scripts: Vec<String>,
}

#[derive(Clone, Default)]
pub(crate) struct FakeWindowHost {
    log: Rc<RefCell<WindowLog>>,
    fail_creates: bool,
    fail_loads: bool,
}

impl FakeWindowHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_creates(&mut self) {
        self.fail_creates = true;
    }

    pub(crate) fn fail_loads(&mut self) {
        self.fail_loads = true;
    }

    pub(crate) fn log(&self) -> WindowLog {
        self.log.borrow().clone()
    }
}

impl WindowHost for FakeWindowHost {
    type Window = FakeWindow;

    fn create_window(&mut self, spec: &WindowSpec) -> Result<FakeWindow, WindowError> {
        if self.fail_creates {
            return Err(WindowError::CreateFailed {
                message: "no display".to_string(),
            });
        }
        self.log.borrow_mut().specs.push(spec.clone());
        Ok(FakeWindow {
            log: Rc::clone(&self.log),
            fail_loads: self.fail_loads,
        })
    }
}

pub(crate) struct FakeWindow {
    log: Rc<RefCell<WindowLog>>,
    fail_loads: bool,
}

impl NativeWindow for FakeWindow {
    fn show(&self) {
        self.log.borrow_mut().shows += 1;
    }

    fn load_url(&self, url: &str) -> Result<(), WindowError> {
        self.log.borrow_mut().loads.push(url.to_string());
        if self.fail_loads {
            return Err(WindowError::LoadFailed {
                url: url.to_string(),
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }

    fn minimize(&self) {
        self.log.borrow_mut().minimizes += 1;
    }

    fn is_maximized(&self) -> bool {
        self.log.borrow().maximized
    }

    fn set_maximized(&self, maximized: bool) {
        self.log.borrow_mut().maximized = maximized;
    }

    fn evaluate_script(&self, script: &str) -> Result<(), WindowError> {
        self.log.borrow_mut().scripts.push(script.to_string());
        Ok(())
    }
}

impl Drop for FakeWindow {
    fn drop(&mut self) {
        self.log.borrow_mut().closes += 1;
    }
}

#[derive(Debug, Default)]
struct SchedulerLog {
    scheduled: Vec<WindowGeneration>,
    released: Vec<WindowGeneration>,
}

/// Records schedule requests; tests deliver `ReadinessElapsed` by hand.
#[derive(Clone, Default)]
pub(crate) struct FakeScheduler {
    log: Rc<RefCell<SchedulerLog>>,
}

impl FakeScheduler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn scheduled(&self) -> Vec<WindowGeneration> {
        self.log.borrow().scheduled.clone()
    }

    pub(crate) fn released(&self) -> Vec<WindowGeneration> {
        self.log.borrow().released.clone()
    }
}

impl ReadinessScheduler for FakeScheduler {
    fn schedule(&mut self, generation: WindowGeneration) {
        self.log.borrow_mut().scheduled.push(generation);
    }

    fn release(&mut self, generation: WindowGeneration) {
        self.log.borrow_mut().released.push(generation);
    }
}

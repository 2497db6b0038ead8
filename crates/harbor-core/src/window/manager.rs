use tracing::{debug, error, info, warn};

use crate::config::WindowConfig;
use crate::ipc::{BridgeReply, reply_script};
use crate::window::errors::WindowError;
use crate::window::types::{LoadTarget, Visibility, WindowGeneration, WindowSpec};

/// A native window with an embedded webview. Dropping it closes the window.
pub trait NativeWindow {
    fn show(&self);
    fn load_url(&self, url: &str) -> Result<(), WindowError>;
    fn minimize(&self);
    fn is_maximized(&self) -> bool;
    fn set_maximized(&self, maximized: bool);
    fn evaluate_script(&self, script: &str) -> Result<(), WindowError>;
}

/// Builds native windows. Passed into the manager per call because real
/// toolkits only hand out window-creation access inside their event loop.
pub trait WindowHost {
    type Window: NativeWindow;

    fn create_window(&mut self, spec: &WindowSpec) -> Result<Self::Window, WindowError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCreation {
    Created(WindowGeneration),
    /// A window already exists; no duplicate was made.
    AlreadyOpen(WindowGeneration),
}

impl WindowCreation {
    pub fn generation(&self) -> WindowGeneration {
        match self {
            WindowCreation::Created(generation) | WindowCreation::AlreadyOpen(generation) => {
                *generation
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// The generation no longer matches the live window.
    Stale,
    /// The target was already loaded into this window.
    AlreadyLoaded,
    Loaded { shown: bool },
    /// The load was refused. The window is shown anyway so the failure is
    /// visible and the user can close it.
    LoadFailed { error: String, shown: bool },
}

struct ManagedWindow<N> {
    native: N,
    generation: WindowGeneration,
    visibility: Visibility,
    ready_to_show: bool,
    gate_open: bool,
    load_target: Option<String>,
}

impl<N: NativeWindow> ManagedWindow<N> {
    /// No first paint will come for a page that failed to load.
    fn give_up_on_paint(&mut self) -> bool {
        self.ready_to_show = true;
        self.show_if_ready()
    }

    /// Show once both first paint and the readiness gate have happened.
    fn show_if_ready(&mut self) -> bool {
        if self.visibility == Visibility::Hidden && self.ready_to_show && self.gate_open {
            self.native.show();
            self.visibility = Visibility::Shown;
            info!(event = "core.window.shown", generation = %self.generation);
            true
        } else {
            false
        }
    }
}

/// Owns the single top-level UI window.
pub struct WindowManager<N> {
    window: Option<ManagedWindow<N>>,
    last_generation: u64,
}

impl<N: NativeWindow> Default for WindowManager<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NativeWindow> WindowManager<N> {
    pub fn new() -> Self {
        Self {
            window: None,
            last_generation: 0,
        }
    }

    /// Create the hidden window, unless one already exists.
    pub fn create_window<H: WindowHost<Window = N>>(
        &mut self,
        host: &mut H,
        config: &WindowConfig,
        bridge_script: &str,
    ) -> Result<WindowCreation, WindowError> {
        if let Some(window) = &self.window {
            debug!(event = "core.window.create_skipped", generation = %window.generation);
            return Ok(WindowCreation::AlreadyOpen(window.generation));
        }

        let generation = WindowGeneration::new(self.last_generation + 1);
        let spec = WindowSpec::from_config(generation, config, bridge_script);

        let native = host.create_window(&spec).map_err(|e| {
            error!(event = "core.window.create_failed", generation = %generation, error = %e);
            e
        })?;

        self.last_generation = generation.as_u64();
        self.window = Some(ManagedWindow {
            native,
            generation,
            visibility: Visibility::Hidden,
            ready_to_show: false,
            gate_open: false,
            load_target: None,
        });

        info!(
            event = "core.window.created",
            generation = %generation,
            width = spec.size.0,
            height = spec.size.1
        );
        Ok(WindowCreation::Created(generation))
    }

    /// The page finished its first paint. Returns whether the window was shown.
    pub fn mark_ready_to_show(&mut self, generation: WindowGeneration) -> bool {
        let Some(window) = self.live_mut(generation) else {
            debug!(event = "core.window.ready_to_show_stale", generation = %generation);
            return false;
        };
        window.ready_to_show = true;
        window.show_if_ready()
    }

    /// The readiness gate opened: load the target, once per window.
    pub fn open_gate(&mut self, generation: WindowGeneration, target: &LoadTarget) -> GateOutcome {
        let Some(window) = self.live_mut(generation) else {
            debug!(event = "core.window.gate_stale", generation = %generation);
            return GateOutcome::Stale;
        };

        if window.load_target.is_some() {
            debug!(event = "core.window.load_skipped", generation = %generation);
            return GateOutcome::AlreadyLoaded;
        }

        window.gate_open = true;
        // Recorded before loading so a failed load is not retried
        window.load_target = Some(target.as_str().to_string());

        info!(event = "core.window.load_started", generation = %generation, url = %target);
        if let Err(e) = window.native.load_url(target.as_str()) {
            error!(event = "core.window.load_failed", generation = %generation, error = %e);
            return GateOutcome::LoadFailed {
                error: e.to_string(),
                shown: window.give_up_on_paint(),
            };
        }

        GateOutcome::Loaded {
            shown: window.show_if_ready(),
        }
    }

    /// The page failed to load. Not retried: an unreachable backend address
    /// is a configuration problem, not a transient one. Returns whether the
    /// window was shown, since the failed page will never report a paint.
    pub fn record_load_failure(
        &mut self,
        generation: WindowGeneration,
        code: i32,
        description: &str,
    ) -> bool {
        let Some(window) = self.live_mut(generation) else {
            debug!(event = "core.window.load_failure_stale", generation = %generation);
            return false;
        };
        error!(
            event = "core.window.load_failed",
            generation = %generation,
            code,
            description = %description,
            url = ?window.load_target
        );
        window.give_up_on_paint()
    }

    /// The OS window is gone; drop our reference so a new one can be created.
    pub fn handle_closed(&mut self) -> Option<WindowGeneration> {
        let window = self.window.take()?;
        info!(event = "core.window.closed", generation = %window.generation);
        Some(window.generation)
    }

    /// Close the window if present.
    pub fn destroy(&mut self) -> Option<WindowGeneration> {
        let window = self.window.take()?;
        info!(event = "core.window.destroyed", generation = %window.generation);
        Some(window.generation)
    }

    pub fn minimize(&self) {
        match &self.window {
            Some(window) => window.native.minimize(),
            None => debug!(event = "core.window.minimize_skipped", reason = "no window"),
        }
    }

    /// Maximize, or restore when already maximized.
    pub fn toggle_maximize(&self) {
        match &self.window {
            Some(window) => {
                let maximized = window.native.is_maximized();
                window.native.set_maximized(!maximized);
            }
            None => debug!(event = "core.window.maximize_skipped", reason = "no window"),
        }
    }

    /// Close requested from the page. Behaves like the user closing the window.
    pub fn request_close(&mut self) -> Option<WindowGeneration> {
        let generation = self.destroy();
        if generation.is_none() {
            debug!(event = "core.window.close_skipped", reason = "no window");
        }
        generation
    }

    /// Settle the page's pending request. Dropped when no window exists.
    pub fn deliver(&self, reply: &BridgeReply) -> bool {
        let delivered = self.post_script(&reply_script(reply));
        if !delivered {
            debug!(event = "core.window.reply_dropped", id = reply.id);
        }
        delivered
    }

    /// Run a script in the page. Returns false when no window exists.
    pub fn post_script(&self, script: &str) -> bool {
        let Some(window) = &self.window else {
            debug!(event = "core.window.script_dropped", reason = "no window");
            return false;
        };
        match window.native.evaluate_script(script) {
            Ok(()) => true,
            Err(e) => {
                warn!(event = "core.window.script_failed", generation = %window.generation, error = %e);
                false
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.window.is_some()
    }

    pub fn current_generation(&self) -> Option<WindowGeneration> {
        self.window.as_ref().map(|w| w.generation)
    }

    pub fn visibility(&self) -> Option<Visibility> {
        self.window.as_ref().map(|w| w.visibility)
    }

    pub fn load_target(&self) -> Option<&str> {
        self.window.as_ref().and_then(|w| w.load_target.as_deref())
    }

    fn live_mut(&mut self, generation: WindowGeneration) -> Option<&mut ManagedWindow<N>> {
        self.window
            .as_mut()
            .filter(|window| window.generation == generation)
    }
}

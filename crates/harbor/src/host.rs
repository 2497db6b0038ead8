//! Native host: tao event loop, wry webview and the glue that turns toolkit
//! events into [`HostSignal`]s for the coordinator.
//!
//! The event loop thread owns the coordinator. Readiness waits, child
//! watchers and bridge requests run on the tokio runtime and report back
//! through the event loop proxy.

use std::future::Future;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use harbor_core::events::log_app_shutdown;
use harbor_core::ipc::{Inbound, is_trusted_origin, parse_inbound};
use harbor_core::{
    CapabilityRouter, Coordinator, HostSignal, LifecycleEvent, LoadTarget, NativeWindow,
    PlatformPolicy, ReadinessPolicy, Supervisor, TokioLauncher, TokioReadinessScheduler,
    WindowError, WindowGeneration, WindowHost, WindowSpec,
};
use tao::dpi::LogicalSize;
use tao::event::{Event, StartCause, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy, EventLoopWindowTarget};
use tao::window::{Window, WindowBuilder};
use tokio::runtime::Runtime;
use tracing::{debug, error, info, warn};
use wry::{PageLoadEvent, WebView, WebViewBuilder};

use crate::options::HostOptions;
use crate::picker::RfdPicker;

/// Thread-safe handle for posting signals into the event loop.
#[derive(Clone)]
struct SignalSender {
    proxy: Arc<Mutex<EventLoopProxy<HostSignal>>>,
}

impl SignalSender {
    fn new(proxy: EventLoopProxy<HostSignal>) -> Self {
        Self {
            proxy: Arc::new(Mutex::new(proxy)),
        }
    }

    fn send(&self, signal: HostSignal) {
        let proxy = match self.proxy.lock() {
            Ok(proxy) => proxy,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Fails only once the event loop is gone, which is already shutdown
        if proxy.send_event(signal).is_err() {
            debug!(event = "host.signal.dropped", reason = "event loop closed");
        }
    }
}

type Router = CapabilityRouter<RfdPicker>;

/// State shared by every webview's IPC handler.
#[derive(Clone)]
struct BridgeContext {
    router: Arc<Router>,
    runtime: tokio::runtime::Handle,
    signals: SignalSender,
    load_target: LoadTarget,
}

impl BridgeContext {
    /// Route one message posted by the page.
    fn handle_message(&self, source_url: &str, body: &str) {
        if !is_trusted_origin(source_url, &self.load_target) {
            warn!(
                event = "host.ipc.untrusted_origin",
                source = %source_url,
                expected = %self.load_target
            );
            return;
        }

        match parse_inbound(body) {
            Ok(Inbound::Invoke { id, request }) => {
                let router = Arc::clone(&self.router);
                let signals = self.signals.clone();
                self.runtime.spawn(async move {
                    let reply = router.handle(id, request).await;
                    signals.send(HostSignal::BridgeReply(reply));
                });
            }
            Ok(Inbound::Send(command)) => self.signals.send(HostSignal::WindowCommand(command)),
            Err(rejected) => match rejected.id {
                Some(id) => self.signals.send(HostSignal::BridgeReply(
                    self.router.reject(id, &rejected.error),
                )),
                None => warn!(event = "host.ipc.message_dropped", error = %rejected.error),
            },
        }
    }
}

/// A tao window with its webview.
pub struct WryWindow {
    // Dropped before the window it is attached to
    webview: WebView,
    window: Window,
}

impl NativeWindow for WryWindow {
    fn show(&self) {
        self.window.set_visible(true);
        self.window.set_focus();
    }

    fn load_url(&self, url: &str) -> Result<(), WindowError> {
        self.webview
            .load_url(url)
            .map_err(|e| WindowError::LoadFailed {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    fn minimize(&self) {
        self.window.set_minimized(true);
    }

    fn is_maximized(&self) -> bool {
        self.window.is_maximized()
    }

    fn set_maximized(&self, maximized: bool) {
        self.window.set_maximized(maximized);
    }

    fn evaluate_script(&self, script: &str) -> Result<(), WindowError> {
        self.webview
            .evaluate_script(script)
            .map_err(|e| WindowError::ScriptFailed {
                message: e.to_string(),
            })
    }
}

/// Window factory handed to the coordinator for the duration of one dispatch.
struct TaoHost<'a> {
    target: &'a EventLoopWindowTarget<HostSignal>,
    bridge: &'a BridgeContext,
}

impl WindowHost for TaoHost<'_> {
    type Window = WryWindow;

    fn create_window(&mut self, spec: &WindowSpec) -> Result<WryWindow, WindowError> {
        let create_failed = |message: String| WindowError::CreateFailed { message };

        let window = WindowBuilder::new()
            .with_title(&spec.title)
            .with_inner_size(LogicalSize::new(spec.size.0, spec.size.1))
            .with_min_inner_size(LogicalSize::new(spec.min_size.0, spec.min_size.1))
            .with_visible(false)
            .build(self.target)
            .map_err(|e| create_failed(e.to_string()))?;

        let bridge = self.bridge.clone();
        let page_loads = self.bridge.clone();
        let generation = spec.generation;
        let builder = WebViewBuilder::new()
            .with_initialization_script(&spec.bridge_script)
            .with_ipc_handler(move |request| {
                let source = request.uri().to_string();
                bridge.handle_message(&source, request.body());
            })
            .with_on_page_load_handler(move |event, url| {
                match event {
                    PageLoadEvent::Started => {
                        debug!(event = "host.window.page_load_started", generation = %generation, url = %url)
                    }
                    PageLoadEvent::Finished => {
                        info!(event = "host.window.page_load_finished", generation = %generation, url = %url)
                    }
                }
                if let Some(signal) =
                    first_paint_signal(&event, &url, &page_loads.load_target, generation)
                {
                    page_loads.signals.send(signal);
                }
            });

        let webview = build_webview(builder, &window).map_err(|e| create_failed(e.to_string()))?;

        Ok(WryWindow { webview, window })
    }
}

/// The target page finishing its load is the window's first paint. The blank
/// document a fresh webview starts with does not count. Repeats are harmless:
/// the window is shown at most once.
fn first_paint_signal(
    event: &PageLoadEvent,
    url: &str,
    target: &LoadTarget,
    generation: WindowGeneration,
) -> Option<HostSignal> {
    match event {
        PageLoadEvent::Finished if is_trusted_origin(url, target) => {
            Some(HostSignal::WindowPainted { generation })
        }
        _ => None,
    }
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
)))]
fn build_webview(builder: WebViewBuilder<'_>, window: &Window) -> wry::Result<WebView> {
    builder.build(window)
}

#[cfg(any(
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
fn build_webview(builder: WebViewBuilder<'_>, window: &Window) -> wry::Result<WebView> {
    use tao::platform::unix::WindowExtUnix;
    use wry::WebViewBuilderExtUnix;

    match window.default_vbox() {
        Some(vbox) => builder.build_gtk(vbox),
        None => builder.build(window),
    }
}

/// Resolves once the signal arrives. A listener that could not be installed
/// never resolves: losing the hook must not quit the host.
async fn until_delivered<F>(listener: F, signal: &'static str)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = listener.await {
        warn!(event = "host.signal.listener_unavailable", signal, error = %e);
        std::future::pending::<()>().await;
    }
}

/// SIGINT, or SIGTERM on unix.
async fn termination_requested() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = until_delivered(tokio::signal::ctrl_c(), "SIGINT") => {}
                    Some(()) = terminate.recv() => {}
                }
            }
            Err(e) => {
                warn!(event = "host.signal.listener_unavailable", signal = "SIGTERM", error = %e);
                until_delivered(tokio::signal::ctrl_c(), "SIGINT").await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        until_delivered(tokio::signal::ctrl_c(), "SIGINT").await;
    }
}

/// Run the host until the lifecycle requests exit. Does not return on success.
pub fn run(options: HostOptions, runtime: Runtime) -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoopBuilder::<HostSignal>::with_user_event().build();
    let signals = SignalSender::new(event_loop.create_proxy());

    let launcher = {
        let signals = signals.clone();
        TokioLauncher::new(
            runtime.handle().clone(),
            Arc::new(move |report| signals.send(HostSignal::BackendExited(report))),
        )
    };
    let scheduler = {
        let signals = signals.clone();
        TokioReadinessScheduler::new(
            runtime.handle().clone(),
            ReadinessPolicy::for_mode(
                options.mode,
                &options.config.readiness,
                &options.load_target,
            ),
            Arc::new(move |generation, outcome| {
                signals.send(HostSignal::ReadinessElapsed {
                    generation,
                    outcome,
                })
            }),
        )
    };

    let supervisor = Supervisor::new(
        launcher,
        options.config.backend.clone(),
        options.resources_dir.clone(),
    );
    let mut coordinator: Coordinator<_, WryWindow, _> = Coordinator::new(
        options.mode,
        supervisor,
        scheduler,
        options.config.window.clone(),
        options.load_target.clone(),
        PlatformPolicy::from_config(&options.config.window),
    );

    let bridge = BridgeContext {
        router: Arc::new(CapabilityRouter::new(
            RfdPicker::new("Select a folder"),
            env!("CARGO_PKG_VERSION"),
        )),
        runtime: runtime.handle().clone(),
        signals: signals.clone(),
        load_target: options.load_target.clone(),
    };

    {
        let signals = signals.clone();
        runtime.spawn(async move {
            termination_requested().await;
            info!(event = "host.signal.termination_requested");
            signals.send(HostSignal::BeforeQuit);
        });
    }

    info!(
        event = "host.event_loop.started",
        mode = %options.mode,
        load_url = %options.load_target,
        resources_dir = %options.resources_dir.display()
    );

    event_loop.run(move |event, target, control_flow| {
        *control_flow = ControlFlow::Wait;
        // Keeps the runtime alive for as long as the loop runs
        let _runtime = &runtime;

        let signal = match event {
            Event::NewEvents(StartCause::Init) => Some(HostSignal::HostReady),
            Event::Reopen { .. } => Some(HostSignal::Activate),
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => Some(HostSignal::WindowClosed),
            Event::UserEvent(signal) => Some(signal),
            Event::LoopDestroyed => Some(HostSignal::WillQuit),
            _ => None,
        };
        let Some(signal) = signal else {
            return;
        };

        let is_final = matches!(signal, HostSignal::WillQuit);
        let mut host = TaoHost {
            target,
            bridge: &bridge,
        };
        let dispatched =
            panic::catch_unwind(AssertUnwindSafe(|| coordinator.dispatch(signal, &mut host)));
        let events = match dispatched {
            Ok(events) => events,
            Err(_) => {
                // Already logged by the fault hook
                error!(event = "host.event_loop.dispatch_faulted");
                coordinator.stop_after_fault();
                *control_flow = ControlFlow::Exit;
                return;
            }
        };

        for event in &events {
            match event {
                LifecycleEvent::ExitRequested { reason } => {
                    info!(event = "host.event_loop.exit_requested", reason = %reason);
                    *control_flow = ControlFlow::Exit;
                }
                LifecycleEvent::BackendUnavailable { error: message }
                | LifecycleEvent::WindowCreateFailed { error: message } => {
                    error!(event = "host.lifecycle.degraded", error = %message);
                }
                _ => debug!(event = "host.lifecycle.event", lifecycle = ?event),
            }
        }

        if is_final {
            log_app_shutdown();
        }
    })
}

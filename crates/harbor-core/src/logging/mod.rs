use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Directive covering both the host binary and `harbor_core` (target prefix match).
fn log_directive(quiet: bool) -> &'static str {
    if quiet { "harbor=error" } else { "harbor=info" }
}

/// Initialize JSON logging to stderr.
///
/// When `quiet` is true only error-level events are emitted, otherwise
/// info-level and above. `RUST_LOG` can add further directives. Records carry
/// the thread name because child watchers and bridge requests log from
/// runtime workers, not the event loop thread.
pub fn init_logging(quiet: bool) {
    let filter = match log_directive(quiet).parse() {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::from_default_env(),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_thread_names(true)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(filter)
        .init();
}

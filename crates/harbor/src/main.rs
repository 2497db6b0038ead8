use harbor_core::events::{install_fault_hook, log_app_error, log_app_startup};
use harbor_core::init_logging;

mod app;
mod host;
mod options;
mod picker;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let app = app::build_cli();
    let matches = app.get_matches();

    // Quiet unless asked otherwise; the window is the user-facing output
    let verbose = matches.get_flag("verbose");
    init_logging(!verbose);
    install_fault_hook();

    let options = options::HostOptions::resolve(&matches).inspect_err(|e| log_app_error(e))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .thread_name("harbor-worker")
        .enable_all()
        .build()
        .inspect_err(|e| log_app_error(e))?;

    log_app_startup();
    host::run(options, runtime)
}

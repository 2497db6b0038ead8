use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("harbor")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Launch the local backend and present it in a native window")
        .long_about("Harbor starts the app's backend service, waits until it answers on its local address and then shows the UI in a native webview window. The backend is stopped whenever the host shuts down.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
        )
        .arg(
            Arg::new("dev")
                .long("dev")
                .help("Run the backend through the watch-and-reload runner (default in debug builds)")
                .action(ArgAction::SetTrue)
                .conflicts_with("production")
        )
        .arg(
            Arg::new("production")
                .long("production")
                .help("Run the packaged backend bundle (default in release builds)")
                .action(ArgAction::SetTrue)
        )
        .arg(
            Arg::new("url")
                .long("url")
                .value_name("URL")
                .help("Address the window loads once the backend is ready (overrides config)")
        )
        .arg(
            Arg::new("resources-dir")
                .long("resources-dir")
                .value_name("DIR")
                .help("Directory holding the packaged backend (overrides HARBOR_RESOURCES_DIR)")
        )
}

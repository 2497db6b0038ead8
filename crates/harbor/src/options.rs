use std::path::PathBuf;

use clap::ArgMatches;
use harbor_core::config::resolve_resources_dir;
use harbor_core::{ConfigError, HarborConfig, LaunchMode, LoadTarget};

/// Everything the host needs, resolved from config files and CLI flags.
#[derive(Debug, Clone)]
pub struct HostOptions {
    pub mode: LaunchMode,
    pub config: HarborConfig,
    pub load_target: LoadTarget,
    pub resources_dir: PathBuf,
}

impl HostOptions {
    pub fn resolve(matches: &ArgMatches) -> Result<Self, ConfigError> {
        Self::from_config(HarborConfig::load_hierarchy()?, matches)
    }

    /// Apply CLI flags to the merged file config, then validate the result.
    fn from_config(mut config: HarborConfig, matches: &ArgMatches) -> Result<Self, ConfigError> {
        apply_cli_overrides(&mut config, matches);
        config.validate()?;

        let load_target = config.load_target()?;
        let resources_dir =
            resolve_resources_dir(matches.get_one::<String>("resources-dir").map(PathBuf::from))?;

        Ok(Self {
            mode: launch_mode(matches),
            config,
            load_target,
            resources_dir,
        })
    }
}

/// CLI flags win over every config file.
fn apply_cli_overrides(config: &mut HarborConfig, matches: &ArgMatches) {
    if let Some(url) = matches.get_one::<String>("url") {
        config.window.load_url = Some(url.clone());
    }
}

fn launch_mode(matches: &ArgMatches) -> LaunchMode {
    if matches.get_flag("dev") {
        LaunchMode::Development
    } else if matches.get_flag("production") {
        LaunchMode::Production
    } else {
        LaunchMode::from_build()
    }
}

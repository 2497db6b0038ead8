use std::ffi::OsString;
use std::path::Path;

use tracing::{debug, error};

use crate::config::BackendConfig;
use crate::process::errors::ProcessError;
use crate::process::types::{LaunchMode, LaunchPlan};

/// Resolve the program, arguments and environment for the backend.
///
/// Development launches the configured watch-and-reload runner against the
/// entry module. Production launches the packaged bundle under
/// `resources_dir` and fails fast when the bundle is absent: that is a
/// packaging error and retrying will not fix it.
pub fn resolve_launch_plan(
    mode: LaunchMode,
    config: &BackendConfig,
    resources_dir: &Path,
) -> Result<LaunchPlan, ProcessError> {
    let env = vec![(config.env_var().to_string(), mode.marker().to_string())];

    let (program, args) = match mode {
        LaunchMode::Development => {
            let runner = resolve_program(config.dev_runner())?;
            let mut args: Vec<OsString> =
                config.dev_runner_args().iter().map(OsString::from).collect();
            args.push(config.entry_module().as_os_str().to_os_string());
            (runner, args)
        }
        LaunchMode::Production => {
            let bundle = resources_dir.join(config.bundle_path());
            if !bundle.is_file() {
                error!(
                    event = "core.process.bundle_missing",
                    path = %bundle.display(),
                    resources_dir = %resources_dir.display()
                );
                return Err(ProcessError::BundleMissing { path: bundle });
            }

            match &config.runtime {
                Some(runtime) => (
                    resolve_program(runtime)?,
                    vec![bundle.into_os_string()],
                ),
                None => (bundle.into_os_string(), Vec::new()),
            }
        }
    };

    let plan = LaunchPlan {
        mode,
        program,
        args,
        env,
        working_dir: config.working_dir.clone(),
    };

    debug!(
        event = "core.process.plan_resolved",
        mode = %mode,
        program = %plan.program_display(),
        arg_count = plan.args.len()
    );

    Ok(plan)
}

/// Find an executable on `PATH`, or accept an explicit path as-is.
fn resolve_program(program: &str) -> Result<OsString, ProcessError> {
    which::which(program)
        .map(|path| path.into_os_string())
        .map_err(|e| ProcessError::RunnerNotFound {
            program: program.to_string(),
            message: e.to_string(),
        })
}

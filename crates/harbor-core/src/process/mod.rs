pub mod errors;
pub mod launcher;
pub mod operations;
pub mod supervisor;
pub mod types;

pub use errors::ProcessError;
pub use launcher::{ExitCallback, ProcessLauncher, RunningProcess, TokioLauncher};
pub use operations::resolve_launch_plan;
pub use supervisor::Supervisor;
pub use types::{ExitReport, LaunchMode, LaunchPlan, SubprocessHandle};

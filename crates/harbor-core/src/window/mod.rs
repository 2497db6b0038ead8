pub mod errors;
pub mod manager;
pub mod types;

pub use errors::WindowError;
pub use manager::{GateOutcome, NativeWindow, WindowCreation, WindowHost, WindowManager};
pub use types::{LoadTarget, Visibility, WindowGeneration, WindowSpec};

// Port Layer - Interfaces for external dependencies

pub mod platform_probe;
pub mod process_runner;
pub mod task_executor;

// Re-exports
pub use platform_probe::PlatformProbe;
pub use process_runner::{ProcessOutput, ProcessRunner, RunError};
pub use task_executor::TaskExecutor;

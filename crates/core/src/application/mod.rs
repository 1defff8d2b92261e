// Application Layer - Use Cases and Business Logic

pub mod command_builder;
pub mod executor;
pub mod orchestrator;

// Re-exports
pub use command_builder::{build, BuildError};
pub use executor::MeasuringExecutor;
pub use orchestrator::{OrchestratorConfig, RunHandles, TaskOrchestrator};

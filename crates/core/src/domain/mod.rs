// Domain Layer - Pure business logic and entities

pub mod error;
pub mod invocation;
pub mod metric;
pub mod platform;
pub mod task;

// Re-exports
pub use error::DomainError;
pub use invocation::Invocation;
pub use metric::Metric;
pub use platform::Platform;
pub use task::{FailureKind, Task, TaskOutcome};

// Task Executor Port
// Abstraction for measuring one (file, metric) task

use crate::domain::{Platform, Task, TaskOutcome};
use async_trait::async_trait;

/// Task Executor trait
///
/// Implementations:
/// - MeasuringExecutor: builds the platform command and runs it through a ProcessRunner
/// - MockTaskExecutor: canned outcomes for orchestrator tests
///
/// Infallible by contract: every error path ends in a `TaskOutcome::Failure`.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    /// Execute one task against the given platform
    async fn execute(&self, task: &Task, platform: Platform) -> TaskOutcome;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::domain::FailureKind;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Mock executor behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Always succeed with value
        Success(u64),
        /// Always fail with message
        Fail(String),
        /// Panic with message (for panic isolation testing)
        Panic(String),
    }

    /// Mock Task Executor for testing
    pub struct MockTaskExecutor {
        behavior: MockBehavior,
        delay: Option<Duration>,
        executed: Arc<Mutex<Vec<Task>>>,
    }

    impl MockTaskExecutor {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior,
                delay: None,
                executed: Arc::new(Mutex::new(Vec::new())),
            }
        }
        pub fn new_success(value: u64) -> Self {
            Self::new(MockBehavior::Success(value))
        }
        pub fn new_fail(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::Fail(message.into()))
        }
        pub fn new_panic_inducing(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::Panic(message.into()))
        }
        /// Sleep before producing the outcome
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
        pub fn call_count(&self) -> usize {
            self.executed.lock().unwrap().len()
        }
        pub fn executed(&self) -> Vec<Task> {
            self.executed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TaskExecutor for MockTaskExecutor {
        async fn execute(&self, task: &Task, _platform: Platform) -> TaskOutcome {
            self.executed.lock().unwrap().push(task.clone());

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            match &self.behavior {
                MockBehavior::Success(value) => task.success(*value),
                MockBehavior::Fail(msg) => task.failure(FailureKind::NonZeroExit, msg.clone()),
                MockBehavior::Panic(msg) => {
                    panic!("{}", msg);
                }
            }
        }
    }
}

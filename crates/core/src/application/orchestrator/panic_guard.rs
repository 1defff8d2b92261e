// Panic isolation for task and callback safety
use std::panic::{catch_unwind, AssertUnwindSafe};
use tokio::task::JoinError;
use tracing::error;

/// Result of a panic-guarded execution
#[derive(Debug)]
pub enum PanicGuardResult<T> {
    /// Execution completed successfully
    Success(T),
    /// Execution panicked
    Panicked(String),
}

/// Execute a closure with panic isolation
///
/// Used by the dispatcher so a panicking callback does not stop delivery of
/// the remaining outcomes.
pub fn execute_guarded<F, T>(f: F) -> PanicGuardResult<T>
where
    F: FnOnce() -> T,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => PanicGuardResult::Success(result),
        Err(panic_info) => {
            let panic_msg = panic_message(panic_info.as_ref());
            error!(panic_msg = %panic_msg, "Outcome callback panicked");
            PanicGuardResult::Panicked(panic_msg)
        }
    }
}

/// Describe why a spawned task did not return normally
pub fn describe_join_error(join_err: JoinError) -> String {
    if join_err.is_panic() {
        let payload = join_err.into_panic();
        format!("task panicked: {}", panic_message(payload.as_ref()))
    } else {
        "task was cancelled".to_string()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

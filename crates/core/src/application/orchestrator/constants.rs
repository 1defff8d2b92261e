// Orchestrator constants (no magic values)
use std::time::Duration;

/// Fixed ceiling for one measurement process (10s)
/// Exceeding it kills the process and yields a Timeout failure; there is no retry
pub const TASK_TIMEOUT: Duration = Duration::from_secs(10);

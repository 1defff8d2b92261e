// Task Orchestrator - fan-out of (file, metric) tasks

pub mod constants;
mod dispatcher;
mod panic_guard;

pub use panic_guard::{describe_join_error, execute_guarded, PanicGuardResult};

use dispatcher::{spawn_dispatcher, DeliverySender};

use crate::domain::{FailureKind, Metric, Platform, Task, TaskOutcome};
use crate::error::{AppError, Result};
use crate::port::TaskExecutor;
use futures::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, Instrument};

/// Orchestrator configuration
#[derive(Debug, Clone, Default)]
pub struct OrchestratorConfig {
    /// Cap on simultaneously running tasks; `None` schedules everything at once
    pub max_concurrency: Option<usize>,
}

impl OrchestratorConfig {
    /// Every task of a batch runs at once
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// At most `limit` tasks run at the same time
    ///
    /// # Errors
    /// - AppError::Config if `limit` is zero
    pub fn with_max_concurrency(limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(AppError::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            max_concurrency: Some(limit),
        })
    }
}

/// Pending-completion handles for one batch
///
/// One handle per scheduled task; a handle resolves after that task's
/// outcome has been passed to the callback.
#[derive(Debug, Default)]
pub struct RunHandles {
    tasks: Vec<Task>,
    handles: Vec<JoinHandle<()>>,
    dispatcher: Option<JoinHandle<()>>,
}

impl RunHandles {
    /// Scheduled tasks in creation order (files outer, metrics inner)
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait until every task of the batch has finished
    ///
    /// Returns the number of tasks that ran to completion.
    pub async fn join_all(self) -> usize {
        let completed = join_all(self.handles)
            .await
            .into_iter()
            .filter(|r| match r {
                Ok(()) => true,
                Err(e) => {
                    error!(error = %e, "Task handle failed");
                    false
                }
            })
            .count();

        if let Some(dispatcher) = self.dispatcher {
            if let Err(e) = dispatcher.await {
                error!(error = %e, "Dispatcher failed");
            }
        }

        completed
    }
}

/// Fans out one executor run per (file, metric) pair
pub struct TaskOrchestrator {
    platform: Platform,
    executor: Arc<dyn TaskExecutor>,
    limiter: Option<Arc<Semaphore>>,
}

impl TaskOrchestrator {
    pub fn new(platform: Platform, executor: Arc<dyn TaskExecutor>, config: OrchestratorConfig) -> Self {
        Self {
            platform,
            executor,
            limiter: config
                .max_concurrency
                .map(|limit| Arc::new(Semaphore::new(limit))),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Schedule every (file, metric) pair and return immediately
    ///
    /// Pairs are produced files-outer, metrics-inner. `on_task_done` is called
    /// exactly once per task, never concurrently with itself. Must be called
    /// from within a Tokio runtime.
    ///
    /// # Errors
    /// - AppError::UnsupportedPlatform: nothing is scheduled, the callback never runs
    pub fn start_batch<F>(&self, files: &[PathBuf], metrics: &[Metric], on_task_done: F) -> Result<RunHandles>
    where
        F: FnMut(TaskOutcome) + Send + 'static,
    {
        if !self.platform.is_supported() {
            error!(platform = %self.platform, "Refusing to start batch on unsupported platform");
            return Err(AppError::UnsupportedPlatform(self.platform));
        }

        if files.is_empty() || metrics.is_empty() {
            info!(files = files.len(), metrics = metrics.len(), "Empty batch, nothing to schedule");
            return Ok(RunHandles::default());
        }

        let (sender, dispatcher) = spawn_dispatcher(on_task_done);

        let tasks: Vec<Task> = files
            .iter()
            .flat_map(|file| metrics.iter().map(move |metric| Task::new(file.clone(), *metric)))
            .collect();
        let handles: Vec<JoinHandle<()>> = tasks
            .iter()
            .map(|task| self.spawn_task(task.clone(), sender.clone()))
            .collect();

        info!(
            tasks = handles.len(),
            files = files.len(),
            metrics = metrics.len(),
            platform = %self.platform,
            "Batch scheduled"
        );

        // Dispatcher exits once the last task drops its sender
        drop(sender);

        Ok(RunHandles {
            tasks,
            handles,
            dispatcher: Some(dispatcher),
        })
    }

    fn spawn_task(&self, task: Task, sender: DeliverySender) -> JoinHandle<()> {
        let executor = Arc::clone(&self.executor);
        let limiter = self.limiter.clone();
        let platform = self.platform;
        let span = info_span!("task", file = %task.path.display(), metric = %task.metric);

        tokio::spawn(
            async move {
                let permit = match limiter {
                    Some(sem) => sem.acquire_owned().await.ok(),
                    None => None,
                };

                // Inner spawn isolates executor panics from the delivery path
                let exec_task = task.clone();
                let execution =
                    tokio::spawn(async move { executor.execute(&exec_task, platform).await }).await;

                let outcome = match execution {
                    Ok(outcome) => outcome,
                    Err(join_err) => {
                        let msg = describe_join_error(join_err);
                        error!(error = %msg, "Executor did not return an outcome");
                        task.failure(FailureKind::Panicked, msg)
                    }
                };

                drop(permit);
                sender.deliver(outcome).await;
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::MeasuringExecutor;
    use crate::port::process_runner::mocks::{MockBehavior, MockProcessRunner};
    use crate::port::task_executor::mocks::MockTaskExecutor;
    use crate::port::ProcessRunner;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    fn files(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| PathBuf::from(format!("/data/{}", n))).collect()
    }

    fn collector() -> (Arc<Mutex<Vec<TaskOutcome>>>, impl FnMut(TaskOutcome) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |o: TaskOutcome| sink.lock().unwrap().push(o))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_batch_covers_cross_product() {
        let executor = Arc::new(MockTaskExecutor::new_success(1));
        let orchestrator = TaskOrchestrator::new(
            Platform::Linux,
            executor.clone(),
            OrchestratorConfig::unbounded(),
        );
        let (seen, callback) = collector();

        let handles = orchestrator
            .start_batch(&files(&["a.txt", "b.txt", "c.txt"]), &Metric::ALL, callback)
            .unwrap();
        assert_eq!(handles.len(), 12);
        assert_eq!(handles.join_all().await, 12);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 12);
        let identities: HashSet<_> = seen
            .iter()
            .map(|o| (o.path().to_path_buf(), o.metric()))
            .collect();
        assert_eq!(identities.len(), 12);
        assert_eq!(executor.call_count(), 12);
    }

    #[tokio::test]
    async fn test_tasks_created_files_outer_metrics_inner() {
        let executor = Arc::new(MockTaskExecutor::new_success(1));
        let orchestrator = TaskOrchestrator::new(
            Platform::Linux,
            executor.clone(),
            OrchestratorConfig::with_max_concurrency(1).unwrap(),
        );
        let metrics = [Metric::WordCount, Metric::ByteCount];
        let expected = vec![
            Task::new("/data/a", Metric::WordCount),
            Task::new("/data/a", Metric::ByteCount),
            Task::new("/data/b", Metric::WordCount),
            Task::new("/data/b", Metric::ByteCount),
        ];

        let handles = orchestrator
            .start_batch(&files(&["a", "b"]), &metrics, |_| {})
            .unwrap();
        assert_eq!(handles.tasks(), expected.as_slice());
        handles.join_all().await;

        // single permit on a current-thread runtime: executed in creation order
        assert_eq!(executor.executed(), expected);
    }

    #[tokio::test]
    async fn test_task_order_repeats_across_batches() {
        let orchestrator = TaskOrchestrator::new(
            Platform::Linux,
            Arc::new(MockTaskExecutor::new_success(1)),
            OrchestratorConfig::unbounded(),
        );
        let inputs = files(&["z", "a", "m"]);

        let first = orchestrator.start_batch(&inputs, &Metric::ALL, |_| {}).unwrap();
        let second = orchestrator.start_batch(&inputs, &Metric::ALL, |_| {}).unwrap();

        assert_eq!(first.tasks(), second.tasks());
        assert_eq!(first.tasks()[0], Task::new("/data/z", Metric::LineCount));
        assert_eq!(first.tasks()[11], Task::new("/data/m", Metric::ByteCount));
        first.join_all().await;
        second.join_all().await;
    }

    #[tokio::test]
    async fn test_empty_inputs_schedule_nothing() {
        let executor = Arc::new(MockTaskExecutor::new_success(1));
        let orchestrator = TaskOrchestrator::new(
            Platform::Linux,
            executor.clone(),
            OrchestratorConfig::unbounded(),
        );
        let calls = Arc::new(AtomicUsize::new(0));

        let c = calls.clone();
        let no_files = orchestrator
            .start_batch(&[], &Metric::ALL, move |_| {
                c.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        let c = calls.clone();
        let no_metrics = orchestrator
            .start_batch(&files(&["a"]), &[], move |_| {
                c.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        assert!(no_files.is_empty());
        assert!(no_metrics.is_empty());
        assert_eq!(no_files.join_all().await, 0);
        assert_eq!(no_metrics.join_all().await, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(executor.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_platform_refuses_batch() {
        let executor = Arc::new(MockTaskExecutor::new_success(1));
        let orchestrator = TaskOrchestrator::new(
            Platform::Unsupported,
            executor.clone(),
            OrchestratorConfig::unbounded(),
        );
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();

        let result = orchestrator.start_batch(&files(&["a", "b"]), &Metric::ALL, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert!(matches!(
            result,
            Err(AppError::UnsupportedPlatform(Platform::Unsupported))
        ));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(executor.call_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_callback_never_runs_concurrently() {
        let executor = Arc::new(MockTaskExecutor::new_success(1).with_delay(Duration::from_millis(5)));
        let orchestrator =
            TaskOrchestrator::new(Platform::Linux, executor, OrchestratorConfig::unbounded());

        let in_callback = Arc::new(AtomicUsize::new(0));
        let overlaps = Arc::new(AtomicUsize::new(0));
        let (flag, overlap) = (in_callback.clone(), overlaps.clone());

        let names: Vec<String> = (0..10).map(|i| format!("f{}", i)).collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();

        let handles = orchestrator
            .start_batch(&files(&name_refs), &Metric::ALL, move |_| {
                if flag.fetch_add(1, Ordering::SeqCst) != 0 {
                    overlap.fetch_add(1, Ordering::SeqCst);
                }
                std::thread::sleep(Duration::from_millis(1));
                flag.fetch_sub(1, Ordering::SeqCst);
            })
            .unwrap();
        assert_eq!(handles.join_all().await, 40);

        assert_eq!(overlaps.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_executor_panic_becomes_failure() {
        let executor = Arc::new(MockTaskExecutor::new_panic_inducing("executor exploded"));
        let orchestrator =
            TaskOrchestrator::new(Platform::Linux, executor, OrchestratorConfig::unbounded());
        let (seen, callback) = collector();

        let handles = orchestrator
            .start_batch(&files(&["a", "b"]), &[Metric::LineCount], callback)
            .unwrap();
        assert_eq!(handles.join_all().await, 2);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        for outcome in seen.iter() {
            match outcome {
                TaskOutcome::Failure { kind, message, .. } => {
                    assert_eq!(*kind, FailureKind::Panicked);
                    assert!(message.contains("executor exploded"));
                }
                other => panic!("expected failure, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_failed_tasks_each_delivered_once() {
        let executor = Arc::new(MockTaskExecutor::new_fail("wc: exit 1"));
        let orchestrator =
            TaskOrchestrator::new(Platform::Linux, executor, OrchestratorConfig::unbounded());
        let (seen, callback) = collector();

        let handles = orchestrator
            .start_batch(&files(&["a", "b"]), &Metric::ALL, callback)
            .unwrap();
        assert_eq!(handles.join_all().await, 8);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 8);
        assert!(seen
            .iter()
            .all(|o| o.failure_kind() == Some(FailureKind::NonZeroExit)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_runner_panic_contained_to_its_task() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.txt");
        let bad = dir.path().join("explode.txt");
        std::fs::write(&good, "x\n").unwrap();
        std::fs::write(&bad, "x\n").unwrap();

        let runner = Arc::new(
            MockProcessRunner::new(MockBehavior::stdout("7"))
                .with_override("explode", MockBehavior::Panic("runner blew up".to_string())),
        );
        let executor = Arc::new(MeasuringExecutor::new(runner.clone() as Arc<dyn ProcessRunner>));
        let orchestrator =
            TaskOrchestrator::new(Platform::Linux, executor, OrchestratorConfig::unbounded());
        let (seen, callback) = collector();

        let handles = orchestrator
            .start_batch(&[good.clone(), bad.clone()], &[Metric::LineCount], callback)
            .unwrap();
        assert_eq!(handles.join_all().await, 2);

        let seen = seen.lock().unwrap();
        let good_outcome = seen.iter().find(|o| o.path() == good.as_path()).unwrap();
        let bad_outcome = seen.iter().find(|o| o.path() == bad.as_path()).unwrap();
        assert_eq!(good_outcome.value(), Some(7));
        assert_eq!(bad_outcome.failure_kind(), Some(FailureKind::Panicked));
        assert_eq!(runner.spawn_count(), 2);
    }

    #[tokio::test]
    async fn test_start_batch_returns_before_tasks_finish() {
        let executor =
            Arc::new(MockTaskExecutor::new_success(9).with_delay(Duration::from_millis(200)));
        let orchestrator =
            TaskOrchestrator::new(Platform::Linux, executor, OrchestratorConfig::unbounded());
        let (seen, callback) = collector();

        let started = std::time::Instant::now();
        let handles = orchestrator
            .start_batch(&files(&["a"]), &[Metric::LineCount], callback)
            .unwrap();
        assert!(started.elapsed() < Duration::from_millis(100));
        assert!(seen.lock().unwrap().is_empty());

        handles.join_all().await;
        assert_eq!(seen.lock().unwrap()[0].value(), Some(9));
    }

    #[tokio::test]
    async fn test_concurrency_cap_serializes_tasks() {
        let executor =
            Arc::new(MockTaskExecutor::new_success(1).with_delay(Duration::from_millis(50)));
        let orchestrator = TaskOrchestrator::new(
            Platform::Linux,
            executor,
            OrchestratorConfig::with_max_concurrency(1).unwrap(),
        );

        let started = std::time::Instant::now();
        let handles = orchestrator
            .start_batch(&files(&["a", "b", "c"]), &[Metric::LineCount], |_| {})
            .unwrap();
        handles.join_all().await;

        assert!(started.elapsed() >= Duration::from_millis(150));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        assert!(matches!(
            OrchestratorConfig::with_max_concurrency(0),
            Err(AppError::Config(_))
        ));
    }
}

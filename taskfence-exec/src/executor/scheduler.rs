use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::executor::budget::FailureBudgetTracker;
use crate::executor::events::{Event, EventSink, NoOpEventSink};
use crate::executor::handoff::{self, Dispatch, Intake};
use crate::executor::result::ExecutionError;
use crate::executor::task::Task;
use crate::executor::types::{ExecutorConfig, WorkerCount};
use crate::executor::worker::{Assignment, Worker, WorkerReport};

pub struct Executor {
    config: ExecutorConfig,
    event_sink: Arc<dyn EventSink>,
}

impl Executor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self {
            config,
            event_sink: Arc::new(NoOpEventSink),
        }
    }

    pub fn with_event_sink(mut self, event_sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = event_sink;
        self
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Runs `tasks` in order across the configured worker pool.
    ///
    /// Returns once every worker has stopped. The only error is
    /// [`ExecutionError::ErrorsLimitExceeded`]; individual task errors are
    /// only reported through the event sink.
    pub async fn run(&self, tasks: Vec<Task>) -> Result<(), ExecutionError> {
        let run_id = Uuid::new_v4();
        let total_tasks = tasks.len();
        let workers = self.config.worker_count().clamp_to(total_tasks);
        let tracker = Arc::new(FailureBudgetTracker::new(self.config.budget()));

        info!(
            %run_id,
            workers = workers.get(),
            failure_budget = tracker.budget().limit(),
            total_tasks,
            "run started"
        );
        self.event_sink
            .emit(Event::RunStarted {
                run_id,
                workers: workers.get(),
                failure_budget: tracker.budget().limit(),
                total_tasks,
            })
            .await;

        let (dispatch, intake) = handoff::channel(workers.get());
        let handles = self.spawn_workers(run_id, workers, intake, &tracker);
        let dispatched = dispatch_tasks(run_id, tasks, dispatch, &tracker).await;
        join_workers(run_id, handles).await;

        let failures = tracker.failures();
        let aborted = tracker.is_aborted();
        info!(%run_id, dispatched, failures, aborted, "run finished");
        self.event_sink
            .emit(Event::RunFinished {
                run_id,
                dispatched,
                failures,
                aborted,
            })
            .await;

        tracker.outcome()
    }

    fn spawn_workers(
        &self,
        run_id: Uuid,
        workers: WorkerCount,
        intake: Intake<Assignment>,
        tracker: &Arc<FailureBudgetTracker>,
    ) -> Vec<JoinHandle<WorkerReport>> {
        (0..workers.get())
            .map(|worker_id| {
                let worker = Worker {
                    worker_id,
                    run_id,
                    intake: intake.clone(),
                    tracker: tracker.clone(),
                    event_sink: self.event_sink.clone(),
                };
                tokio::spawn(worker.run())
            })
            .collect()
    }
}

/// Hands tasks to idle workers in list order until the list runs out or the
/// abort latch is set. Returns how many tasks were handed over.
async fn dispatch_tasks(
    run_id: Uuid,
    tasks: Vec<Task>,
    mut dispatch: Dispatch<Assignment>,
    tracker: &FailureBudgetTracker,
) -> usize {
    let mut dispatched = 0;
    'tasks: for (index, task) in tasks.into_iter().enumerate() {
        let mut pending = Assignment { index, task };
        loop {
            let Some(slot) = dispatch.ready().await else {
                debug!(%run_id, "all workers stopped before the task list was exhausted");
                break 'tasks;
            };
            if tracker.is_aborted() {
                debug!(%run_id, next_task = index, "abort observed, stopping dispatch");
                break 'tasks;
            }
            match slot.fill(pending) {
                Ok(()) => {
                    dispatched += 1;
                    break;
                }
                Err(returned) => pending = returned,
            }
        }
    }
    dispatched
}

async fn join_workers(run_id: Uuid, handles: Vec<JoinHandle<WorkerReport>>) {
    for handle in handles {
        match handle.await {
            Ok(report) => debug!(
                %run_id,
                worker_id = report.worker_id,
                executed = report.executed,
                exit = ?report.exit,
                "worker joined"
            ),
            Err(e) => error!(%run_id, error = %e, "worker task failed to join"),
        }
    }
}

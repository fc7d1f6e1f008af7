use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::executor::budget::FailureBudgetTracker;
use crate::executor::events::{Event, EventSink};
use crate::executor::handoff::Intake;
use crate::executor::task::Task;
use crate::executor::types::FailureBudget;

/// A task tagged with its position in the caller's list.
#[derive(Debug)]
pub struct Assignment {
    pub index: usize,
    pub task: Task,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// The dispatcher closed the hand-off.
    Drained,
    /// The abort latch stopped this worker.
    Aborted,
}

#[derive(Debug, Clone, Copy)]
pub struct WorkerReport {
    pub worker_id: usize,
    pub executed: usize,
    pub exit: WorkerExit,
}

pub struct Worker {
    pub worker_id: usize,
    pub run_id: Uuid,
    pub intake: Intake<Assignment>,
    pub tracker: Arc<FailureBudgetTracker>,
    pub event_sink: Arc<dyn EventSink>,
}

impl Worker {
    pub async fn run(self) -> WorkerReport {
        let mut executed = 0;
        let exit = loop {
            let Some(Assignment { index, task }) = self.intake.recv().await else {
                break WorkerExit::Drained;
            };

            if self.tracker.is_aborted() {
                drop(task);
                self.emit(Event::TaskSkipped {
                    run_id: self.run_id,
                    task_index: index,
                })
                .await;
                break WorkerExit::Aborted;
            }

            self.emit(Event::TaskStarted {
                run_id: self.run_id,
                task_index: index,
            })
            .await;
            executed += 1;

            match task.execute().await {
                Ok(()) => {
                    self.emit(Event::TaskSucceeded {
                        run_id: self.run_id,
                        task_index: index,
                    })
                    .await;
                }
                Err(err) => {
                    let record = self.tracker.record_failure();
                    debug!(
                        worker_id = self.worker_id,
                        task_index = index,
                        error = %err,
                        "task failed"
                    );
                    self.emit(Event::TaskFailed {
                        run_id: self.run_id,
                        task_index: index,
                        error: err.to_string(),
                    })
                    .await;

                    if record.latched_abort {
                        warn!(
                            run_id = %self.run_id,
                            failures = record.failures,
                            budget = self.tracker.budget().limit(),
                            "failure budget exhausted, aborting remaining tasks"
                        );
                        self.emit(Event::AbortTriggered {
                            run_id: self.run_id,
                            failures: record.failures,
                        })
                        .await;
                    }

                    if self.tracker.budget() == FailureBudget::ZeroTolerance {
                        break WorkerExit::Aborted;
                    }
                }
            }
        };

        debug!(worker_id = self.worker_id, executed, ?exit, "worker stopped");
        WorkerReport {
            worker_id: self.worker_id,
            executed,
            exit,
        }
    }

    async fn emit(&self, event: Event) {
        self.event_sink.emit(event).await;
    }
}

#![forbid(unsafe_code)]

//! Bounded concurrent task executor.
//!
//! A run hands a list of fallible tasks to a fixed pool of workers and stops
//! handing out new work once the configured failure budget is exhausted.
//! Tasks already granted to a worker always run to completion, so at most
//! `workers + failure_budget` tasks execute on a run that aborts.

pub mod executor;

pub use crate::executor::{
    ConfigError, ExecutionError, Executor, ExecutorConfig, FailureBudget, Task, TaskError,
    WorkerCount,
};

/// Runs `tasks` on `workers` concurrent workers, tolerating fewer than
/// `failure_budget` failures.
///
/// `workers <= 0` runs a single worker. `failure_budget <= 0` aborts on the
/// first failure.
pub async fn run(
    tasks: Vec<Task>,
    workers: i64,
    failure_budget: i64,
) -> Result<(), ExecutionError> {
    Executor::new(ExecutorConfig::new(workers, failure_budget))
        .run(tasks)
        .await
}

pub mod budget;
mod config;
pub mod events;
pub mod handoff;
pub mod metrics;
mod result;
mod scheduler;
mod task;
mod types;
mod worker;

pub use budget::{FailureBudgetTracker, FailureRecord};
pub use config::ConfigError;
pub use events::{CompositeEventSink, Event, EventSink, NoOpEventSink, StdoutEventSink};
pub use metrics::{MetricsCollector, MetricsEventSink, RunMetrics};
pub use result::ExecutionError;
pub use scheduler::Executor;
pub use task::{Task, TaskError, TaskFault};
pub use types::{ExecutorConfig, FailureBudget, WorkerCount};

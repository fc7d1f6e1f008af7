use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    RunStarted {
        run_id: Uuid,
        workers: usize,
        failure_budget: usize,
        total_tasks: usize,
    },
    RunFinished {
        run_id: Uuid,
        dispatched: usize,
        failures: usize,
        aborted: bool,
    },
    TaskStarted {
        run_id: Uuid,
        task_index: usize,
    },
    TaskSucceeded {
        run_id: Uuid,
        task_index: usize,
    },
    TaskFailed {
        run_id: Uuid,
        task_index: usize,
        error: String,
    },
    /// Pulled by a worker after the abort latched and dropped unrun.
    TaskSkipped {
        run_id: Uuid,
        task_index: usize,
    },
    AbortTriggered {
        run_id: Uuid,
        failures: usize,
    },
}

impl Event {
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::RunStarted { .. } => "run.started",
            Event::RunFinished { .. } => "run.finished",
            Event::TaskStarted { .. } => "task.started",
            Event::TaskSucceeded { .. } => "task.succeeded",
            Event::TaskFailed { .. } => "task.failed",
            Event::TaskSkipped { .. } => "task.skipped",
            Event::AbortTriggered { .. } => "run.abort_triggered",
        }
    }

    pub fn run_id(&self) -> Uuid {
        match self {
            Event::RunStarted { run_id, .. }
            | Event::RunFinished { run_id, .. }
            | Event::TaskStarted { run_id, .. }
            | Event::TaskSucceeded { run_id, .. }
            | Event::TaskFailed { run_id, .. }
            | Event::TaskSkipped { run_id, .. }
            | Event::AbortTriggered { run_id, .. } => *run_id,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let ty = self.event_type();
        let run_id = self.run_id().to_string();
        match self {
            Event::RunStarted {
                workers,
                failure_budget,
                total_tasks,
                ..
            } => {
                json!({
                    "type": ty,
                    "run_id": run_id,
                    "workers": workers,
                    "failure_budget": failure_budget,
                    "total_tasks": total_tasks,
                })
            }
            Event::RunFinished {
                dispatched,
                failures,
                aborted,
                ..
            } => {
                json!({
                    "type": ty,
                    "run_id": run_id,
                    "dispatched": dispatched,
                    "failures": failures,
                    "aborted": aborted,
                })
            }
            Event::TaskStarted { task_index, .. }
            | Event::TaskSucceeded { task_index, .. }
            | Event::TaskSkipped { task_index, .. } => {
                json!({ "type": ty, "run_id": run_id, "task_index": task_index })
            }
            Event::TaskFailed {
                task_index, error, ..
            } => {
                json!({ "type": ty, "run_id": run_id, "task_index": task_index, "error": error })
            }
            Event::AbortTriggered { failures, .. } => {
                json!({ "type": ty, "run_id": run_id, "failures": failures })
            }
        }
    }
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: Event);
}

pub struct CompositeEventSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl Default for CompositeEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeEventSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add(&mut self, sink: Arc<dyn EventSink>) {
        self.sinks.push(sink);
    }
}

#[async_trait]
impl EventSink for CompositeEventSink {
    async fn emit(&self, event: Event) {
        for sink in &self.sinks {
            sink.emit(event.clone()).await;
        }
    }
}

/// Writes one JSON object per line to stdout.
pub struct StdoutEventSink;

#[async_trait]
impl EventSink for StdoutEventSink {
    async fn emit(&self, event: Event) {
        println!(
            "{}",
            serde_json::to_string(&event.to_json()).unwrap_or_default()
        );
    }
}

pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: Event) {}
}

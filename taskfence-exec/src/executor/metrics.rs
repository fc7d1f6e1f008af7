use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::executor::{Event, EventSink};

#[derive(Debug, Clone, Default)]
pub struct RunMetrics {
    pub run_id: Option<Uuid>,
    pub started_at: Option<Instant>,
    pub finished_at: Option<Instant>,
    pub total_duration: Option<Duration>,
    pub tasks_total: usize,
    pub tasks_dispatched: usize,
    pub tasks_started: usize,
    pub tasks_succeeded: usize,
    pub tasks_failed: usize,
    pub tasks_skipped: usize,
    pub running: usize,
    pub peak_running: usize,
    pub aborted: bool,
}

impl RunMetrics {
    pub fn start(&mut self, run_id: Uuid, tasks_total: usize) {
        *self = Self {
            run_id: Some(run_id),
            started_at: Some(Instant::now()),
            tasks_total,
            ..Default::default()
        };
    }

    pub fn record_task_started(&mut self) {
        self.tasks_started += 1;
        self.running += 1;
        self.peak_running = self.peak_running.max(self.running);
    }

    pub fn record_task_success(&mut self) {
        self.tasks_succeeded += 1;
        self.running = self.running.saturating_sub(1);
    }

    pub fn record_task_failure(&mut self) {
        self.tasks_failed += 1;
        self.running = self.running.saturating_sub(1);
    }

    pub fn record_task_skipped(&mut self) {
        self.tasks_skipped += 1;
    }

    pub fn record_abort(&mut self) {
        self.aborted = true;
    }

    pub fn finish(&mut self, dispatched: usize, aborted: bool) {
        self.tasks_dispatched = dispatched;
        self.aborted |= aborted;
        self.finished_at = Some(Instant::now());
        if let (Some(started), Some(finished)) = (self.started_at, self.finished_at) {
            self.total_duration = Some(finished.duration_since(started));
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "run_id": self.run_id.map(|id| id.to_string()),
            "duration_ms": self.total_duration.map(|d| d.as_millis() as u64),
            "aborted": self.aborted,
            "tasks": {
                "total": self.tasks_total,
                "dispatched": self.tasks_dispatched,
                "started": self.tasks_started,
                "succeeded": self.tasks_succeeded,
                "failed": self.tasks_failed,
                "skipped": self.tasks_skipped,
            },
            "peak_running": self.peak_running,
        })
    }
}

#[derive(Default)]
pub struct MetricsCollector {
    metrics: Arc<Mutex<RunMetrics>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, event: &Event) {
        let mut metrics = self.metrics.lock().await;
        match event {
            Event::RunStarted {
                run_id,
                total_tasks,
                ..
            } => metrics.start(*run_id, *total_tasks),
            Event::TaskStarted { .. } => metrics.record_task_started(),
            Event::TaskSucceeded { .. } => metrics.record_task_success(),
            Event::TaskFailed { .. } => metrics.record_task_failure(),
            Event::TaskSkipped { .. } => metrics.record_task_skipped(),
            Event::AbortTriggered { .. } => metrics.record_abort(),
            Event::RunFinished {
                dispatched,
                aborted,
                ..
            } => metrics.finish(*dispatched, *aborted),
        }
    }

    pub async fn get_metrics(&self) -> RunMetrics {
        self.metrics.lock().await.clone()
    }
}

/// Records every event into a [`MetricsCollector`] before forwarding it.
pub struct MetricsEventSink {
    collector: Arc<MetricsCollector>,
    base: Arc<dyn EventSink>,
}

impl MetricsEventSink {
    pub fn new(collector: Arc<MetricsCollector>, base: Arc<dyn EventSink>) -> Self {
        Self { collector, base }
    }
}

#[async_trait]
impl EventSink for MetricsEventSink {
    async fn emit(&self, event: Event) {
        self.collector.record(&event).await;
        self.base.emit(event).await;
    }
}

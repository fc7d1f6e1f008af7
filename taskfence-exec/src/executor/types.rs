use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// Number of tasks allowed to run at once. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerCount(NonZeroUsize);

impl WorkerCount {
    pub const ONE: Self = Self(NonZeroUsize::MIN);

    /// Values `<= 0` are coerced to a single worker.
    pub fn from_raw(raw: i64) -> Self {
        positive(raw).map(Self).unwrap_or(Self::ONE)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }

    /// Caps the pool at one worker per task, keeping at least one.
    pub fn clamp_to(self, tasks: usize) -> Self {
        NonZeroUsize::new(self.get().min(tasks))
            .map(Self)
            .unwrap_or(Self::ONE)
    }
}

impl Default for WorkerCount {
    fn default() -> Self {
        std::thread::available_parallelism()
            .map(Self)
            .unwrap_or(Self::ONE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureBudget {
    /// The first failure aborts the run.
    #[default]
    ZeroTolerance,
    /// The run aborts once this many failures have been counted.
    Limit(NonZeroUsize),
}

impl FailureBudget {
    /// Values `<= 0` select [`FailureBudget::ZeroTolerance`].
    pub fn from_raw(raw: i64) -> Self {
        positive(raw)
            .map(Self::Limit)
            .unwrap_or(Self::ZeroTolerance)
    }

    pub fn is_exhausted_by(self, failures: usize) -> bool {
        match self {
            Self::ZeroTolerance => failures > 0,
            Self::Limit(limit) => failures >= limit.get(),
        }
    }

    /// The configured limit, `0` for zero tolerance.
    pub fn limit(self) -> usize {
        match self {
            Self::ZeroTolerance => 0,
            Self::Limit(limit) => limit.get(),
        }
    }
}

fn positive(raw: i64) -> Option<NonZeroUsize> {
    if raw <= 0 {
        return None;
    }
    NonZeroUsize::new(usize::try_from(raw).unwrap_or(usize::MAX))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    pub workers: i64,
    pub failure_budget: i64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            workers: i64::try_from(WorkerCount::default().get()).unwrap_or(1),
            failure_budget: 0,
        }
    }
}

impl ExecutorConfig {
    pub fn new(workers: i64, failure_budget: i64) -> Self {
        Self {
            workers,
            failure_budget,
        }
    }

    pub fn worker_count(&self) -> WorkerCount {
        WorkerCount::from_raw(self.workers)
    }

    pub fn budget(&self) -> FailureBudget {
        FailureBudget::from_raw(self.failure_budget)
    }
}

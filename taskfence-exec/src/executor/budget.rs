use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::executor::result::ExecutionError;
use crate::executor::types::FailureBudget;

/// Failure counter and abort latch shared by the dispatcher and every worker
/// of a single run.
#[derive(Debug)]
pub struct FailureBudgetTracker {
    budget: FailureBudget,
    failures: AtomicUsize,
    aborted: AtomicBool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureRecord {
    /// Failure count including this one.
    pub failures: usize,
    /// True only for the caller that flipped the abort latch.
    pub latched_abort: bool,
}

impl FailureBudgetTracker {
    pub fn new(budget: FailureBudget) -> Self {
        Self {
            budget,
            failures: AtomicUsize::new(0),
            aborted: AtomicBool::new(false),
        }
    }

    pub fn budget(&self) -> FailureBudget {
        self.budget
    }

    /// Returns the post-increment count.
    pub fn increment(&self) -> usize {
        self.failures.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Acquire)
    }

    /// Latches the abort signal. Returns `true` if this call set it.
    pub fn abort(&self) -> bool {
        !self.aborted.swap(true, Ordering::AcqRel)
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }

    /// Counts one failure and latches the abort signal once the budget is
    /// exhausted.
    pub fn record_failure(&self) -> FailureRecord {
        let failures = self.increment();
        let latched_abort = self.budget.is_exhausted_by(failures) && self.abort();
        FailureRecord {
            failures,
            latched_abort,
        }
    }

    pub fn outcome(&self) -> Result<(), ExecutionError> {
        if self.budget.is_exhausted_by(self.failures()) {
            return Err(ExecutionError::ErrorsLimitExceeded);
        }
        Ok(())
    }
}

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};

use taskfence_exec::executor::FailureBudgetTracker;
use taskfence_exec::{ExecutionError, FailureBudget};

fn limit(n: usize) -> FailureBudget {
    FailureBudget::Limit(NonZeroUsize::new(n).unwrap())
}

#[test]
fn increment_returns_post_increment_value() {
    let tracker = FailureBudgetTracker::new(limit(3));
    assert_eq!(tracker.failures(), 0);
    assert_eq!(tracker.increment(), 1);
    assert_eq!(tracker.increment(), 2);
    assert_eq!(tracker.failures(), 2);
}

#[test]
fn abort_is_set_once() {
    let tracker = FailureBudgetTracker::new(limit(1));
    assert!(!tracker.is_aborted());
    assert!(tracker.abort());
    assert!(tracker.is_aborted());
    assert!(!tracker.abort());
    assert!(tracker.is_aborted());
}

#[test]
fn record_failure_latches_when_limit_reached() {
    let tracker = FailureBudgetTracker::new(limit(2));

    let first = tracker.record_failure();
    assert_eq!(first.failures, 1);
    assert!(!first.latched_abort);
    assert!(!tracker.is_aborted());
    assert!(tracker.outcome().is_ok());

    let second = tracker.record_failure();
    assert_eq!(second.failures, 2);
    assert!(second.latched_abort);
    assert_eq!(tracker.outcome(), Err(ExecutionError::ErrorsLimitExceeded));

    let third = tracker.record_failure();
    assert_eq!(third.failures, 3);
    assert!(!third.latched_abort);
}

#[test]
fn zero_tolerance_latches_on_first_failure() {
    let tracker = FailureBudgetTracker::new(FailureBudget::ZeroTolerance);
    assert!(tracker.outcome().is_ok());

    let record = tracker.record_failure();
    assert!(record.latched_abort);
    assert!(tracker.is_aborted());
    assert_eq!(tracker.outcome(), Err(ExecutionError::ErrorsLimitExceeded));
}

#[test]
fn concurrent_failures_are_counted_exactly_and_latch_once() {
    let tracker = FailureBudgetTracker::new(limit(500));
    let latches = AtomicUsize::new(0);

    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..250 {
                    if tracker.record_failure().latched_abort {
                        latches.fetch_add(1, Ordering::SeqCst);
                    }
                }
            });
        }
    });

    assert_eq!(tracker.failures(), 2000);
    assert_eq!(latches.load(Ordering::SeqCst), 1);
    assert!(tracker.is_aborted());
}

#[test]
fn budget_from_raw_values() {
    assert_eq!(FailureBudget::from_raw(0), FailureBudget::ZeroTolerance);
    assert_eq!(FailureBudget::from_raw(-7), FailureBudget::ZeroTolerance);
    assert_eq!(FailureBudget::from_raw(4), limit(4));
    assert_eq!(FailureBudget::from_raw(4).limit(), 4);
    assert_eq!(FailureBudget::ZeroTolerance.limit(), 0);
}

#[test]
fn budget_exhaustion_rules() {
    assert!(!FailureBudget::ZeroTolerance.is_exhausted_by(0));
    assert!(FailureBudget::ZeroTolerance.is_exhausted_by(1));
    assert!(!limit(3).is_exhausted_by(2));
    assert!(limit(3).is_exhausted_by(3));
    assert!(limit(3).is_exhausted_by(10));
}

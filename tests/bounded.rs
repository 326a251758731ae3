//! Timing-sensitive scenarios for the bounded executor.
//!
//! Budgets here are generous relative to the sleeps they race against so the
//! tests stay stable on loaded CI machines.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use timebox::{BoundedExecutor, Outcome, RunError};

#[test]
fn fast_call_returns_its_value() {
    let executor = BoundedExecutor::new(Duration::from_millis(500));
    let value = executor.run(|| "ok").expect("well within budget");
    assert_eq!(value, "ok");
}

#[test]
fn slow_call_times_out_with_the_budget_in_the_message() {
    let executor = BoundedExecutor::new(Duration::from_millis(50));
    let result = executor.run(|| {
        thread::sleep(Duration::from_millis(200));
        42
    });
    match result {
        Err(RunError::Timeout { budget }) => {
            assert_eq!(budget, Duration::from_millis(50));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
    // Operators correlate slow calls with their configured budget.
    let message = executor
        .run(|| thread::sleep(Duration::from_millis(200)))
        .expect_err("must time out")
        .to_string();
    assert!(message.contains("50"), "message was: {message}");
}

#[test]
fn executor_is_reusable_after_a_timeout() {
    let executor = BoundedExecutor::new(Duration::from_millis(100));
    assert!(
        executor
            .run(|| thread::sleep(Duration::from_secs(2)))
            .is_err()
    );
    assert_eq!(executor.run(|| 7).expect("fresh call state"), 7);
}

#[test]
fn inner_panic_propagates_unchanged() {
    let executor = BoundedExecutor::new(Duration::from_secs(5));
    let caught = panic::catch_unwind(AssertUnwindSafe(|| {
        let _ = executor.run(|| -> i32 { panic!("storage backend exploded") });
    }))
    .expect_err("panic must cross run unchanged");
    let message = caught
        .downcast_ref::<&str>()
        .copied()
        .expect("panic payload preserved");
    assert_eq!(message, "storage backend exploded");
}

#[test]
fn token_is_never_tripped_when_the_call_completes() {
    let executor = BoundedExecutor::new(Duration::from_secs(5));
    let cancelled = executor
        .run_cancellable(|token| {
            // Completed well inside the budget; no cancellation issued.
            token.is_cancelled()
        })
        .expect("within budget");
    assert!(!cancelled);
}

#[test]
fn abandoned_worker_observes_cancellation() {
    let observed = Arc::new(AtomicBool::new(false));
    let observed_by_worker = Arc::clone(&observed);
    let (done_tx, done_rx) = mpsc::channel();

    let executor = BoundedExecutor::new(Duration::from_millis(50));
    let result = executor.run_cancellable(move |token| {
        while !token.is_cancelled() {
            thread::sleep(Duration::from_millis(10));
        }
        observed_by_worker.store(true, Ordering::Release);
        done_tx.send(()).ok();
    });

    assert!(matches!(result, Err(RunError::Timeout { .. })));
    // The worker keeps running past the timeout until it polls the token.
    done_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("worker must see the tripped token and exit");
    assert!(observed.load(Ordering::Acquire));
}

#[test]
fn one_shot_convenience_matches_construct_then_run() {
    let value =
        BoundedExecutor::run_with_timeout(Duration::from_millis(500), || 21 * 2).expect("fast");
    assert_eq!(value, 42);
    assert!(
        BoundedExecutor::run_with_timeout(Duration::from_millis(50), || {
            thread::sleep(Duration::from_millis(200));
        })
        .is_err()
    );
}

#[test]
fn timeout_wraps_into_an_outcome_failure() {
    let executor = BoundedExecutor::new(Duration::from_millis(50));
    let outcome = match executor.run(|| {
        thread::sleep(Duration::from_millis(200));
        42
    }) {
        Ok(n) => Outcome::success(n),
        Err(err) => Outcome::failure(err.to_string()),
    };
    assert!(!outcome.is_success());
    assert!(outcome.error().contains("50"));
}

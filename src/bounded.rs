//! Bounded-time execution for blocking calls.
//!
//! [`BoundedExecutor`] runs a closure on a worker thread and waits for it with
//! a wall-clock budget. If the budget elapses first, the caller gets
//! [`RunError::Timeout`] immediately and the worker is *abandoned*, not
//! killed: it keeps running in the background unless it cooperatively polls
//! the [`CancelToken`] handed to it by [`BoundedExecutor::run_cancellable`].

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, trace};

/// Failure modes of a bounded call.
///
/// A panic inside the wrapped closure is not represented here: it is resumed
/// on the calling thread unchanged, never reinterpreted as a timeout.
#[derive(Debug, Error)]
pub enum RunError {
    /// The budget elapsed before the closure produced a value.
    #[error("bounded call did not complete within its budget of {budget:?}")]
    Timeout {
        /// The budget the executor was configured with.
        budget: Duration,
    },
    /// The worker thread could not be spawned; detected before any timing
    /// begins.
    #[error("failed to spawn worker thread")]
    Spawn(#[from] io::Error),
}

/// One-shot cooperative cancellation signal for a single bounded call.
///
/// The executor trips the token when the budget elapses. Long-running work
/// passed to [`BoundedExecutor::run_cancellable`] can poll
/// [`CancelToken::is_cancelled`] at convenient points and bail early instead
/// of running to completion unobserved.
#[derive(Debug, Clone)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether the call this token belongs to has timed out.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

/// Completion slot shared between the caller and its worker, scoped to one
/// call. `None` while the worker is still running.
struct CallState<R> {
    slot: Option<thread::Result<R>>,
}

struct Shared<R> {
    state: Mutex<CallState<R>>,
    completed: Condvar,
}

impl<R> Shared<R> {
    fn lock(&self) -> MutexGuard<'_, CallState<R>> {
        // The worker stores its result outside any unwinding scope, so the
        // lock cannot be poisoned in practice; recover rather than unwrap.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Runs closures with a wall-clock time budget.
///
/// The budget is fixed at construction; the executor holds no other state and
/// can be reused across calls and shared freely. Each call gets its own
/// completion slot, condition variable, and cancel token.
///
/// ```
/// use std::time::Duration;
/// use timebox::BoundedExecutor;
///
/// let executor = BoundedExecutor::new(Duration::from_millis(500));
/// let greeting = executor.run(|| "ok")?;
/// assert_eq!(greeting, "ok");
/// # Ok::<(), timebox::RunError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedExecutor {
    budget: Duration,
}

impl BoundedExecutor {
    /// Create an executor that waits at most `budget` per call.
    #[must_use]
    pub fn new(budget: Duration) -> Self {
        Self { budget }
    }

    /// The configured wall-clock budget.
    #[must_use]
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Run `f` on a worker thread, waiting at most the configured budget.
    ///
    /// Returns the closure's value if it completes in time. If `f` panics,
    /// the panic is resumed on the calling thread unchanged. On timeout the
    /// worker is abandoned — the closure may still be running when this
    /// returns, so side-effecting work must tolerate that (idempotency is the
    /// caller's responsibility). Use [`Self::run_cancellable`] when the work
    /// can observe cancellation and stop itself.
    pub fn run<F, R>(&self, f: F) -> Result<R, RunError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        self.run_cancellable(|_token| f())
    }

    /// Like [`Self::run`], but hands `f` a [`CancelToken`] that is tripped
    /// when the budget elapses, so the work can bail early instead of running
    /// to completion in the background.
    pub fn run_cancellable<F, R>(&self, f: F) -> Result<R, RunError>
    where
        F: FnOnce(CancelToken) -> R + Send + 'static,
        R: Send + 'static,
    {
        let shared = Arc::new(Shared {
            state: Mutex::new(CallState { slot: None }),
            completed: Condvar::new(),
        });
        let token = CancelToken::new();
        let started = Instant::now();

        let worker_shared = Arc::clone(&shared);
        let worker_token = token.clone();
        thread::Builder::new()
            .name("timebox-worker".to_string())
            .spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(|| f(worker_token)));
                // Publish on every exit path, value or panic, so the waiter
                // is always released.
                worker_shared.lock().slot = Some(result);
                worker_shared.completed.notify_one();
            })?;

        let guard = shared.lock();
        // wait_timeout_while re-checks the slot under the lock, so a worker
        // that finishes right at the deadline is observed as completed, never
        // cancelled: publishing happens-before either outcome.
        let (mut guard, _wait) = shared
            .completed
            .wait_timeout_while(guard, self.budget, |state| state.slot.is_none())
            .unwrap_or_else(PoisonError::into_inner);

        match guard.slot.take() {
            Some(result) => {
                drop(guard);
                match result {
                    Ok(value) => {
                        trace!(elapsed = ?started.elapsed(), "bounded call completed within budget");
                        Ok(value)
                    }
                    Err(payload) => panic::resume_unwind(payload),
                }
            }
            None => {
                // Cancellation must not be issued while holding the lock; the
                // worker's publish step takes it too.
                drop(guard);
                token.cancel();
                debug!(budget = ?self.budget, "bounded call timed out; worker abandoned");
                Err(RunError::Timeout {
                    budget: self.budget,
                })
            }
        }
    }

    /// Construct-then-run convenience for one-off calls.
    pub fn run_with_timeout<F, R>(budget: Duration, f: F) -> Result<R, RunError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        Self::new(budget).run(f)
    }
}

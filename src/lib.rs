//! Bounded-time execution and outcome values for infrastructure code.
//!
//! Two independent primitives used by storage/service layers to make blocking
//! or unreliable operations safe and inspectable:
//!
//! - [`BoundedExecutor`] runs a synchronous closure with a wall-clock budget
//!   and returns [`RunError::Timeout`] instead of letting the caller block
//!   indefinitely. The wrapped work is abandoned on timeout, not killed;
//!   [`CancelToken`] gives it a cooperative way to stop.
//! - [`Outcome`] carries success-with-payload or failure-with-description as
//!   a plain value, for call paths that branch on failure instead of
//!   propagating it.
//!
//! The two compose by convention only: wrapping a timeout into an `Outcome`
//! failure is the caller's decision.
//!
//! ```
//! use std::time::Duration;
//! use timebox::{BoundedExecutor, Outcome};
//!
//! let executor = BoundedExecutor::new(Duration::from_millis(50));
//! let outcome = match executor.run(|| {
//!     std::thread::sleep(Duration::from_millis(200));
//!     42
//! }) {
//!     Ok(n) => Outcome::success(n),
//!     Err(err) => Outcome::failure(err.to_string()),
//! };
//! assert!(!outcome.is_success());
//! assert!(outcome.error().contains("50"));
//! ```

mod bounded;
mod outcome;

pub use bounded::{BoundedExecutor, CancelToken, RunError};
pub use outcome::Outcome;

//! `Outcome<T>`: success-or-failure as a value instead of a raised error.
//!
//! Expected failures travel up the stack as data; call sites branch on
//! [`Outcome::is_success`] rather than catching anything. Reading the wrong
//! field is a contract violation and panics.

use std::fmt;

/// Immutable result of an operation that can fail with a description.
///
/// Exactly one of the payload or the error text is present. Construct with
/// [`Outcome::success`] or [`Outcome::failure`]; equality is structural.
///
/// `Outcome` does not implement the `?` machinery on purpose: it is for call
/// paths that want failure as plain data. Convert with [`Outcome::as_result`]
/// at the boundary where `Result`-style propagation resumes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Outcome<T>(Repr<T>);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Repr<T> {
    Success(T),
    Failure(String),
}

impl<T> Outcome<T> {
    /// Wrap a successful payload.
    #[must_use]
    pub fn success(value: T) -> Self {
        Self(Repr::Success(value))
    }

    /// Wrap an error description.
    ///
    /// # Panics
    ///
    /// Panics if `error` is empty; a failure with no description is a bug at
    /// the construction site, not a representable state.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        let error = error.into();
        assert!(
            !error.is_empty(),
            "Outcome::failure requires a non-empty error description"
        );
        Self(Repr::Failure(error))
    }

    /// Whether this outcome holds a payload.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.0, Repr::Success(_))
    }

    /// The payload of a successful outcome.
    ///
    /// # Panics
    ///
    /// Panics on a failed outcome, embedding the stored error text.
    #[must_use]
    pub fn value(&self) -> &T {
        match &self.0 {
            Repr::Success(value) => value,
            Repr::Failure(error) => {
                panic!("Outcome::value read on a failure: '{error}'")
            }
        }
    }

    /// The error description of a failed outcome.
    ///
    /// # Panics
    ///
    /// Panics on a successful outcome.
    #[must_use]
    pub fn error(&self) -> &str {
        match &self.0 {
            Repr::Success(_) => panic!("Outcome::error read on a success"),
            Repr::Failure(error) => error,
        }
    }

    /// Consume the outcome, returning the payload.
    ///
    /// # Panics
    ///
    /// Panics on a failed outcome, embedding the stored error text.
    #[must_use]
    pub fn into_value(self) -> T {
        match self.0 {
            Repr::Success(value) => value,
            Repr::Failure(error) => {
                panic!("Outcome::into_value read on a failure: '{error}'")
            }
        }
    }

    /// The payload if successful, discarding the error otherwise.
    #[must_use]
    pub fn ok(self) -> Option<T> {
        match self.0 {
            Repr::Success(value) => Some(value),
            Repr::Failure(_) => None,
        }
    }

    /// Borrowing view as a `Result`, for call paths that resume `?`-style
    /// propagation.
    #[must_use]
    pub fn as_result(&self) -> Result<&T, &str> {
        match &self.0 {
            Repr::Success(value) => Ok(value),
            Repr::Failure(error) => Err(error),
        }
    }

    /// Map the payload of a success, leaving a failure untouched.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self.0 {
            Repr::Success(value) => Outcome(Repr::Success(f(value))),
            Repr::Failure(error) => Outcome(Repr::Failure(error)),
        }
    }
}

impl<T> From<T> for Outcome<T> {
    /// A bare value converts to a success.
    fn from(value: T) -> Self {
        Self::success(value)
    }
}

impl<T: fmt::Display> fmt::Display for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Success(value) => write!(f, "<Value: '{value}'>"),
            Repr::Failure(error) => write!(f, "<Error: '{error}'>"),
        }
    }
}

//! Three-state result wrapper for single-shot calls.

use crate::error::ClassifiedError;

/// Result of a single-shot remote call: loading, success, or a classified
/// failure. Replaces exception-based control flow; consumers match
/// exhaustively.
#[derive(Debug, Clone)]
pub enum DataState<T> {
    /// The call is in flight.
    Loading,
    /// The call succeeded.
    Success(T),
    /// The call failed; the error is user-displayable.
    Error(ClassifiedError),
}

impl<T> DataState<T> {
    /// Returns true if the call is still in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns the success value, if any.
    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the classified error, if any.
    pub fn error(&self) -> Option<&ClassifiedError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Maps the success value, leaving the other states untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> DataState<U> {
        match self {
            Self::Loading => DataState::Loading,
            Self::Success(value) => DataState::Success(f(value)),
            Self::Error(err) => DataState::Error(err),
        }
    }
}

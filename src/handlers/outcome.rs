//! Return values accepted from handler functions.

use std::fmt;

use crate::error::HandlerError;

/// What a handler may return.
///
/// - `()`: the handler cannot fail (other than by panicking).
/// - `Result<(), E>` with `E: Display`: an `Err` becomes [`HandlerError::Failed`].
///
/// ```rust
/// use event_aggregator::HandlerOutcome;
///
/// assert!(().into_result().is_ok());
/// assert!(Err::<(), _>("disk full").into_result().is_err());
/// ```
pub trait HandlerOutcome {
    /// Converts the handler's return value into the bus's result type.
    fn into_result(self) -> Result<(), HandlerError>;
}

impl HandlerOutcome for () {
    #[inline]
    fn into_result(self) -> Result<(), HandlerError> {
        Ok(())
    }
}

impl<E: fmt::Display> HandlerOutcome for Result<(), E> {
    #[inline]
    fn into_result(self) -> Result<(), HandlerError> {
        self.map_err(|e| HandlerError::Failed {
            reason: e.to_string(),
        })
    }
}

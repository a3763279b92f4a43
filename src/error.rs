//! Error types used by the event bus and its handlers.
//!
//! This module defines the error enums surfaced by the crate:
//!
//! - [`RegistrationError`]: a discovered handler has an invalid signature.
//! - [`HandlerError`]: a handler failed while processing an event (isolated, never returned by dispatch).
//! - [`WaitError`]: waiting on a [`Completion`](crate::Completion) hit its deadline.
//! - [`BuildError`]: the bus could not be assembled.
//!
//! Every type provides an `as_label` helper returning a short stable label for logs/metrics.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced while registering handlers.
///
/// Registration is all-or-nothing per call: when any candidate fails validation,
/// the error is returned and **no** entry from that call is added.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// A handler must accept exactly one event argument.
    #[error("handler {handler} must accept exactly one event argument, found {found}")]
    Arity {
        /// Fully qualified handler name (`Owner::method`).
        handler: String,
        /// Number of event arguments the handler declares.
        found: usize,
    },
}

impl RegistrationError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use event_aggregator::RegistrationError;
    ///
    /// let err = RegistrationError::Arity { handler: "Greeter::hello".into(), found: 2 };
    /// assert_eq!(err.as_label(), "registration_arity");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistrationError::Arity { .. } => "registration_arity",
        }
    }

    /// Name of the offending handler.
    pub fn handler(&self) -> &str {
        match self {
            RegistrationError::Arity { handler, .. } => handler,
        }
    }
}

/// # Errors raised inside a handler while it processes an event.
///
/// These never reach the dispatching caller. They are logged and published on the
/// diagnostics channel as a [`HandlerFault`](crate::HandlerFault).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// The handler returned an error.
    #[error("handler failed: {reason}")]
    Failed {
        /// Rendered error returned by the handler.
        reason: String,
    },

    /// The handler panicked.
    #[error("handler panicked: {info}")]
    Panicked {
        /// Panic payload, if it was a string.
        info: String,
    },
}

impl HandlerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use event_aggregator::HandlerError;
    ///
    /// let err = HandlerError::Panicked { info: "boom".into() };
    /// assert_eq!(err.as_label(), "handler_panicked");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Failed { .. } => "handler_failed",
            HandlerError::Panicked { .. } => "handler_panicked",
        }
    }

    /// Builds a [`HandlerError::Panicked`] from a `catch_unwind` payload.
    pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let info = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unknown panic".to_string()
        };
        HandlerError::Panicked { info }
    }
}

/// # Errors produced while waiting on a completion handle.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WaitError {
    /// The deadline elapsed before every tracked handler finished.
    ///
    /// Outstanding handlers keep running; only the wait is abandoned.
    #[error("timed out after {timeout:?} with {pending} handler(s) still running")]
    Timeout {
        /// The deadline that elapsed.
        timeout: Duration,
        /// Handlers still running when the deadline elapsed.
        pending: usize,
    },
}

impl WaitError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            WaitError::Timeout { .. } => "wait_timeout",
        }
    }
}

/// # Errors produced while building an [`EventBus`](crate::EventBus).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BuildError {
    /// No worker pool was supplied and the builder is not running inside a Tokio runtime.
    #[error("no worker pool configured and no tokio runtime is current")]
    NoWorkerPool,
}

impl BuildError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            BuildError::NoWorkerPool => "build_no_worker_pool",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_payload_str() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("static message");
        assert_eq!(
            HandlerError::from_panic(payload.as_ref()),
            HandlerError::Panicked {
                info: "static message".into()
            }
        );
    }

    #[test]
    fn test_panic_payload_string() {
        let payload: Box<dyn std::any::Any + Send> = Box::new(format!("code {}", 7));
        assert_eq!(
            HandlerError::from_panic(payload.as_ref()),
            HandlerError::Panicked {
                info: "code 7".into()
            }
        );
    }

    #[test]
    fn test_panic_payload_unknown() {
        let payload: Box<dyn std::any::Any + Send> = Box::new(42_u8);
        assert_eq!(
            HandlerError::from_panic(payload.as_ref()),
            HandlerError::Panicked {
                info: "unknown panic".into()
            }
        );
    }

    #[test]
    fn test_display_messages() {
        let err = RegistrationError::Arity {
            handler: "Greeter::pair".into(),
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "handler Greeter::pair must accept exactly one event argument, found 2"
        );
        assert_eq!(err.handler(), "Greeter::pair");

        let err = WaitError::Timeout {
            timeout: Duration::from_millis(50),
            pending: 3,
        };
        assert_eq!(err.as_label(), "wait_timeout");
        assert!(err.to_string().contains("3 handler(s)"));
    }
}

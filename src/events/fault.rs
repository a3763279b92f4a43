//! # Handler fault records.
//!
//! A [`HandlerFault`] describes one isolated handler failure: which handler,
//! which event, and what went wrong. Faults are published on the
//! [`Diagnostics`](super::Diagnostics) channel and never returned to the producer.
//!
//! ## Ordering
//! Each fault carries a process-wide monotonically increasing `seq`. Faults from
//! concurrent dispatch may be delivered out of order; sort by `seq` if needed.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

use crate::error::HandlerError;

/// Global sequence counter for fault ordering.
static FAULT_SEQ: AtomicU64 = AtomicU64::new(0);

/// One isolated handler failure.
#[derive(Clone, Debug)]
pub struct HandlerFault {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Name of the handler that failed.
    pub handler: Arc<str>,
    /// Concrete type name of the event being processed.
    pub event_type: &'static str,
    /// `Debug` rendering of the event.
    pub event: Arc<str>,
    /// What went wrong.
    pub error: HandlerError,
}

impl HandlerFault {
    /// Creates a fault record with current timestamp and next sequence number.
    pub fn new(
        handler: impl Into<Arc<str>>,
        event_type: &'static str,
        event: impl Into<Arc<str>>,
        error: HandlerError,
    ) -> Self {
        Self {
            seq: FAULT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            handler: handler.into(),
            event_type,
            event: event.into(),
            error,
        }
    }

    /// True if the handler panicked (as opposed to returning an error).
    #[inline]
    pub fn is_panic(&self) -> bool {
        matches!(self.error, HandlerError::Panicked { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_increases() {
        let a = HandlerFault::new(
            "A::a",
            "Ev",
            "Ev",
            HandlerError::Failed {
                reason: "x".into(),
            },
        );
        let b = HandlerFault::new("B::b", "Ev", "Ev", HandlerError::Panicked { info: "y".into() });
        assert!(b.seq > a.seq);
        assert!(!a.is_panic());
        assert!(b.is_panic());
        assert_eq!(&*a.handler, "A::a");
    }
}

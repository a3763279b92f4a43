//! # Diagnostics channel for isolated handler failures.
//!
//! [`Diagnostics`] is a thin wrapper around [`tokio::sync::broadcast`] carrying
//! [`HandlerFault`] records from the dispatcher to any interested observer
//! (tests, health checks, metrics exporters).
//!
//! ## Architecture
//! ```text
//! Publishers (many):                   Receivers (any number):
//!   blocking dispatch (caller) ──┐
//!   pool job 1               ────┼──► Diagnostics ──► faults() receiver 1
//!   pool job N               ────┘   (broadcast)  ──► faults() receiver N
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks.
//! - **Bounded capacity**: one ring buffer shared by all receivers.
//! - **Lag handling**: slow receivers observe `RecvError::Lagged(n)` and skip `n` faults.
//! - **No persistence**: faults are dropped when there are no receivers.

use tokio::sync::broadcast;

use super::fault::HandlerFault;

/// Broadcast channel for handler faults.
///
/// ### Properties
/// - **Non-blocking**: `publish()` returns immediately.
/// - **Fire-and-forget**: no delivery or durability guarantees.
/// - **Cloneable**: cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Diagnostics {
    tx: broadcast::Sender<HandlerFault>,
}

impl Diagnostics {
    /// Creates a new channel with the given capacity (clamped to a minimum of 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<HandlerFault>(capacity.max(1));
        Self { tx }
    }

    /// Publishes a fault to all active receivers.
    ///
    /// If there are no receivers, the fault is dropped.
    pub fn publish(&self, fault: HandlerFault) {
        let _ = self.tx.send(fault);
    }

    /// Creates a receiver that observes faults published **after** this call.
    pub fn subscribe(&self) -> broadcast::Receiver<HandlerFault> {
        self.tx.subscribe()
    }

    /// Number of live receivers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;

    fn fault(name: &str) -> HandlerFault {
        HandlerFault::new(
            name,
            "Ev",
            "Ev",
            HandlerError::Failed {
                reason: "boom".into(),
            },
        )
    }

    #[test]
    fn test_publish_without_receivers_is_noop() {
        let diag = Diagnostics::new(4);
        assert_eq!(diag.receiver_count(), 0);
        diag.publish(fault("a"));
    }

    #[test]
    fn test_receiver_sees_later_faults_only() {
        let diag = Diagnostics::new(4);
        diag.publish(fault("before"));

        let mut rx = diag.subscribe();
        diag.publish(fault("after"));

        let got = rx.try_recv().expect("fault delivered");
        assert_eq!(&*got.handler, "after");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let diag = Diagnostics::new(0);
        let mut rx = diag.subscribe();
        diag.publish(fault("only"));
        assert_eq!(&*rx.try_recv().expect("fault delivered").handler, "only");
    }
}

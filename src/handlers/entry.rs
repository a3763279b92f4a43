//! # Handler entries: a predicate plus an action.
//!
//! A [`HandlerEntry`] is what the registry stores: the event type it is interested
//! in, the action to run, and (for bound handlers) a shared reference to its receiver.
//!
//! ## Receiver ownership
//! Entries created from an instance hold an `Arc` of that instance for as long as
//! the entry exists, which is the lifetime of the registry. Dropping every other
//! reference to the listener does **not** invalidate its handlers.
//!
//! ## Failure isolation
//! [`HandlerEntry::invoke`] never unwinds: an `Err` returned by the handler and a
//! panic raised inside it are both turned into a [`HandlerError`].

use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::error::HandlerError;
use crate::events::{Event, EventType};
use crate::handlers::HandlerOutcome;

type Action = dyn Fn(&dyn Event) -> Result<(), HandlerError> + Send + Sync;

/// Which events an entry accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interest {
    /// Events of this type or any of its subtypes.
    Type(EventType),
    /// Every event.
    Any,
}

impl Interest {
    /// True if `event` falls within this interest.
    #[inline]
    pub fn matches(&self, event: &dyn Event) -> bool {
        match self {
            Interest::Type(ty) => ty.matches(event),
            Interest::Any => true,
        }
    }
}

/// Immutable registry entry.
pub struct HandlerEntry {
    name: Arc<str>,
    interest: Interest,
    action: Box<Action>,
    receiver: Option<Arc<dyn Any + Send + Sync>>,
}

impl HandlerEntry {
    /// Entry for a receiver-free handler of events of type `E` (and subtypes).
    pub fn new<E, F, O>(name: impl Into<Arc<str>>, f: F) -> Self
    where
        E: Event,
        F: Fn(&E) -> O + Send + Sync + 'static,
        O: HandlerOutcome,
    {
        Self {
            name: name.into(),
            interest: Interest::Type(EventType::of::<E>()),
            action: Box::new(move |ev: &dyn Event| match ev.view::<E>() {
                Some(e) => f(e).into_result(),
                None => Ok(()),
            }),
            receiver: None,
        }
    }

    /// Entry for a handler bound to `receiver`.
    ///
    /// The entry keeps `receiver` alive for its whole lifetime.
    pub fn bound<L, E, F, O>(name: impl Into<Arc<str>>, receiver: Arc<L>, f: F) -> Self
    where
        L: Send + Sync + 'static,
        E: Event,
        F: Fn(&L, &E) -> O + Send + Sync + 'static,
        O: HandlerOutcome,
    {
        let target = Arc::clone(&receiver);
        Self {
            name: name.into(),
            interest: Interest::Type(EventType::of::<E>()),
            action: Box::new(move |ev: &dyn Event| match ev.view::<E>() {
                Some(e) => f(&target, e).into_result(),
                None => Ok(()),
            }),
            receiver: Some(receiver as Arc<dyn Any + Send + Sync>),
        }
    }

    /// Entry receiving every event.
    pub fn any<F, O>(name: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn(&dyn Event) -> O + Send + Sync + 'static,
        O: HandlerOutcome,
    {
        Self {
            name: name.into(),
            interest: Interest::Any,
            action: Box::new(move |ev: &dyn Event| f(ev).into_result()),
            receiver: None,
        }
    }

    /// Diagnostic name (`Owner::method` or the callback's type name).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the diagnostic name.
    #[inline]
    pub(crate) fn name_arc(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    /// The events this entry accepts.
    #[inline]
    pub fn interest(&self) -> Interest {
        self.interest
    }

    /// True if the entry holds a receiver.
    #[inline]
    pub fn is_bound(&self) -> bool {
        self.receiver.is_some()
    }

    /// The receiver kept alive by this entry, if any.
    #[inline]
    pub fn receiver(&self) -> Option<&Arc<dyn Any + Send + Sync>> {
        self.receiver.as_ref()
    }

    /// True if this entry should be invoked for `event`.
    #[inline]
    pub fn accepts(&self, event: &dyn Event) -> bool {
        self.interest.matches(event)
    }

    /// Runs the action, converting both `Err` results and panics into [`HandlerError`].
    ///
    /// **Warning**: `AssertUnwindSafe` is used, so a handler that panics while holding
    /// a lock on shared state may leave that state poisoned or inconsistent.
    pub fn invoke(&self, event: &dyn Event) -> Result<(), HandlerError> {
        match catch_unwind(AssertUnwindSafe(|| (self.action)(event))) {
            Ok(result) => result,
            Err(payload) => Err(HandlerError::from_panic(payload.as_ref())),
        }
    }
}

impl fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("name", &self.name)
            .field("interest", &self.interest)
            .field("bound", &self.is_bound())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Ping(u32);
    impl Event for Ping {}

    #[derive(Debug)]
    struct LoudPing {
        ping: Ping,
    }
    impl Event for LoudPing {
        fn parent(&self) -> Option<&dyn Event> {
            Some(&self.ping)
        }
    }

    #[derive(Debug)]
    struct Pong;
    impl Event for Pong {}

    #[test]
    fn test_accepts_type_and_subtype_only() {
        let entry = HandlerEntry::new("ping", |_: &Ping| {});
        assert!(entry.accepts(&Ping(1)));
        assert!(entry.accepts(&LoudPing { ping: Ping(2) }));
        assert!(!entry.accepts(&Pong));
        assert!(!entry.is_bound());
    }

    #[test]
    fn test_subtype_receives_parent_view() {
        let seen = Arc::new(AtomicUsize::new(0));
        let s = Arc::clone(&seen);
        let entry = HandlerEntry::new("ping", move |p: &Ping| {
            s.store(p.0 as usize, Ordering::SeqCst);
        });

        entry.invoke(&LoudPing { ping: Ping(7) }).expect("handler ok");
        assert_eq!(seen.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_any_accepts_everything() {
        let entry = HandlerEntry::any("all", |_: &dyn Event| {});
        assert!(entry.accepts(&Ping(0)));
        assert!(entry.accepts(&Pong));
        assert_eq!(entry.interest(), Interest::Any);
    }

    #[test]
    fn test_error_result_is_reported() {
        let entry = HandlerEntry::new("fails", |_: &Ping| Err::<(), _>("nope"));
        assert_eq!(
            entry.invoke(&Ping(0)),
            Err(HandlerError::Failed {
                reason: "nope".into()
            })
        );
    }

    #[test]
    fn test_panic_is_caught() {
        let entry = HandlerEntry::new("panics", |_: &Ping| -> () { panic!("kaboom") });
        assert_eq!(
            entry.invoke(&Ping(0)),
            Err(HandlerError::Panicked {
                info: "kaboom".into()
            })
        );
    }

    #[test]
    fn test_bound_entry_keeps_receiver_alive() {
        struct Counter(AtomicUsize);

        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        let entry = HandlerEntry::bound("Counter::on_ping", Arc::clone(&counter), |c: &Counter, _: &Ping| {
            c.0.fetch_add(1, Ordering::SeqCst);
        });
        let weak = Arc::downgrade(&counter);
        drop(counter);

        assert!(entry.is_bound());
        assert!(entry.receiver().is_some());
        entry.invoke(&Ping(0)).expect("handler ok");
        let alive = weak.upgrade().expect("receiver kept alive by entry");
        assert_eq!(alive.0.load(Ordering::SeqCst), 1);
    }
}

//! # Declarative handler tables.
//!
//! A table is how a [`Listener`](super::Listener) declares its handlers. Each
//! `table.handler("name", function)` line marks one function as an event handler;
//! the marker carries nothing but its presence and a name used in diagnostics.
//!
//! ## Validation
//! A handler must take exactly one event argument (after the receiver, for
//! [`InstanceTable`]). Functions with no event argument, or with two, are still
//! accepted by the table so that the mistake is reported as a
//! [`RegistrationError`] when the listener is registered. Because a table is
//! validated as a whole, one bad handler rejects the entire registration.
//!
//! A parameter type that is not an [`Event`] never compiles.
//!
//! ## Closure parameters
//! Annotate closure parameter types (`|e: &MyEvent| ...`): the argument list is
//! inferred from the function's signature, not from the table.

use std::any::type_name;
use std::sync::Arc;

use crate::error::RegistrationError;
use crate::events::Event;
use crate::handlers::{HandlerEntry, HandlerOutcome};

/// A receiver-free function usable in a [`StaticTable`].
///
/// `Args` is an inference marker describing the parameter list; it is never named
/// by callers.
pub trait StaticHandler<Args>: Send + Sync + 'static {
    /// Validates the signature and builds the registry entry.
    fn into_entry(self, name: String) -> Result<HandlerEntry, RegistrationError>;
}

impl<F, E, O> StaticHandler<(E, O)> for F
where
    F: Fn(&E) -> O + Send + Sync + 'static,
    E: Event,
    O: HandlerOutcome,
{
    fn into_entry(self, name: String) -> Result<HandlerEntry, RegistrationError> {
        Ok(HandlerEntry::new(name, self))
    }
}

impl<F, O> StaticHandler<(O,)> for F
where
    F: Fn() -> O + Send + Sync + 'static,
    O: HandlerOutcome,
{
    fn into_entry(self, name: String) -> Result<HandlerEntry, RegistrationError> {
        Err(RegistrationError::Arity {
            handler: name,
            found: 0,
        })
    }
}

impl<F, A, B, O> StaticHandler<(A, B, O)> for F
where
    F: Fn(&A, &B) -> O + Send + Sync + 'static,
    A: 'static,
    B: 'static,
    O: HandlerOutcome,
{
    fn into_entry(self, name: String) -> Result<HandlerEntry, RegistrationError> {
        Err(RegistrationError::Arity {
            handler: name,
            found: 2,
        })
    }
}

/// A function taking `&L` as receiver, usable in an [`InstanceTable<L>`].
///
/// `Args` is an inference marker describing the parameter list after the receiver.
pub trait InstanceHandler<L, Args>: Send + Sync + 'static {
    /// Validates the signature and builds an entry bound to `receiver`.
    fn into_entry(self, name: String, receiver: &Arc<L>) -> Result<HandlerEntry, RegistrationError>;
}

impl<F, L, E, O> InstanceHandler<L, (E, O)> for F
where
    F: Fn(&L, &E) -> O + Send + Sync + 'static,
    L: Send + Sync + 'static,
    E: Event,
    O: HandlerOutcome,
{
    fn into_entry(self, name: String, receiver: &Arc<L>) -> Result<HandlerEntry, RegistrationError> {
        Ok(HandlerEntry::bound(name, Arc::clone(receiver), self))
    }
}

impl<F, L, O> InstanceHandler<L, (O,)> for F
where
    F: Fn(&L) -> O + Send + Sync + 'static,
    O: HandlerOutcome,
{
    fn into_entry(self, name: String, _receiver: &Arc<L>) -> Result<HandlerEntry, RegistrationError> {
        Err(RegistrationError::Arity {
            handler: name,
            found: 0,
        })
    }
}

impl<F, L, A, B, O> InstanceHandler<L, (A, B, O)> for F
where
    F: Fn(&L, &A, &B) -> O + Send + Sync + 'static,
    A: 'static,
    B: 'static,
    O: HandlerOutcome,
{
    fn into_entry(self, name: String, _receiver: &Arc<L>) -> Result<HandlerEntry, RegistrationError> {
        Err(RegistrationError::Arity {
            handler: name,
            found: 2,
        })
    }
}

/// Candidates collected from one listener, validated together.
#[derive(Debug, Default)]
struct Candidates {
    items: Vec<Result<HandlerEntry, RegistrationError>>,
}

impl Candidates {
    /// All entries, or the first validation error.
    fn finish(self) -> Result<Vec<HandlerEntry>, RegistrationError> {
        self.items.into_iter().collect()
    }
}

/// Receiver-free handlers declared by a listener type.
///
/// ```rust
/// use event_aggregator::{Event, Listener, StaticTable};
///
/// #[derive(Debug)]
/// struct GreetingEvent { who: String }
/// impl Event for GreetingEvent {}
///
/// struct Greeters;
///
/// impl Greeters {
///     fn english(e: &GreetingEvent) { println!("Hello {}", e.who); }
///     fn german(e: &GreetingEvent) { println!("Hallo {}", e.who); }
/// }
///
/// impl Listener for Greeters {
///     fn static_handlers(table: &mut StaticTable) {
///         table
///             .handler("english", Self::english)
///             .handler("german", Self::german);
///     }
/// }
/// ```
#[derive(Debug)]
pub struct StaticTable {
    owner: &'static str,
    candidates: Candidates,
}

impl StaticTable {
    pub(crate) fn new(owner: &'static str) -> Self {
        Self {
            owner,
            candidates: Candidates::default(),
        }
    }

    /// Declares `handler` under `name`.
    ///
    /// The parameter must be a reference to an [`Event`]; anything else is rejected
    /// at compile time:
    ///
    /// ```compile_fail
    /// use event_aggregator::{Listener, StaticTable};
    ///
    /// struct Counter;
    /// impl Counter {
    ///     fn bad(_: &u32) {}
    /// }
    /// impl Listener for Counter {
    ///     fn static_handlers(table: &mut StaticTable) {
    ///         table.handler("bad", Self::bad);
    ///     }
    /// }
    /// ```
    ///
    /// ```compile_fail
    /// use event_aggregator::{Event, Listener, StaticTable};
    ///
    /// #[derive(Debug)]
    /// struct GreetingEvent { who: String }
    /// impl Event for GreetingEvent {}
    ///
    /// struct Greeter;
    /// impl Greeter {
    ///     fn bad(e: GreetingEvent) { println!("Hello {}", e.who); }
    /// }
    /// impl Listener for Greeter {
    ///     fn static_handlers(table: &mut StaticTable) {
    ///         table.handler("bad", Self::bad);
    ///     }
    /// }
    /// ```
    pub fn handler<Args, H>(&mut self, name: &'static str, handler: H) -> &mut Self
    where
        H: StaticHandler<Args>,
    {
        let qualified = format!("{}::{}", self.owner, name);
        self.candidates.items.push(handler.into_entry(qualified));
        self
    }

    /// Number of declared handlers.
    pub fn len(&self) -> usize {
        self.candidates.items.len()
    }

    /// True if nothing has been declared.
    pub fn is_empty(&self) -> bool {
        self.candidates.items.is_empty()
    }

    pub(crate) fn finish(self) -> Result<Vec<HandlerEntry>, RegistrationError> {
        self.candidates.finish()
    }
}

/// Handlers bound to one listener instance.
///
/// Every entry built from this table shares ownership of the instance.
#[derive(Debug)]
pub struct InstanceTable<L> {
    owner: &'static str,
    receiver: Arc<L>,
    candidates: Candidates,
}

impl<L> InstanceTable<L> {
    pub(crate) fn new(owner: &'static str, receiver: Arc<L>) -> Self {
        Self {
            owner,
            receiver,
            candidates: Candidates::default(),
        }
    }

    /// Declares `handler` under `name`.
    ///
    /// After the receiver, the parameter must be a reference to an [`Event`]:
    ///
    /// ```compile_fail
    /// use event_aggregator::{InstanceTable, Listener};
    ///
    /// struct Counter;
    /// impl Counter {
    ///     fn bad(&self, _: &u32) {}
    /// }
    /// impl Listener for Counter {
    ///     fn handlers(table: &mut InstanceTable<Self>) {
    ///         table.handler("bad", Self::bad);
    ///     }
    /// }
    /// ```
    ///
    /// ```compile_fail
    /// use event_aggregator::{Event, InstanceTable, Listener};
    ///
    /// #[derive(Debug)]
    /// struct GreetingEvent { who: String }
    /// impl Event for GreetingEvent {}
    ///
    /// struct Greeter;
    /// impl Greeter {
    ///     fn bad(&self, e: GreetingEvent) { println!("Hello {}", e.who); }
    /// }
    /// impl Listener for Greeter {
    ///     fn handlers(table: &mut InstanceTable<Self>) {
    ///         table.handler("bad", Self::bad);
    ///     }
    /// }
    /// ```
    pub fn handler<Args, H>(&mut self, name: &'static str, handler: H) -> &mut Self
    where
        H: InstanceHandler<L, Args>,
    {
        let qualified = format!("{}::{}", self.owner, name);
        let entry = handler.into_entry(qualified, &self.receiver);
        self.candidates.items.push(entry);
        self
    }

    /// The instance the handlers will be bound to.
    pub fn receiver(&self) -> &L {
        &self.receiver
    }

    /// Number of declared handlers.
    pub fn len(&self) -> usize {
        self.candidates.items.len()
    }

    /// True if nothing has been declared.
    pub fn is_empty(&self) -> bool {
        self.candidates.items.is_empty()
    }

    pub(crate) fn finish(self) -> Result<Vec<HandlerEntry>, RegistrationError> {
        self.candidates.finish()
    }
}

/// Last path segment of `T`'s type name, generics included.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Tick;
    impl Event for Tick {}

    struct Clock;

    impl Clock {
        fn on_tick(_: &Tick) {}
        fn no_args() {}
        fn two_args(_: &Tick, _: &Tick) {}
        fn bound_tick(&self, _: &Tick) {}
        fn bound_none(&self) {}
        fn bound_two(&self, _: &Tick, _: &Tick) {}
        fn fallible(_: &Tick) -> Result<(), String> {
            Ok(())
        }
    }

    #[test]
    fn test_static_valid_handlers() {
        let mut table = StaticTable::new("Clock");
        table
            .handler("on_tick", Clock::on_tick)
            .handler("fallible", Clock::fallible)
            .handler("closure", |_: &Tick| {});
        assert_eq!(table.len(), 3);

        let entries = table.finish().expect("all valid");
        let names: Vec<&str> = entries.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["Clock::on_tick", "Clock::fallible", "Clock::closure"]);
    }

    #[test]
    fn test_static_arity_errors() {
        let mut table = StaticTable::new("Clock");
        table.handler("on_tick", Clock::on_tick).handler("no_args", Clock::no_args);
        assert_eq!(
            table.finish().unwrap_err(),
            RegistrationError::Arity {
                handler: "Clock::no_args".into(),
                found: 0
            }
        );

        let mut table = StaticTable::new("Clock");
        table.handler("two_args", Clock::two_args);
        assert_eq!(
            table.finish().unwrap_err(),
            RegistrationError::Arity {
                handler: "Clock::two_args".into(),
                found: 2
            }
        );
    }

    #[test]
    fn test_instance_table() {
        let clock = Arc::new(Clock);
        let mut table = InstanceTable::new("Clock", Arc::clone(&clock));
        assert!(std::ptr::eq(table.receiver(), &*clock));
        table.handler("bound_tick", Clock::bound_tick);
        let entries = table.finish().expect("valid");
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_bound());

        let mut table = InstanceTable::new("Clock", Arc::new(Clock));
        table
            .handler("bound_tick", Clock::bound_tick)
            .handler("bound_none", Clock::bound_none);
        assert!(matches!(
            table.finish(),
            Err(RegistrationError::Arity { found: 0, .. })
        ));

        let mut table = InstanceTable::new("Clock", Arc::new(Clock));
        table.handler("bound_two", Clock::bound_two);
        assert!(matches!(
            table.finish(),
            Err(RegistrationError::Arity { found: 2, .. })
        ));
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<Clock>(), "Clock");
        assert_eq!(short_type_name::<Vec<u8>>(), "Vec<u8>");
        assert_eq!(short_type_name::<u32>(), "u32");
    }
}

//! # Event values and runtime type matching.
//!
//! An [`Event`] is an immutable value identified solely by its concrete runtime type.
//! Handlers declare interest in a type; the dispatcher matches every event against
//! those declarations.
//!
//! ## Subtyping
//! Rust has no class inheritance, so an event models "is a kind of" by **composition**:
//! it embeds its parent event value and exposes it through [`Event::parent`].
//! Walking the parent chain yields every type the event can be viewed as:
//!
//! ```text
//! FormalGreeting ──parent()──► GreetingEvent ──parent()──► None
//!
//! handler for FormalGreeting  → receives &FormalGreeting
//! handler for GreetingEvent   → receives &GreetingEvent (the embedded value)
//! ```
//!
//! ## Example
//! ```rust
//! use event_aggregator::{Event, EventType};
//!
//! #[derive(Debug)]
//! struct GreetingEvent { who: String }
//! impl Event for GreetingEvent {}
//!
//! #[derive(Debug)]
//! struct FormalGreeting { greeting: GreetingEvent, title: String }
//! impl Event for FormalGreeting {
//!     fn parent(&self) -> Option<&dyn Event> { Some(&self.greeting) }
//! }
//!
//! let ev = FormalGreeting {
//!     greeting: GreetingEvent { who: "Curie".into() },
//!     title: "Dr.".into(),
//! };
//! let ev: &dyn Event = &ev;
//!
//! assert!(ev.is::<FormalGreeting>());
//! assert_eq!(ev.view::<GreetingEvent>().map(|g| g.who.as_str()), Some("Curie"));
//! assert!(EventType::of::<GreetingEvent>().matches(ev));
//! ```

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Object-safe access to `Any` for every `'static` type.
///
/// Implemented automatically; exists so `&dyn Event` can be downcast.
pub trait AsAny: Any {
    /// Returns `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Immutable event payload broadcast to interested handlers.
///
/// Implementors should be plain data with no interior mutability; the same value
/// is observed by every matching handler, possibly from several threads at once.
pub trait Event: AsAny + Send + Sync + fmt::Debug + 'static {
    /// The embedded parent event, if this event is a specialisation of another.
    ///
    /// Handlers declared for the parent type (or any of its ancestors) also
    /// receive this event.
    fn parent(&self) -> Option<&dyn Event> {
        None
    }

    /// Human-readable name of the concrete event type (for logs/diagnostics).
    fn event_name(&self) -> &'static str {
        type_name::<Self>()
    }
}

impl dyn Event {
    /// Views this event as `E`, walking the parent chain.
    ///
    /// Returns the first value in the chain (starting with `self`) whose concrete
    /// type is `E`.
    pub fn view<E: Event>(&self) -> Option<&E> {
        self.lineage().find_map(|ev| ev.as_any().downcast_ref::<E>())
    }

    /// True if this event's concrete type is `E` or a subtype of `E`.
    pub fn is<E: Event>(&self) -> bool {
        self.view::<E>().is_some()
    }

    /// Iterates over `self` followed by each ancestor, nearest first.
    pub fn lineage(&self) -> Lineage<'_> {
        Lineage { next: Some(self) }
    }
}

/// Iterator over an event and its ancestors, returned by `<dyn Event>::lineage`.
#[derive(Debug, Clone)]
pub struct Lineage<'a> {
    next: Option<&'a dyn Event>,
}

impl<'a> Iterator for Lineage<'a> {
    type Item = &'a dyn Event;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}

/// Anything the bus can dispatch: an event by value, or one already shared.
pub trait IntoEvent {
    /// Converts into the shared form handed to handlers.
    fn into_shared(self) -> Arc<dyn Event>;
}

impl<E: Event> IntoEvent for E {
    #[inline]
    fn into_shared(self) -> Arc<dyn Event> {
        Arc::new(self)
    }
}

impl IntoEvent for Arc<dyn Event> {
    #[inline]
    fn into_shared(self) -> Arc<dyn Event> {
        self
    }
}

/// Runtime identifier of an event type.
#[derive(Clone, Copy)]
pub struct EventType {
    id: TypeId,
    name: &'static str,
}

impl EventType {
    /// Descriptor for the event type `E`.
    #[inline]
    pub fn of<E: Event>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: type_name::<E>(),
        }
    }

    /// Underlying [`TypeId`].
    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Type name as reported by [`std::any::type_name`].
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// True if `event` is of this type or one of its subtypes.
    pub fn matches(&self, event: &dyn Event) -> bool {
        event.lineage().any(|ev| ev.as_any().type_id() == self.id)
    }
}

impl PartialEq for EventType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventType {}

impl fmt::Debug for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Greeting {
        who: &'static str,
    }
    impl Event for Greeting {}

    #[derive(Debug)]
    struct Formal {
        base: Greeting,
    }
    impl Event for Formal {
        fn parent(&self) -> Option<&dyn Event> {
            Some(&self.base)
        }
    }

    #[derive(Debug)]
    struct Farewell;
    impl Event for Farewell {}

    #[test]
    fn test_view_same_type() {
        let ev = Greeting { who: "World" };
        let ev: &dyn Event = &ev;
        assert_eq!(ev.view::<Greeting>().map(|g| g.who), Some("World"));
        assert!(ev.view::<Formal>().is_none());
    }

    #[test]
    fn test_view_through_parent() {
        let ev = Formal {
            base: Greeting { who: "Ada" },
        };
        let ev: &dyn Event = &ev;
        assert!(ev.is::<Formal>());
        assert!(ev.is::<Greeting>());
        assert!(!ev.is::<Farewell>());
        assert_eq!(ev.view::<Greeting>().map(|g| g.who), Some("Ada"));
    }

    #[test]
    fn test_lineage_order() {
        let ev = Formal {
            base: Greeting { who: "x" },
        };
        let ev: &dyn Event = &ev;
        let names: Vec<&str> = ev.lineage().map(|e| e.event_name()).collect();
        assert_eq!(names.len(), 2);
        assert!(names[0].ends_with("Formal"));
        assert!(names[1].ends_with("Greeting"));
    }

    #[test]
    fn test_event_type_matching() {
        let formal = Formal {
            base: Greeting { who: "x" },
        };
        let plain = Greeting { who: "y" };

        let greeting = EventType::of::<Greeting>();
        let formal_ty = EventType::of::<Formal>();

        assert!(greeting.matches(&formal));
        assert!(greeting.matches(&plain));
        assert!(formal_ty.matches(&formal));
        assert!(!formal_ty.matches(&plain));
        assert!(!EventType::of::<Farewell>().matches(&plain));
        assert_ne!(greeting, formal_ty);
        assert!(format!("{greeting:?}").ends_with("Greeting"));
    }
}

//! # Core listener trait
//!
//! `Listener` is how a type advertises its event handlers to the bus. It replaces
//! runtime method scanning with explicit self-registration: the type fills a table
//! with the functions it wants registered.
//!
//! ## Contract
//! - [`Listener::static_handlers`] lists receiver-free functions; they are picked up by
//!   [`EventBus::register_type`](crate::EventBus::register_type).
//! - [`Listener::handlers`] lists methods taking `&self`; they are picked up by
//!   [`EventBus::register_instance`](crate::EventBus::register_instance), and each
//!   resulting entry shares ownership of the instance.
//! - Functions not listed in a table are never registered.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use event_aggregator::{Event, InstanceTable, Listener};
//!
//! #[derive(Debug)]
//! struct GreetingEvent { who: String }
//! impl Event for GreetingEvent {}
//!
//! #[derive(Default)]
//! struct GoodbyeGreeter { said: AtomicUsize }
//!
//! impl GoodbyeGreeter {
//!     fn say_goodbye(&self, e: &GreetingEvent) {
//!         self.said.fetch_add(1, Ordering::Relaxed);
//!         println!("Goodbye {}", e.who);
//!     }
//! }
//!
//! impl Listener for GoodbyeGreeter {
//!     fn handlers(table: &mut InstanceTable<Self>) {
//!         table.handler("say_goodbye", Self::say_goodbye);
//!     }
//! }
//! ```

use crate::handlers::table::{short_type_name, InstanceTable, StaticTable};

/// Contract for types that declare event handlers.
///
/// Both tables default to empty, so a type implements only the side it needs.
pub trait Listener: Send + Sync + 'static {
    /// Declares receiver-free handlers.
    fn static_handlers(_table: &mut StaticTable)
    where
        Self: Sized,
    {
    }

    /// Declares handlers bound to an instance of `Self`.
    fn handlers(_table: &mut InstanceTable<Self>)
    where
        Self: Sized,
    {
    }

    /// Human-readable name (for handler names and logs).
    fn name() -> &'static str
    where
        Self: Sized,
    {
        short_type_name::<Self>()
    }
}

//! # Handlers: entries, listeners and discovery tables.
//!
//! This module provides everything that ends up in (or feeds) the registry:
//!
//! - [`HandlerEntry`]: an immutable predicate/action pair stored by the registry
//! - [`Listener`]: the trait a type implements to advertise its handlers
//! - [`StaticTable`], [`InstanceTable`]: the declarative tables a listener fills
//! - [`HandlerOutcome`]: what a handler may return
//!
//! ## Architecture
//! ```text
//! register_type::<L>()          register_instance(Arc<L>)       register_callback::<E>(f)
//!        │                              │                               │
//!        ▼                              ▼                               │
//!  L::static_handlers(&mut t)    L::handlers(&mut t)                    │
//!        │                              │                               │
//!        └──── validate all ────────────┘                               │
//!                    │ (any RegistrationError → nothing committed)      │
//!                    ▼                                                  ▼
//!             Vec<HandlerEntry> ─────────► Registry::insert_batch ◄─ HandlerEntry
//! ```

mod entry;
mod listener;
mod outcome;
mod table;

pub use entry::{HandlerEntry, Interest};
pub use listener::Listener;
pub use outcome::HandlerOutcome;
pub use table::{InstanceHandler, InstanceTable, StaticHandler, StaticTable};

pub(crate) use table::short_type_name;

//! # event-aggregator
//!
//! **event-aggregator** is an in-process publish/subscribe event bus for Rust.
//!
//! Producers create immutable event values; the bus delivers each one to every
//! registered handler whose declared event type matches the event's runtime type
//! (or one of its parent types). Producers and consumers never reference each other.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  Listener    │   │  Listener    │   │  callback    │
//!     │ (type table) │   │ (Arc<L>)     │   │ (closure)    │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  EventBus                                                         │
//! │  - Registry   (append-only, arc-swap snapshots)                   │
//! │  - Dispatcher (type matching, Blocking | Concurrent)              │
//! │  - Diagnostics (broadcast channel of HandlerFault)                │
//! │  - WorkerPool (host-owned; tokio Handle by default)               │
//! └──────┬──────────────────────────────────────────────┬─────────────┘
//!        │ dispatch(event, mode)                        │ faults()
//!        ▼                                              ▼
//!   matching entries                              HandlerFault stream
//!    ├─ Blocking:   run each on caller thread
//!    └─ Concurrent: one pool job per entry
//!        │
//!        ▼
//!   Completion (wait / wait_timeout / wait_blocking / on_complete / .await)
//! ```
//!
//! ### Dispatch
//! ```text
//! event ──► Registry::matching(event)        (one snapshot, no ordering)
//!   ├─► Blocking:   for entry: invoke ─► Err/panic? ─► warn! + HandlerFault
//!   │               └─► Completion (already resolved)
//!   └─► Concurrent: for entry: pool.execute(job)   (returns immediately)
//!                   └─► Completion (resolves when the last job finishes)
//! ```
//!
//! ## Features
//! | Area              | Description                                                      | Key types / traits                          |
//! |-------------------|------------------------------------------------------------------|---------------------------------------------|
//! | **Events**        | Immutable values matched by runtime type, subtyping by parent.   | [`Event`], [`EventType`], [`IntoEvent`]     |
//! | **Listeners**     | Declare handlers in typed tables instead of runtime scanning.    | [`Listener`], [`StaticTable`], [`InstanceTable`] |
//! | **Dispatch**      | Blocking or concurrent delivery on a host-owned pool.            | [`EventBus`], [`DispatchMode`], [`WorkerPool`] |
//! | **Completion**    | Await, time-bound or chain on the end of a dispatch.             | [`Completion`]                              |
//! | **Diagnostics**   | Isolated handler failures as a broadcast stream.                 | [`HandlerFault`]                            |
//! | **Errors**        | Typed errors for registration, handlers, waits and building.     | [`RegistrationError`], [`HandlerError`], [`WaitError`], [`BuildError`] |
//! | **Configuration** | Centralize bus settings.                                         | [`BusConfig`], [`EventBusBuilder`]          |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use event_aggregator::{
//!     BusConfig, DispatchMode, Event, EventBus, InstanceTable, Listener, StaticTable,
//! };
//!
//! #[derive(Debug)]
//! struct GreetingEvent { who: String }
//! impl Event for GreetingEvent {}
//!
//! struct Greeters;
//! impl Greeters {
//!     fn english(e: &GreetingEvent) { println!("Hello {}", e.who); }
//!     fn german(e: &GreetingEvent) { println!("Hallo {}", e.who); }
//! }
//! impl Listener for Greeters {
//!     fn static_handlers(table: &mut StaticTable) {
//!         table.handler("english", Self::english).handler("german", Self::german);
//!     }
//! }
//!
//! struct GoodbyeGreeter { farewell: &'static str }
//! impl GoodbyeGreeter {
//!     fn say(&self, e: &GreetingEvent) { println!("{} {}", self.farewell, e.who); }
//! }
//! impl Listener for GoodbyeGreeter {
//!     fn handlers(table: &mut InstanceTable<Self>) {
//!         table.handler("say", Self::say);
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bus = EventBus::builder(BusConfig::default()).build()?;
//!     bus.register_type::<Greeters>()?;
//!     bus.register_instance(Arc::new(GoodbyeGreeter { farewell: "Goodbye" }))?;
//!
//!     // Returns after all three handlers ran.
//!     bus.dispatch(GreetingEvent { who: "World".into() }, DispatchMode::Blocking);
//!
//!     // Returns at once; await the handle for the handlers to finish.
//!     bus.dispatch(GreetingEvent { who: "Harrison".into() }, DispatchMode::Concurrent).await;
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod handlers;

// ---- Public re-exports ----

pub use core::{
    BusConfig, Completion, DispatchMode, EventBus, EventBusBuilder, Job, WorkerPool,
};
pub use error::{BuildError, HandlerError, RegistrationError, WaitError};
pub use events::{AsAny, Event, EventType, HandlerFault, IntoEvent, Lineage};
pub use handlers::{
    HandlerEntry, HandlerOutcome, InstanceHandler, InstanceTable, Interest, Listener,
    StaticHandler, StaticTable,
};

//! # EventBus: registration and dispatch facade.
//!
//! The [`EventBus`] owns the handler registry, the dispatcher, the diagnostics
//! channel and the worker pool used by concurrent dispatch.
//!
//! ## Architecture
//! ```text
//! register_type::<L>()        ──► L::static_handlers(StaticTable)  ─┐
//! register_instance(Arc<L>)   ──► L::handlers(InstanceTable<L>)    ─┼─► validate all ─► Registry::insert_batch
//! register_callback / any / entry ──► HandlerEntry                 ─┘
//!
//! dispatch(event, mode)       ──► Dispatcher ──► Registry::matching ──► Blocking | Concurrent(pool)
//!                                     │                                      │
//!                                     └─► failures ─► Diagnostics ─► faults()└─► Completion
//! ```
//!
//! ## Rules
//! - Registration is all-or-nothing per call: one invalid handler adds nothing.
//! - New entries are visible to the next dispatch; a running dispatch keeps its snapshot.
//! - There is no deregistration.
//! - The bus is `Send + Sync`; share it behind an `Arc` to register and dispatch from many threads.
//!
//! ## Example
//! ```rust
//! use event_aggregator::{BusConfig, DispatchMode, Event, EventBus, Listener, StaticTable};
//!
//! #[derive(Debug)]
//! struct GreetingEvent { who: String }
//! impl Event for GreetingEvent {}
//!
//! struct EnglishGreeter;
//! impl EnglishGreeter {
//!     fn greet(e: &GreetingEvent) { println!("Hello {}", e.who); }
//! }
//! impl Listener for EnglishGreeter {
//!     fn static_handlers(table: &mut StaticTable) {
//!         table.handler("greet", Self::greet);
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bus = EventBus::builder(BusConfig::default()).build()?;
//!     assert_eq!(bus.register_type::<EnglishGreeter>()?, 1);
//!
//!     let done = bus.dispatch(GreetingEvent { who: "World".into() }, DispatchMode::Blocking);
//!     assert!(done.is_complete());
//!     Ok(())
//! }
//! ```

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::core::{
    builder::EventBusBuilder,
    completion::Completion,
    config::BusConfig,
    dispatcher::{DispatchMode, Dispatcher},
    pool::WorkerPool,
    registry::Registry,
};
use crate::error::RegistrationError;
use crate::events::{Diagnostics, Event, HandlerFault, IntoEvent};
use crate::handlers::{HandlerEntry, HandlerOutcome, InstanceTable, Listener, StaticTable};

/// In-process publish/subscribe bus keyed on event runtime types.
pub struct EventBus {
    cfg: BusConfig,
    registry: Arc<Registry>,
    dispatcher: Dispatcher,
    diagnostics: Diagnostics,
    pool: Arc<dyn WorkerPool>,
}

impl EventBus {
    /// Returns a builder for a bus with the given configuration.
    pub fn builder(cfg: BusConfig) -> EventBusBuilder {
        EventBusBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: BusConfig, pool: Arc<dyn WorkerPool>) -> Self {
        let registry = Arc::new(Registry::new());
        let diagnostics = Diagnostics::new(cfg.fault_capacity_clamped());
        let dispatcher = Dispatcher::new(
            Arc::from(&*cfg.name),
            Arc::clone(&registry),
            diagnostics.clone(),
        );

        tracing::debug!(bus = %cfg.name, pool = pool.name(), "event bus created");
        Self {
            cfg,
            registry,
            dispatcher,
            diagnostics,
            pool,
        }
    }

    /// Configuration this bus was built with.
    pub fn config(&self) -> &BusConfig {
        &self.cfg
    }

    /// Worker pool used by concurrent dispatch when none is given explicitly.
    pub fn pool(&self) -> &Arc<dyn WorkerPool> {
        &self.pool
    }

    /// Subscribes to isolated handler failures.
    ///
    /// Only faults raised after this call are observed.
    pub fn faults(&self) -> broadcast::Receiver<HandlerFault> {
        self.diagnostics.subscribe()
    }

    /// Registers the receiver-free handlers declared by `L`.
    ///
    /// Returns the number of entries added. If any declared handler has an invalid
    /// signature, nothing is added.
    pub fn register_type<L: Listener>(&self) -> Result<usize, RegistrationError> {
        let mut table = StaticTable::new(L::name());
        L::static_handlers(&mut table);
        self.commit(L::name(), "type", table.finish())
    }

    /// Registers the handlers declared by `L` bound to `listener`.
    ///
    /// Every added entry keeps `listener` alive for the lifetime of the bus.
    pub fn register_instance<L: Listener>(&self, listener: Arc<L>) -> Result<usize, RegistrationError> {
        let mut table = InstanceTable::new(L::name(), listener);
        L::handlers(&mut table);
        self.commit(L::name(), "instance", table.finish())
    }

    /// Registers `f` for events of type `E` and its subtypes.
    pub fn register_callback<E, F, O>(&self, f: F)
    where
        E: Event,
        F: Fn(&E) -> O + Send + Sync + 'static,
        O: HandlerOutcome,
    {
        self.register_entry(HandlerEntry::new(type_name::<F>(), f));
    }

    /// Registers `f` for every event.
    pub fn register_any<F, O>(&self, f: F)
    where
        F: Fn(&dyn Event) -> O + Send + Sync + 'static,
        O: HandlerOutcome,
    {
        self.register_entry(HandlerEntry::any(type_name::<F>(), f));
    }

    /// Registers a prebuilt entry, keeping its name and receiver as given.
    pub fn register_entry(&self, entry: HandlerEntry) {
        tracing::debug!(
            bus = %self.cfg.name,
            handler = entry.name(),
            bound = entry.is_bound(),
            "registered entry"
        );
        self.registry.insert(entry);
    }

    /// Number of registered entries.
    pub fn handler_count(&self) -> usize {
        self.registry.len()
    }

    /// Names of registered entries, sorted.
    pub fn handler_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .registry
            .snapshot()
            .iter()
            .map(|entry| entry.name().to_owned())
            .collect();
        names.sort_unstable();
        names
    }

    /// Delivers `event` to every matching handler using the bus's pool.
    pub fn dispatch(&self, event: impl IntoEvent, mode: DispatchMode) -> Completion {
        self.dispatcher
            .dispatch(event.into_shared(), mode, self.pool.as_ref())
    }

    /// Delivers `event`, running concurrent jobs on `pool`.
    pub fn dispatch_on(
        &self,
        event: impl IntoEvent,
        mode: DispatchMode,
        pool: &dyn WorkerPool,
    ) -> Completion {
        self.dispatcher.dispatch(event.into_shared(), mode, pool)
    }

    /// Delivers each event in turn; one handle covers all of them.
    ///
    /// Blocking mode finishes one event's handlers before starting the next.
    pub fn dispatch_all<I>(&self, events: I, mode: DispatchMode) -> Completion
    where
        I: IntoIterator,
        I::Item: IntoEvent,
    {
        self.dispatch_all_on(events, mode, self.pool.as_ref())
    }

    /// Like [`dispatch_all`](Self::dispatch_all), running concurrent jobs on `pool`.
    pub fn dispatch_all_on<I>(&self, events: I, mode: DispatchMode, pool: &dyn WorkerPool) -> Completion
    where
        I: IntoIterator,
        I::Item: IntoEvent,
    {
        let events = events.into_iter().map(IntoEvent::into_shared);
        self.dispatcher.dispatch_all(events, mode, pool)
    }

    /// Delivers `event` with [`BusConfig::default_mode`].
    pub fn publish(&self, event: impl IntoEvent) -> Completion {
        self.dispatch(event, self.cfg.default_mode)
    }

    fn commit(
        &self,
        owner: &'static str,
        kind: &'static str,
        validated: Result<Vec<HandlerEntry>, RegistrationError>,
    ) -> Result<usize, RegistrationError> {
        match validated {
            Ok(entries) => {
                let added = self.registry.insert_batch(entries);
                tracing::info!(
                    bus = %self.cfg.name,
                    owner,
                    kind,
                    added,
                    "registered {added} handler(s)"
                );
                Ok(added)
            }
            Err(err) => {
                tracing::warn!(
                    bus = %self.cfg.name,
                    owner,
                    kind,
                    label = err.as_label(),
                    error = %err,
                    "registration rejected"
                );
                Err(err)
            }
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("name", &self.cfg.name)
            .field("handlers", &self.registry.len())
            .field("pool", &self.pool.name())
            .field("fault_receivers", &self.diagnostics.receiver_count())
            .finish()
    }
}

//! Events: the value model and the diagnostics channel.
//!
//! This module groups the event **data model** and the **diagnostics** channel
//! through which isolated handler failures are reported.
//!
//! ## Contents
//! - [`Event`], [`EventType`] event values and runtime type matching
//! - [`HandlerFault`] record of one isolated handler failure
//! - [`Diagnostics`] thin wrapper over `tokio::sync::broadcast` for faults
//!
//! ## Quick reference
//! - **Producers** create events and hand them to [`EventBus`](crate::EventBus).
//! - **Publishers of faults**: the dispatcher, from the caller thread (blocking)
//!   or from pool threads (concurrent).
//! - **Consumers of faults**: anything holding [`EventBus::faults`](crate::EventBus::faults).

mod diagnostics;
mod event;
mod fault;

pub use diagnostics::Diagnostics;
pub use event::{AsAny, Event, EventType, IntoEvent, Lineage};
pub use fault::HandlerFault;

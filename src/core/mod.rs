//! Runtime core: registry, dispatch and completion.
//!
//! The public face of this module is [`EventBus`], built with [`EventBusBuilder`]
//! from a [`BusConfig`]. Everything else supports it.
//!
//! Internal modules:
//! - [`registry`]: append-only, snapshot-read handler set;
//! - [`dispatcher`]: matches an event and runs handlers under a [`DispatchMode`];
//! - [`completion`]: counts outstanding jobs and resolves the [`Completion`];
//! - [`pool`]: the [`WorkerPool`] seam concurrent dispatch submits to;
//! - [`bus`], [`builder`], [`config`]: the user-facing surface.

mod builder;
mod bus;
mod completion;
mod config;
mod dispatcher;
mod pool;
mod registry;


pub use builder::EventBusBuilder;
pub use bus::EventBus;
pub use completion::Completion;
pub use config::BusConfig;
pub use dispatcher::DispatchMode;
pub use pool::{Job, WorkerPool};

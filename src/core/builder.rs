use std::sync::Arc;

use tokio::runtime::Handle;

use super::{bus::EventBus, config::BusConfig, pool::WorkerPool};
use crate::error::BuildError;

/// Builder for constructing an [`EventBus`].
pub struct EventBusBuilder {
    cfg: BusConfig,
    pool: Option<Arc<dyn WorkerPool>>,
}

impl EventBusBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: BusConfig) -> Self {
        Self { cfg, pool: None }
    }

    /// Sets the worker pool used by concurrent dispatch.
    pub fn with_pool(mut self, pool: impl WorkerPool) -> Self {
        self.pool = Some(Arc::new(pool));
        self
    }

    /// Sets a worker pool already shared with other components.
    pub fn with_shared_pool(mut self, pool: Arc<dyn WorkerPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Builds the bus.
    ///
    /// Without an explicit pool, the handle of the Tokio runtime current at this
    /// call is captured; outside a runtime this fails with [`BuildError::NoWorkerPool`].
    pub fn build(self) -> Result<EventBus, BuildError> {
        let pool = match self.pool {
            Some(pool) => pool,
            None => {
                let handle = Handle::try_current().map_err(|_| BuildError::NoWorkerPool)?;
                Arc::new(handle) as Arc<dyn WorkerPool>
            }
        };
        Ok(EventBus::new_internal(self.cfg, pool))
    }
}

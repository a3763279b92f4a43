//! # Bus configuration.
//!
//! Provides [`BusConfig`], the centralized settings of an [`EventBus`](crate::EventBus).
//!
//! Config is used in two ways:
//! 1. **Bus creation**: `EventBus::builder(config).build()`
//! 2. **Dispatch defaults**: `EventBus::publish` uses [`BusConfig::default_mode`]
//!
//! The worker pool is deliberately **not** part of the config: it is a runtime
//! resource passed to the builder (`with_pool`) and owned by the host.

use std::borrow::Cow;

use crate::core::dispatcher::DispatchMode;

/// Configuration of one event bus.
///
/// ## Field semantics
/// - `name`: label attached to every log line of this bus
/// - `default_mode`: mode used by [`EventBus::publish`](crate::EventBus::publish)
/// - `fault_capacity`: diagnostics ring buffer size (min 1; clamped)
#[derive(Clone, Debug)]
pub struct BusConfig {
    /// Label attached to every log line of this bus.
    pub name: Cow<'static, str>,

    /// Mode used when the caller does not choose one.
    pub default_mode: DispatchMode,

    /// Capacity of the diagnostics broadcast channel.
    ///
    /// Fault receivers lagging more than `fault_capacity` records behind observe
    /// `Lagged` and skip older faults.
    pub fault_capacity: usize,
}

impl BusConfig {
    /// Returns the fault capacity clamped to a minimum of 1.
    #[inline]
    pub fn fault_capacity_clamped(&self) -> usize {
        self.fault_capacity.max(1)
    }
}

impl Default for BusConfig {
    /// Default configuration:
    ///
    /// - `name = "event-bus"`
    /// - `default_mode = DispatchMode::Concurrent`
    /// - `fault_capacity = 256`
    fn default() -> Self {
        Self {
            name: Cow::Borrowed("event-bus"),
            default_mode: DispatchMode::Concurrent,
            fault_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = BusConfig::default();
        assert_eq!(cfg.name, "event-bus");
        assert_eq!(cfg.default_mode, DispatchMode::Concurrent);
        assert_eq!(cfg.fault_capacity_clamped(), 256);
    }

    #[test]
    fn test_fault_capacity_clamped() {
        let cfg = BusConfig {
            fault_capacity: 0,
            ..BusConfig::default()
        };
        assert_eq!(cfg.fault_capacity_clamped(), 1);
    }
}

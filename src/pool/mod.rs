//! Object pooling for reusable engine-managed items
//!
//! This module provides the pool implementations, layered by specialization:
//! - [`Pool`]: generic acquire/release tracking with on-demand growth
//! - [`ManagedPool`]: pool for items with an explicit active/inactive state
//! - [`InstancePool`]: auto-populating pool that clones a template item
//! - [`ComponentInstancePool`]: the same contract for units attached to a
//!   host object

mod generic;
mod managed;
mod prefab;
mod resource;
mod stats;

pub use generic::{Pool, PoolBuilder};
pub use managed::ManagedPool;
pub use prefab::{ComponentInstancePool, InstancePool};
pub use resource::{Activate, Attached, Instantiate};
pub use stats::PoolStats;

/// Configuration for object pools
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolConfig {
    /// Number of items created up front
    pub initial_capacity: usize,

    /// Diagnostic label used in log events and errors
    pub label: Option<String>,
}

impl PoolConfig {
    /// Set the number of items created up front
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Set the diagnostic label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Pool lifecycle hooks
///
/// Specialized pools inject a hook pair instead of overriding pool
/// internals: `on_adopt` runs once when a freshly created item joins the
/// pool, `on_return` runs every time an item is inserted into the available
/// set (both on release and on the initial insertion after growth).
pub trait PoolHooks<T> {
    /// Called when a freshly created item joins the pool
    fn on_adopt(&mut self, _item: &mut T) {}

    /// Called whenever an item is inserted into the available set
    fn on_return(&mut self, _item: &mut T) {}
}

/// Default no-op hooks
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpHooks;

impl<T> PoolHooks<T> for NoOpHooks {}

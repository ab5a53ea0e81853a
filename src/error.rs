//! Error types for pool operations

use thiserror::Error;

/// Result type for pool operations
pub type PoolResult<T> = std::result::Result<T, PoolError>;

/// Errors raised by pool operations
///
/// A rejected call never mutates pool state: every variant is raised before
/// any bookkeeping change takes effect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// No factory was supplied when building the pool
    #[error("no factory provided for pool `{pool}`")]
    MissingFactory {
        /// Pool label
        pool: String,
    },

    /// The handle was never adopted by this pool
    #[error("handle {handle} does not belong to pool `{pool}`")]
    ForeignHandle {
        /// Pool label
        pool: String,
        /// Offending handle id
        handle: u64,
    },

    /// The item behind the handle is already checked in
    #[error("handle {handle} is already available in pool `{pool}`")]
    AlreadyAvailable {
        /// Pool label
        pool: String,
        /// Offending handle id
        handle: u64,
    },

    /// Growth was triggered to satisfy an acquisition but produced no
    /// available item
    #[error("pool `{pool}` grew but produced no available item")]
    GrowthFailed {
        /// Pool label
        pool: String,
    },
}

impl PoolError {
    /// Check if the error signals a caller bug rather than an internal
    /// invariant violation
    pub fn is_usage_error(&self) -> bool {
        !matches!(self, Self::GrowthFailed { .. })
    }
}

//! Object pools for engine-managed resources
//!
//! This crate provides a layered pooling subsystem for items that are
//! expensive to create and cheap to recycle:
//!
//! - [`Pool`]: generic acquire/release tracking with on-demand growth
//! - [`ManagedPool`]: keeps idle items in an explicit inactive state
//! - [`InstancePool`] / [`ComponentInstancePool`]: auto-populate a pool by
//!   cloning a template item through a host-supplied clone primitive
//! - [`PoolRegistry`]: process-wide ownership of named pools with explicit
//!   teardown
//!
//! Pools are single-threaded by contract: every operation takes `&mut self`
//! and runs to completion on the caller's thread. Callers that need shared
//! access serialize externally.
//!
//! # Example
//!
//! ```
//! use repool::{Pool, PoolConfig};
//!
//! let mut pool = Pool::with_config(
//!     PoolConfig::default().with_initial_capacity(2).with_label("scratch buffers"),
//!     || Vec::<u8>::with_capacity(256),
//! );
//!
//! let buf = pool.acquire()?;
//! pool.get_mut(buf).unwrap().extend_from_slice(b"frame data");
//! pool.release(buf)?;
//! # Ok::<(), repool::PoolError>(())
//! ```

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod handle;
pub mod pool;
pub mod registry;

pub use error::{PoolError, PoolResult};
pub use handle::Handle;
pub use pool::{
    Activate, Attached, ComponentInstancePool, InstancePool, Instantiate, ManagedPool, NoOpHooks,
    Pool, PoolBuilder, PoolConfig, PoolHooks, PoolStats,
};
pub use registry::{PoolRegistry, Reclaim};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

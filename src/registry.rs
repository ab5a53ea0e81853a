//! Process-wide ownership of named pools
//!
//! A [`PoolRegistry`] is constructed once at startup, passed by reference to
//! consumers, and torn down explicitly. Teardown sweeps every registered
//! pool (a return-all pass) before forgetting it, so engine-managed items
//! are back in their idle state when the host shuts the subsystem down.

use std::any::Any;
use std::collections::HashMap;

use tracing::debug;

use crate::pool::{Activate, Attached, ComponentInstancePool, InstancePool, Instantiate};
use crate::pool::{ManagedPool, Pool};

/// Pools that can return every checked-out item in one sweep
///
/// Implemented by all pool types in this crate; the registry uses it to
/// sweep pools at shutdown without knowing their element types.
pub trait Reclaim {
    /// Return every checked-out item to the available set
    fn reclaim(&mut self);
}

impl<T> Reclaim for Pool<T> {
    fn reclaim(&mut self) {
        self.release_all();
    }
}

impl<T: Activate> Reclaim for ManagedPool<T> {
    fn reclaim(&mut self) {
        self.release_all();
    }
}

impl<T: Activate + Instantiate + 'static> Reclaim for InstancePool<T> {
    fn reclaim(&mut self) {
        self.release_all();
    }
}

impl<C: Attached + 'static> Reclaim for ComponentInstancePool<C> {
    fn reclaim(&mut self) {
        self.release_all();
    }
}

trait RegisteredPool: Any {
    fn reclaim(&mut self);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<P: Reclaim + Any> RegisteredPool for P {
    fn reclaim(&mut self) {
        Reclaim::reclaim(self);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Registry of named, heterogeneous pools
///
/// # Example
/// ```
/// use repool::{Pool, PoolRegistry};
///
/// let mut registry = PoolRegistry::new();
/// registry.register("scratch", Pool::new(|| Vec::<u8>::new()));
///
/// let pool: &mut Pool<Vec<u8>> = registry.get_mut("scratch").unwrap();
/// let buf = pool.acquire()?;
///
/// // At shutdown every pool is swept, then forgotten.
/// registry.shutdown();
/// assert!(registry.is_empty());
/// # Ok::<(), repool::PoolError>(())
/// ```
#[derive(Default)]
pub struct PoolRegistry {
    pools: HashMap<String, Box<dyn RegisteredPool>>,
}

impl PoolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pool under `name`, replacing any pool previously held
    /// under that name
    pub fn register<P>(&mut self, name: impl Into<String>, pool: P)
    where
        P: Reclaim + Any,
    {
        self.pools.insert(name.into(), Box::new(pool));
    }

    /// Borrow the pool registered under `name`, if it has type `P`
    pub fn get<P: Any>(&self, name: &str) -> Option<&P> {
        self.pools.get(name).and_then(|pool| pool.as_any().downcast_ref())
    }

    /// Mutably borrow the pool registered under `name`, if it has type `P`
    pub fn get_mut<P: Any>(&mut self, name: &str) -> Option<&mut P> {
        self.pools.get_mut(name).and_then(|pool| pool.as_any_mut().downcast_mut())
    }

    /// Remove and return the pool registered under `name`, if it has type `P`
    ///
    /// A name registered with a different type is left in place.
    pub fn remove<P: Any>(&mut self, name: &str) -> Option<P> {
        if !self.pools.get(name)?.as_any().is::<P>() {
            return None;
        }
        let pool = self.pools.remove(name)?;
        pool.into_any().downcast().ok().map(|boxed| *boxed)
    }

    /// Check whether a pool is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.pools.contains_key(name)
    }

    /// Number of registered pools
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Check whether the registry holds no pools
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Sweep every pool (return-all) and forget them
    pub fn shutdown(&mut self) {
        for (name, pool) in self.pools.iter_mut() {
            debug!(pool = name.as_str(), "sweeping pool at shutdown");
            pool.reclaim();
        }
        self.pools.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::PoolConfig;

    struct Probe {
        active: bool,
    }

    impl Activate for Probe {
        fn set_active(&mut self, active: bool) {
            self.active = active;
        }

        fn is_active(&self) -> bool {
            self.active
        }
    }

    #[test]
    fn register_and_downcast() {
        let mut registry = PoolRegistry::new();
        registry.register("numbers", Pool::new(|| 0u32));
        registry.register("probes", ManagedPool::new(|| Probe { active: false }));

        assert!(registry.get::<Pool<u32>>("numbers").is_some());
        assert!(registry.get::<Pool<u32>>("probes").is_none());
        assert!(registry.get::<ManagedPool<Probe>>("probes").is_some());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn shutdown_sweeps_checked_out_items() {
        let mut registry = PoolRegistry::new();
        registry.register(
            "probes",
            ManagedPool::with_config(PoolConfig::default().with_initial_capacity(2), || Probe {
                active: false,
            }),
        );

        let handle = {
            let pool: &mut ManagedPool<Probe> = registry.get_mut("probes").unwrap();
            pool.acquire().unwrap()
        };

        registry.shutdown();
        assert!(registry.is_empty());
        // The pool itself is gone with the registry entry.
        assert!(registry.get::<ManagedPool<Probe>>("probes").is_none());
        let _ = handle;
    }

    #[test]
    fn remove_preserves_wrong_type_requests() {
        let mut registry = PoolRegistry::new();
        registry.register("numbers", Pool::new(|| 0u32));

        assert!(registry.remove::<Pool<String>>("numbers").is_none());
        assert!(registry.contains("numbers"));

        let mut pool = registry.remove::<Pool<u32>>("numbers").unwrap();
        assert!(!registry.contains("numbers"));
        assert!(pool.acquire().is_ok());
    }

    #[test]
    fn shutdown_deactivates_items_before_forgetting() {
        use std::cell::Cell;
        use std::rc::Rc;

        struct SharedProbe {
            active: Rc<Cell<bool>>,
        }

        impl Activate for SharedProbe {
            fn set_active(&mut self, active: bool) {
                self.active.set(active);
            }

            fn is_active(&self) -> bool {
                self.active.get()
            }
        }

        let flag = Rc::new(Cell::new(false));
        let shared = Rc::clone(&flag);

        let mut registry = PoolRegistry::new();
        registry.register(
            "probes",
            ManagedPool::new(move || SharedProbe { active: Rc::clone(&shared) }),
        );

        let pool: &mut ManagedPool<SharedProbe> = registry.get_mut("probes").unwrap();
        pool.acquire().unwrap();
        assert!(flag.get());

        registry.shutdown();
        assert!(!flag.get());
    }
}

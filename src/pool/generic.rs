//! Core pool implementation

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use super::{NoOpHooks, PoolConfig, PoolHooks};
use crate::error::{PoolError, PoolResult};
use crate::handle::Handle;
use crate::pool::stats::PoolStats;

/// Lifecycle state of an adopted item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemState {
    Available,
    CheckedOut,
}

#[derive(Debug)]
struct Entry<T> {
    value: T,
    state: ItemState,
}

/// Generic object pool with acquire/release tracking and on-demand growth
///
/// The pool adopts every item its factory creates and partitions them into
/// an available set and a checked-out set. Acquisition pops the most
/// recently checked-in item (LIFO; callers must not assume FIFO), growing
/// the pool by one when nothing is available. Items are addressed through
/// copyable [`Handle`]s; the pool owns item storage and hands out borrows
/// via [`get`](Pool::get) / [`get_mut`](Pool::get_mut).
///
/// # Example
/// ```
/// use repool::Pool;
///
/// let mut pool = Pool::new(|| String::with_capacity(64));
/// let item = pool.acquire()?;
/// pool.get_mut(item).unwrap().push_str("in use");
/// pool.release(item)?;
/// # Ok::<(), repool::PoolError>(())
/// ```
pub struct Pool<T> {
    entries: HashMap<u64, Entry<T>>,
    /// Adoption-order roster; traversal order for [`release_all`](Pool::release_all)
    all: Vec<Handle<T>>,
    /// LIFO stack of checked-in handles; membership mirrors `ItemState::Available`
    available: Vec<Handle<T>>,
    factory: Box<dyn FnMut() -> T>,
    reset: Option<Box<dyn FnMut(&mut T)>>,
    hooks: Box<dyn PoolHooks<T>>,
    config: PoolConfig,
    stats: PoolStats,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("entries", &self.entries)
            .field("all", &self.all)
            .field("available", &self.available)
            .field("config", &self.config)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<T> Pool<T> {
    /// Create a pool with a factory function and no pre-created items
    pub fn new<F>(factory: F) -> Self
    where
        F: FnMut() -> T + 'static,
    {
        Self::with_config(PoolConfig::default(), factory)
    }

    /// Create a pool with custom configuration
    ///
    /// If `config.initial_capacity` is non-zero the pool grows by that
    /// amount before returning.
    pub fn with_config<F>(config: PoolConfig, factory: F) -> Self
    where
        F: FnMut() -> T + 'static,
    {
        Self::assemble(config, Box::new(factory), None, Box::new(NoOpHooks))
    }

    /// Start building a pool with optional reset action and hooks
    pub fn builder() -> PoolBuilder<T> {
        PoolBuilder::new()
    }

    pub(crate) fn assemble(
        config: PoolConfig,
        factory: Box<dyn FnMut() -> T>,
        reset: Option<Box<dyn FnMut(&mut T)>>,
        hooks: Box<dyn PoolHooks<T>>,
    ) -> Self {
        let mut pool = Pool {
            entries: HashMap::new(),
            all: Vec::new(),
            available: Vec::new(),
            factory,
            reset,
            hooks,
            config,
            stats: PoolStats::default(),
        };

        let warm = pool.config.initial_capacity;
        if warm > 0 {
            pool.grow(warm);
        }
        pool
    }

    /// Acquire an item, applying the pool's default reset action
    ///
    /// Grows the pool by exactly one item when nothing is available. The
    /// returned handle stays valid for the lifetime of the pool.
    pub fn acquire(&mut self) -> PoolResult<Handle<T>> {
        let handle = self.checkout()?;
        self.apply_default_reset(handle);
        Ok(handle)
    }

    /// Acquire an item, applying `reset` instead of the pool's default
    pub fn acquire_with(&mut self, reset: impl FnOnce(&mut T)) -> PoolResult<Handle<T>> {
        let handle = self.checkout()?;
        if let Some(entry) = self.entries.get_mut(&handle.id()) {
            reset(&mut entry.value);
        }
        Ok(handle)
    }

    /// Acquire an item only if one is available, without growing the pool
    pub fn try_acquire(&mut self) -> Option<Handle<T>> {
        let handle = self.take_available()?;
        self.apply_default_reset(handle);
        Some(handle)
    }

    /// Check whether `handle` belongs to this pool (checked out or available)
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.entries.contains_key(&handle.id())
    }

    /// Return a checked-out item to the available set
    ///
    /// Fails with [`PoolError::ForeignHandle`] for handles this pool never
    /// adopted and [`PoolError::AlreadyAvailable`] on double release; both
    /// leave the pool untouched.
    pub fn release(&mut self, handle: Handle<T>) -> PoolResult<()> {
        let state = match self.entries.get(&handle.id()) {
            Some(entry) => entry.state,
            None => {
                warn!(pool = self.display_label(), handle = handle.id(), "rejected foreign handle");
                return Err(PoolError::ForeignHandle {
                    pool: self.display_label().to_owned(),
                    handle: handle.id(),
                });
            }
        };

        if state == ItemState::Available {
            warn!(pool = self.display_label(), handle = handle.id(), "rejected double release");
            return Err(PoolError::AlreadyAvailable {
                pool: self.display_label().to_owned(),
                handle: handle.id(),
            });
        }

        self.check_in(handle);
        self.stats.record_release();
        trace!(pool = self.display_label(), handle = handle.id(), "released");
        Ok(())
    }

    /// Return every checked-out item to the available set
    pub fn release_all(&mut self) {
        self.release_all_with(|_| {});
    }

    /// Return every checked-out item, running `pre_release` on each first
    ///
    /// Items are visited in adoption order; each checked-out item goes
    /// through the same return path as a single release. Already-available
    /// items are skipped.
    pub fn release_all_with(&mut self, mut pre_release: impl FnMut(&mut T)) {
        let mut swept = 0usize;
        for index in 0..self.all.len() {
            let handle = self.all[index];
            let checked_out = self
                .entries
                .get(&handle.id())
                .is_some_and(|entry| entry.state == ItemState::CheckedOut);
            if !checked_out {
                continue;
            }

            if let Some(entry) = self.entries.get_mut(&handle.id()) {
                pre_release(&mut entry.value);
            }
            self.check_in(handle);
            self.stats.record_release();
            swept += 1;
        }
        debug!(pool = self.display_label(), swept, "returned all checked-out items");
    }

    /// Create `amount` new items and insert them into the available set
    ///
    /// Each new item runs the adoption hook, joins the roster, then goes
    /// through the same check-in path as a released item so it starts in
    /// the same state as any idle item.
    pub fn grow(&mut self, amount: usize) {
        debug!(pool = self.display_label(), amount, "growing pool");
        for _ in 0..amount {
            let mut value = (self.factory)();
            self.hooks.on_adopt(&mut value);

            let handle = Handle::next();
            self.entries.insert(handle.id(), Entry { value, state: ItemState::CheckedOut });
            self.all.push(handle);
            self.stats.record_created();

            self.check_in(handle);
        }
    }

    /// Borrow an adopted item
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.entries.get(&handle.id()).map(|entry| &entry.value)
    }

    /// Mutably borrow an adopted item
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.entries.get_mut(&handle.id()).map(|entry| &mut entry.value)
    }

    /// Handles of every adopted item, in adoption order
    pub fn handles(&self) -> impl Iterator<Item = Handle<T>> + '_ {
        self.all.iter().copied()
    }

    /// Total number of items ever adopted
    pub fn total(&self) -> usize {
        self.all.len()
    }

    /// Number of items currently available
    pub fn available(&self) -> usize {
        self.available.len()
    }

    /// Number of items currently checked out
    pub fn in_use(&self) -> usize {
        self.all.len() - self.available.len()
    }

    /// Diagnostic label, if configured
    pub fn label(&self) -> Option<&str> {
        self.config.label.as_deref()
    }

    /// Usage statistics
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    fn display_label(&self) -> &str {
        self.config.label.as_deref().unwrap_or("unnamed")
    }

    /// Pop the most recently checked-in handle and mark it checked out
    fn take_available(&mut self) -> Option<Handle<T>> {
        let handle = self.available.pop()?;
        if let Some(entry) = self.entries.get_mut(&handle.id()) {
            entry.state = ItemState::CheckedOut;
        }
        self.stats.record_acquire(self.all.len() - self.available.len());
        trace!(pool = self.display_label(), handle = handle.id(), "acquired");
        Some(handle)
    }

    fn checkout(&mut self) -> PoolResult<Handle<T>> {
        if self.available.is_empty() {
            self.grow(1);
        }
        // Growth must have produced an available item; anything else means
        // the factory or hooks broke the partition invariant.
        self.take_available()
            .ok_or_else(|| PoolError::GrowthFailed { pool: self.display_label().to_owned() })
    }

    /// Single return path shared by release, the return-all sweep, and the
    /// initial insertion after growth
    fn check_in(&mut self, handle: Handle<T>) {
        if let Some(entry) = self.entries.get_mut(&handle.id()) {
            self.hooks.on_return(&mut entry.value);
            entry.state = ItemState::Available;
        }
        self.available.push(handle);
    }

    fn apply_default_reset(&mut self, handle: Handle<T>) {
        if let (Some(reset), Some(entry)) =
            (self.reset.as_mut(), self.entries.get_mut(&handle.id()))
        {
            reset(&mut entry.value);
        }
    }
}

/// Builder for [`Pool`]
///
/// Unlike [`Pool::new`], the factory is optional until [`build`](PoolBuilder::build)
/// is called, which fails with [`PoolError::MissingFactory`] when it was
/// never supplied.
pub struct PoolBuilder<T> {
    factory: Option<Box<dyn FnMut() -> T>>,
    reset: Option<Box<dyn FnMut(&mut T)>>,
    hooks: Box<dyn PoolHooks<T>>,
    config: PoolConfig,
}

impl<T> PoolBuilder<T> {
    /// Create an empty builder
    pub fn new() -> Self {
        PoolBuilder {
            factory: None,
            reset: None,
            hooks: Box::new(NoOpHooks),
            config: PoolConfig::default(),
        }
    }

    /// Set the mandatory item factory
    pub fn factory(mut self, factory: impl FnMut() -> T + 'static) -> Self {
        self.factory = Some(Box::new(factory));
        self
    }

    /// Set the default reset action applied on every acquisition
    pub fn reset(mut self, reset: impl FnMut(&mut T) + 'static) -> Self {
        self.reset = Some(Box::new(reset));
        self
    }

    /// Set the lifecycle hook pair
    pub fn hooks(mut self, hooks: impl PoolHooks<T> + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    /// Set the number of items created up front
    pub fn initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.config.initial_capacity = initial_capacity;
        self
    }

    /// Set the diagnostic label
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.config.label = Some(label.into());
        self
    }

    /// Build the pool, growing to the configured initial capacity
    pub fn build(self) -> PoolResult<Pool<T>> {
        let Some(factory) = self.factory else {
            return Err(PoolError::MissingFactory {
                pool: self.config.label.unwrap_or_else(|| "unnamed".to_owned()),
            });
        };
        Ok(Pool::assemble(self.config, factory, self.reset, self.hooks))
    }
}

impl<T> Default for PoolBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

//! Pool layer for items with an explicit active/inactive state

use super::generic::Pool;
use super::resource::Activate;
use super::{PoolConfig, PoolHooks};
use crate::error::PoolResult;
use crate::handle::Handle;
use crate::pool::stats::PoolStats;

/// Hook pair that keeps every idle item inactive
struct DeactivateHooks;

impl<T: Activate> PoolHooks<T> for DeactivateHooks {
    fn on_adopt(&mut self, item: &mut T) {
        item.set_active(false);
    }

    fn on_return(&mut self, item: &mut T) {
        item.set_active(false);
    }
}

/// Pool for engine-managed items that are deactivated while idle
///
/// Composes a [`Pool`] with a deactivating hook pair: freshly created items
/// and returned items are switched off before they reach the available set,
/// and acquisition switches the item on after the base checkout. An item is
/// therefore active exactly while it is checked out, including immediately
/// after [`grow`](ManagedPool::grow) and across a
/// [`release_all`](ManagedPool::release_all) sweep.
///
/// # Example
/// ```
/// use repool::{Activate, ManagedPool};
///
/// struct Sprite {
///     visible: bool,
/// }
///
/// impl Activate for Sprite {
///     fn set_active(&mut self, active: bool) {
///         self.visible = active;
///     }
///
///     fn is_active(&self) -> bool {
///         self.visible
///     }
/// }
///
/// let mut pool = ManagedPool::new(|| Sprite { visible: true });
/// let sprite = pool.acquire()?;
/// assert!(pool.get(sprite).unwrap().is_active());
/// pool.release(sprite)?;
/// assert!(!pool.get(sprite).unwrap().is_active());
/// # Ok::<(), repool::PoolError>(())
/// ```
pub struct ManagedPool<T: Activate> {
    inner: Pool<T>,
}

impl<T: Activate> ManagedPool<T> {
    /// Create a pool with a factory function and no pre-created items
    pub fn new<F>(factory: F) -> Self
    where
        F: FnMut() -> T + 'static,
    {
        Self::with_config(PoolConfig::default(), factory)
    }

    /// Create a pool with custom configuration
    pub fn with_config<F>(config: PoolConfig, factory: F) -> Self
    where
        F: FnMut() -> T + 'static,
    {
        Self::assemble(config, Box::new(factory), None)
    }

    /// Create a pool with a default reset action applied on acquisition
    pub fn with_reset<F, R>(config: PoolConfig, factory: F, reset: R) -> Self
    where
        F: FnMut() -> T + 'static,
        R: FnMut(&mut T) + 'static,
    {
        Self::assemble(config, Box::new(factory), Some(Box::new(reset)))
    }

    pub(crate) fn assemble(
        config: PoolConfig,
        factory: Box<dyn FnMut() -> T>,
        reset: Option<Box<dyn FnMut(&mut T)>>,
    ) -> Self {
        ManagedPool { inner: Pool::assemble(config, factory, reset, Box::new(DeactivateHooks)) }
    }

    /// Acquire an item and mark it active
    pub fn acquire(&mut self) -> PoolResult<Handle<T>> {
        let handle = self.inner.acquire()?;
        self.activate(handle);
        Ok(handle)
    }

    /// Acquire an item with a reset override, then mark it active
    pub fn acquire_with(&mut self, reset: impl FnOnce(&mut T)) -> PoolResult<Handle<T>> {
        let handle = self.inner.acquire_with(reset)?;
        self.activate(handle);
        Ok(handle)
    }

    /// Acquire without growing the pool; the item is marked active
    pub fn try_acquire(&mut self) -> Option<Handle<T>> {
        let handle = self.inner.try_acquire()?;
        self.activate(handle);
        Some(handle)
    }

    /// Return an item; it is deactivated before joining the available set
    pub fn release(&mut self, handle: Handle<T>) -> PoolResult<()> {
        self.inner.release(handle)
    }

    /// Return and deactivate every checked-out item
    pub fn release_all(&mut self) {
        self.inner.release_all();
    }

    /// Return and deactivate every checked-out item, running `pre_release`
    /// on each while it is still active
    pub fn release_all_with(&mut self, pre_release: impl FnMut(&mut T)) {
        self.inner.release_all_with(pre_release);
    }

    /// Create `amount` new items; all of them start inactive
    pub fn grow(&mut self, amount: usize) {
        self.inner.grow(amount);
    }

    /// Check whether `handle` belongs to this pool
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.inner.contains(handle)
    }

    /// Borrow an adopted item
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.inner.get(handle)
    }

    /// Mutably borrow an adopted item
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.inner.get_mut(handle)
    }

    /// Handles of every adopted item, in adoption order
    pub fn handles(&self) -> impl Iterator<Item = Handle<T>> + '_ {
        self.inner.handles()
    }

    /// Total number of items ever adopted
    pub fn total(&self) -> usize {
        self.inner.total()
    }

    /// Number of items currently available
    pub fn available(&self) -> usize {
        self.inner.available()
    }

    /// Number of items currently checked out
    pub fn in_use(&self) -> usize {
        self.inner.in_use()
    }

    /// Diagnostic label, if configured
    pub fn label(&self) -> Option<&str> {
        self.inner.label()
    }

    /// Usage statistics
    pub fn stats(&self) -> &PoolStats {
        self.inner.stats()
    }

    fn activate(&mut self, handle: Handle<T>) {
        if let Some(item) = self.inner.get_mut(handle) {
            item.set_active(true);
        }
    }
}

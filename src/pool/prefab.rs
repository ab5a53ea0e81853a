//! Auto-populating pools that clone a template item
//!
//! Both pools in this module manufacture items by cloning a fixed template
//! through the host's clone primitive, so callers never write a factory
//! closure. The factory is fully formed before the underlying pool is
//! built; initial capacity is grown only after that, so no item can be
//! cloned through a half-configured factory.

use std::rc::Rc;

use super::generic::Pool;
use super::managed::ManagedPool;
use super::resource::{Activate, Attached, Instantiate};
use super::{PoolConfig, PoolHooks};
use crate::error::PoolResult;
use crate::handle::Handle;
use crate::pool::stats::PoolStats;

fn template_factory<T: 'static>(
    template: &Rc<T>,
    mut initializer: Option<Box<dyn FnMut(&mut T)>>,
    instantiate: impl Fn(&T) -> T + 'static,
) -> Box<dyn FnMut() -> T> {
    let source = Rc::clone(template);
    Box::new(move || {
        let mut item = instantiate(&source);
        // The initializer runs exactly once per clone, before the item is
        // ever visible through the pool.
        if let Some(init) = initializer.as_mut() {
            init(&mut item);
        }
        item
    })
}

/// Instantiating pool whose pooled unit is a standalone engine object
///
/// Clones the template as a unit; idle items are kept inactive the same way
/// [`ManagedPool`] keeps them.
///
/// # Example
/// ```
/// use repool::{Activate, InstancePool, Instantiate, PoolConfig};
///
/// #[derive(Clone)]
/// struct Decal {
///     visible: bool,
///     layer: u8,
/// }
///
/// impl Activate for Decal {
///     fn set_active(&mut self, active: bool) {
///         self.visible = active;
///     }
///
///     fn is_active(&self) -> bool {
///         self.visible
///     }
/// }
///
/// impl Instantiate for Decal {
///     fn instantiate(&self) -> Self {
///         self.clone()
///     }
/// }
///
/// let template = Decal { visible: false, layer: 3 };
/// let mut pool = InstancePool::with_config(
///     PoolConfig::default().with_initial_capacity(4),
///     template,
/// );
/// let decal = pool.acquire()?;
/// assert_eq!(pool.get(decal).unwrap().layer, 3);
/// # Ok::<(), repool::PoolError>(())
/// ```
pub struct InstancePool<T: Activate + Instantiate + 'static> {
    inner: ManagedPool<T>,
    template: Rc<T>,
}

impl<T: Activate + Instantiate + 'static> InstancePool<T> {
    /// Create an empty pool for the given template
    pub fn new(template: T) -> Self {
        Self::with_config(PoolConfig::default(), template)
    }

    /// Create a pool for the given template with custom configuration
    pub fn with_config(config: PoolConfig, template: T) -> Self {
        Self::build(config, template, None, None)
    }

    /// Create a pool whose initializer runs once on every fresh clone
    pub fn with_initializer<I>(config: PoolConfig, template: T, initializer: I) -> Self
    where
        I: FnMut(&mut T) + 'static,
    {
        Self::build(config, template, Some(Box::new(initializer)), None)
    }

    /// Create a pool with a one-time initializer and a default reset action
    pub fn with_initializer_and_reset<I, R>(
        config: PoolConfig,
        template: T,
        initializer: I,
        reset: R,
    ) -> Self
    where
        I: FnMut(&mut T) + 'static,
        R: FnMut(&mut T) + 'static,
    {
        Self::build(config, template, Some(Box::new(initializer)), Some(Box::new(reset)))
    }

    fn build(
        config: PoolConfig,
        template: T,
        initializer: Option<Box<dyn FnMut(&mut T)>>,
        reset: Option<Box<dyn FnMut(&mut T)>>,
    ) -> Self {
        let template = Rc::new(template);
        let factory = template_factory(&template, initializer, T::instantiate);
        let inner = ManagedPool::assemble(config, factory, reset);
        InstancePool { inner, template }
    }

    /// The template items are cloned from
    pub fn template(&self) -> &T {
        &self.template
    }

    /// Acquire an item and mark it active
    pub fn acquire(&mut self) -> PoolResult<Handle<T>> {
        self.inner.acquire()
    }

    /// Acquire an item with a reset override, then mark it active
    pub fn acquire_with(&mut self, reset: impl FnOnce(&mut T)) -> PoolResult<Handle<T>> {
        self.inner.acquire_with(reset)
    }

    /// Acquire without growing the pool
    pub fn try_acquire(&mut self) -> Option<Handle<T>> {
        self.inner.try_acquire()
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
    /// on each first
    pub fn release_all_with(&mut self, pre_release: impl FnMut(&mut T)) {
        self.inner.release_all_with(pre_release);
    }

    /// Clone `amount` new items from the template; all start inactive
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
}

/// Hook pair that keeps the host object of every idle unit inactive
struct HostDeactivateHooks;

impl<C: Attached> PoolHooks<C> for HostDeactivateHooks {
    fn on_adopt(&mut self, item: &mut C) {
        item.set_host_active(false);
    }

    fn on_return(&mut self, item: &mut C) {
        item.set_host_active(false);
    }
}

/// Instantiating pool whose pooled unit is attached to a host object
///
/// Same contract as [`InstancePool`] over the [`Attached`] item shape:
/// cloning goes through the host object and the active toggle flips the
/// host, not the unit itself. Those two code paths are the only difference
/// between the flavors.
pub struct ComponentInstancePool<C: Attached + 'static> {
    inner: Pool<C>,
    template: Rc<C>,
}

impl<C: Attached + 'static> ComponentInstancePool<C> {
    /// Create an empty pool for the given template unit
    pub fn new(template: C) -> Self {
        Self::with_config(PoolConfig::default(), template)
    }

    /// Create a pool for the given template unit with custom configuration
    pub fn with_config(config: PoolConfig, template: C) -> Self {
        Self::build(config, template, None, None)
    }

    /// Create a pool whose initializer runs once on every fresh clone
    pub fn with_initializer<I>(config: PoolConfig, template: C, initializer: I) -> Self
    where
        I: FnMut(&mut C) + 'static,
    {
        Self::build(config, template, Some(Box::new(initializer)), None)
    }

    /// Create a pool with a one-time initializer and a default reset action
    pub fn with_initializer_and_reset<I, R>(
        config: PoolConfig,
        template: C,
        initializer: I,
        reset: R,
    ) -> Self
    where
        I: FnMut(&mut C) + 'static,
        R: FnMut(&mut C) + 'static,
    {
        Self::build(config, template, Some(Box::new(initializer)), Some(Box::new(reset)))
    }

    fn build(
        config: PoolConfig,
        template: C,
        initializer: Option<Box<dyn FnMut(&mut C)>>,
        reset: Option<Box<dyn FnMut(&mut C)>>,
    ) -> Self {
        let template = Rc::new(template);
        let factory = template_factory(&template, initializer, C::instantiate_attached);
        let inner = Pool::assemble(config, factory, reset, Box::new(HostDeactivateHooks));
        ComponentInstancePool { inner, template }
    }

    /// The template unit items are cloned from
    pub fn template(&self) -> &C {
        &self.template
    }

    /// Acquire a unit and mark its host active
    pub fn acquire(&mut self) -> PoolResult<Handle<C>> {
        let handle = self.inner.acquire()?;
        self.activate(handle);
        Ok(handle)
    }

    /// Acquire a unit with a reset override, then mark its host active
    pub fn acquire_with(&mut self, reset: impl FnOnce(&mut C)) -> PoolResult<Handle<C>> {
        let handle = self.inner.acquire_with(reset)?;
        self.activate(handle);
        Ok(handle)
    }

    /// Acquire without growing the pool; the unit's host is marked active
    pub fn try_acquire(&mut self) -> Option<Handle<C>> {
        let handle = self.inner.try_acquire()?;
        self.activate(handle);
        Some(handle)
    }

    /// Return a unit; its host is deactivated before joining the available set
    pub fn release(&mut self, handle: Handle<C>) -> PoolResult<()> {
        self.inner.release(handle)
    }

    /// Return every checked-out unit and deactivate its host
    pub fn release_all(&mut self) {
        self.inner.release_all();
    }

    /// Return every checked-out unit, running `pre_release` on each first
    pub fn release_all_with(&mut self, pre_release: impl FnMut(&mut C)) {
        self.inner.release_all_with(pre_release);
    }

    /// Clone `amount` new units from the template; all hosts start inactive
    pub fn grow(&mut self, amount: usize) {
        self.inner.grow(amount);
    }

    /// Check whether `handle` belongs to this pool
    pub fn contains(&self, handle: Handle<C>) -> bool {
        self.inner.contains(handle)
    }

    /// Borrow an adopted unit
    pub fn get(&self, handle: Handle<C>) -> Option<&C> {
        self.inner.get(handle)
    }

    /// Mutably borrow an adopted unit
    pub fn get_mut(&mut self, handle: Handle<C>) -> Option<&mut C> {
        self.inner.get_mut(handle)
    }

    /// Handles of every adopted unit, in adoption order
    pub fn handles(&self) -> impl Iterator<Item = Handle<C>> + '_ {
        self.inner.handles()
    }

    /// Total number of units ever adopted
    pub fn total(&self) -> usize {
        self.inner.total()
    }

    /// Number of units currently available
    pub fn available(&self) -> usize {
        self.inner.available()
    }

    /// Number of units currently checked out
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

    fn activate(&mut self, handle: Handle<C>) {
        if let Some(unit) = self.inner.get_mut(handle) {
            unit.set_host_active(true);
        }
    }
}

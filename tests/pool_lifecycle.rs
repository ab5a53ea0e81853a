//! Integration tests for the pool lifecycle

use std::cell::Cell;
use std::rc::Rc;

use repool::{
    Activate, InstancePool, Instantiate, ManagedPool, Pool, PoolConfig, PoolError,
};

#[derive(Clone)]
struct Cell2d {
    painted: bool,
    visible: bool,
}

impl Cell2d {
    fn fresh() -> Self {
        Cell2d { painted: false, visible: false }
    }
}

impl Activate for Cell2d {
    fn set_active(&mut self, active: bool) {
        self.visible = active;
    }

    fn is_active(&self) -> bool {
        self.visible
    }
}

impl Instantiate for Cell2d {
    fn instantiate(&self) -> Self {
        self.clone()
    }
}

#[test]
fn initial_capacity_covers_exactly_n_acquisitions() {
    let mut pool = Pool::with_config(
        PoolConfig::default().with_initial_capacity(3).with_label("cells"),
        Cell2d::fresh,
    );
    assert_eq!(pool.total(), 3);

    for _ in 0..3 {
        pool.acquire().unwrap();
    }
    // First three acquisitions come from the pre-created items.
    assert_eq!(pool.total(), 3);

    // The fourth falls over into on-demand growth.
    pool.acquire().unwrap();
    assert_eq!(pool.total(), 4);
    assert_eq!(pool.in_use(), 4);
}

#[test]
fn released_item_is_reacquired_first() {
    let mut pool =
        Pool::with_config(PoolConfig::default().with_initial_capacity(3), Cell2d::fresh);

    let first = pool.acquire().unwrap();
    let second = pool.acquire().unwrap();
    let third = pool.acquire().unwrap();
    let fourth = pool.acquire().unwrap();
    assert_eq!(pool.total(), 4);

    pool.release(second).unwrap();

    // `second` was the most recent insertion into the available set, so it
    // comes back first.
    let next = pool.acquire().unwrap();
    assert_eq!(next, second);
    assert_ne!(next, first);
    assert_ne!(next, third);
    assert_ne!(next, fourth);
}

#[test]
fn failed_release_leaves_pool_identical() {
    let mut pool = Pool::with_config(PoolConfig::default().with_initial_capacity(2), || 7u32);
    let item = pool.acquire().unwrap();

    let mut stranger_pool = Pool::new(|| 0u32);
    let stranger = stranger_pool.acquire().unwrap();

    let before = (pool.total(), pool.available(), pool.in_use(), pool.stats().clone());

    assert!(matches!(pool.release(stranger), Err(PoolError::ForeignHandle { .. })));
    assert_eq!(
        before,
        (pool.total(), pool.available(), pool.in_use(), pool.stats().clone())
    );

    pool.release(item).unwrap();
    assert!(matches!(pool.release(item), Err(PoolError::AlreadyAvailable { .. })));
    assert_eq!(pool.available(), 2);
    assert_eq!(pool.in_use(), 0);
}

#[test]
fn managed_pool_activation_follows_checkout() {
    let mut pool = ManagedPool::with_config(
        PoolConfig::default().with_label("sprites"),
        || Cell2d { painted: false, visible: true },
    );

    pool.grow(4);
    let idle: Vec<_> = pool.handles().collect();
    assert_eq!(idle.len(), 4);
    for handle in &idle {
        assert!(!pool.get(*handle).unwrap().is_active());
    }

    let held = pool.acquire().unwrap();
    assert!(pool.get(held).unwrap().is_active());

    pool.release(held).unwrap();
    assert!(!pool.get(held).unwrap().is_active());
}

#[test]
fn release_all_runs_callback_exactly_once_per_item() {
    let mut pool = ManagedPool::new(Cell2d::fresh);
    let held: Vec<_> = (0..5).map(|_| pool.acquire().unwrap()).collect();

    // One item goes back early and must not be visited by the sweep.
    pool.release(held[1]).unwrap();

    let mut visits = 0;
    pool.release_all_with(|_| visits += 1);
    assert_eq!(visits, 4);

    assert_eq!(pool.in_use(), 0);
    for handle in held {
        assert!(!pool.get(handle).unwrap().is_active());
    }

    // A second sweep has nothing left to visit.
    let mut visits = 0;
    pool.release_all_with(|_| visits += 1);
    assert_eq!(visits, 0);
}

#[test]
fn instance_pool_initializes_each_clone_exactly_once() {
    let initialized = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&initialized);

    let template = Cell2d { painted: true, visible: true };
    let mut pool = InstancePool::with_initializer(
        PoolConfig::default().with_initial_capacity(5).with_label("cell prefab"),
        template,
        move |_cell: &mut Cell2d| counter.set(counter.get() + 1),
    );

    assert_eq!(initialized.get(), 5);
    assert_eq!(pool.total(), 5);
    for handle in pool.handles() {
        assert!(!pool.get(handle).unwrap().is_active());
    }

    // Clones inherit template fields; growth keeps initializing.
    let handle = pool.acquire().unwrap();
    assert!(pool.get(handle).unwrap().painted);

    for _ in 0..5 {
        pool.acquire().unwrap();
    }
    assert_eq!(pool.total(), 6);
    assert_eq!(initialized.get(), 6);
}

#[test]
fn reset_override_applies_only_to_that_acquisition() {
    let mut pool = Pool::builder()
        .factory(|| 1u32)
        .reset(|value| *value = 0)
        .initial_capacity(1)
        .build()
        .unwrap();

    let item = pool.acquire_with(|value| *value = 42).unwrap();
    assert_eq!(*pool.get(item).unwrap(), 42);
    pool.release(item).unwrap();

    // Back to the default reset on a plain acquire.
    let item = pool.acquire().unwrap();
    assert_eq!(*pool.get(item).unwrap(), 0);
}

#[test]
fn stats_survive_mixed_usage() {
    let mut pool =
        ManagedPool::with_config(PoolConfig::default().with_initial_capacity(2), Cell2d::fresh);

    let a = pool.acquire().unwrap();
    let b = pool.acquire().unwrap();
    let c = pool.acquire().unwrap();
    pool.release(b).unwrap();
    pool.release_all();

    let stats = pool.stats();
    assert_eq!(stats.items_created, 3);
    assert_eq!(stats.total_acquisitions, 3);
    assert_eq!(stats.total_releases, 3);
    assert_eq!(stats.peak_in_use, 3);
    let _ = (a, c);
}

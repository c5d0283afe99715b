use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::rc::Rc;

use smallvec::SmallVec;

pub type StoreId = usize;
pub type ObserverId = usize;

/// One observable field of one store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Source {
    pub store: StoreId,
    pub field: &'static str,
}

thread_local! {
    static CURRENT_OBSERVER: RefCell<Option<ObserverId>> = const { RefCell::new(None) };
    static GRAPH: RefCell<DepGraph> = RefCell::new(DepGraph::default());
}

/// Re-runs allowed for one observer whose own run keeps invalidating it.
pub(crate) const MAX_PASSES: usize = 100;

#[derive(Default)]
struct DepGraph {
    next_observer: ObserverId,
    next_store: StoreId,
    // bumped on every observer run
    tick: u64,
    // source -> observers that read it during their last run
    edges: HashMap<Source, BTreeSet<ObserverId>>,
    // observer -> sources it read during its last run
    back: HashMap<ObserverId, SmallVec<[Source; 4]>>,
    observers: HashMap<ObserverId, Rc<dyn Fn()>>,
    last_run: HashMap<ObserverId, u64>,
    running: HashSet<ObserverId>,
    // notified while running; re-run once the current run returns
    dirty: HashSet<ObserverId>,
}

impl DepGraph {
    fn remove_all_edges_for(&mut self, obs: ObserverId) {
        if let Some(sources) = self.back.remove(&obs) {
            for s in sources {
                if let Some(set) = self.edges.get_mut(&s) {
                    set.remove(&obs);
                    if set.is_empty() {
                        self.edges.remove(&s);
                    }
                }
            }
        }
    }

    // The callback is handed back so it is dropped after the borrow ends.
    fn remove_observer(&mut self, obs: ObserverId) -> Option<Rc<dyn Fn()>> {
        self.remove_all_edges_for(obs);
        self.running.remove(&obs);
        self.dirty.remove(&obs);
        self.last_run.remove(&obs);
        self.observers.remove(&obs)
    }

    fn forget_store(&mut self, store: StoreId) {
        self.edges.retain(|s, _| s.store != store);
        for sources in self.back.values_mut() {
            sources.retain(|s| s.store != store);
        }
    }

    fn begin_run(&mut self, obs: ObserverId) -> Option<Rc<dyn Fn()>> {
        let f = self.observers.get(&obs).cloned()?;
        self.remove_all_edges_for(obs);
        self.dirty.remove(&obs);
        self.running.insert(obs);
        self.tick += 1;
        self.last_run.insert(obs, self.tick);
        Some(f)
    }

    // Returns whether the observer was invalidated during the run.
    fn end_run(&mut self, obs: ObserverId) -> bool {
        self.running.remove(&obs);
        self.dirty.remove(&obs) && self.observers.contains_key(&obs)
    }
}

// Restores the previous observer even if the observer body panics.
struct ObserverGuard {
    prev: Option<ObserverId>,
}

impl ObserverGuard {
    fn enter(obs: Option<ObserverId>) -> Self {
        let prev = CURRENT_OBSERVER.with(|co| co.replace(obs));
        Self { prev }
    }
}

impl Drop for ObserverGuard {
    fn drop(&mut self) {
        let prev = self.prev;
        let _ = CURRENT_OBSERVER.try_with(|co| *co.borrow_mut() = prev);
    }
}

pub(crate) fn next_store_id() -> StoreId {
    GRAPH.with(|g| {
        let mut g = g.borrow_mut();
        let id = g.next_store;
        g.next_store += 1;
        id
    })
}

/// Drop every edge that points at `store`. Called when a store is released.
pub(crate) fn forget_store(store: StoreId) {
    let _ = GRAPH.try_with(|g| match g.try_borrow_mut() {
        Ok(mut g) => g.forget_store(store),
        Err(_) => log::warn!("store {store} released while the dependency graph is busy; its edges are kept"),
    });
}

pub fn current_observer() -> Option<ObserverId> {
    CURRENT_OBSERVER.with(|co| *co.borrow())
}

pub fn register_read(source: Source) {
    if let Some(obs) = current_observer() {
        GRAPH.with(|g| {
            let mut g = g.borrow_mut();
            if g.edges.entry(source).or_default().insert(obs) {
                g.back.entry(obs).or_default().push(source);
                log::trace!("observer {obs} reads {}.{}", source.store, source.field);
            }
        });
    }
}

// Runs `obs`, then again for as long as its own run left it invalidated.
fn run(obs: ObserverId) {
    let mut passes = 0;
    loop {
        let Some(f) = GRAPH.with(|g| g.borrow_mut().begin_run(obs)) else {
            return;
        };
        {
            let _guard = ObserverGuard::enter(Some(obs));
            f();
        }
        drop(f);
        if !GRAPH.with(|g| g.borrow_mut().end_run(obs)) {
            return;
        }
        passes += 1;
        if passes == MAX_PASSES {
            log::warn!("observer {obs} still invalidated after {MAX_PASSES} runs; giving up");
            return;
        }
        log::trace!("observer {obs} was invalidated by its own run; running again");
    }
}

/// Synchronously re-run every observer that read `source`.
///
/// Each observer's registrations are cleared before it runs so the new run
/// records only the sources it actually reads. An observer that is running
/// right now is marked dirty and runs again as soon as its current run
/// returns. Observers that were removed, or that already ran after this
/// notification started, are skipped.
pub fn notify(source: Source) {
    let (pending, started): (Vec<ObserverId>, u64) = GRAPH.with(|g| {
        let g = g.borrow();
        let pending = g
            .edges
            .get(&source)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        (pending, g.tick)
    });
    if pending.is_empty() {
        return;
    }
    log::trace!(
        "{}.{} changed; notifying {} observer(s)",
        source.store,
        source.field,
        pending.len()
    );

    for obs in pending {
        let due = GRAPH.with(|g| {
            let mut g = g.borrow_mut();
            if !g.observers.contains_key(&obs) {
                return false;
            }
            if g.running.contains(&obs) {
                g.dirty.insert(obs);
                return false;
            }
            g.last_run.get(&obs).is_none_or(|&t| t <= started)
        });
        if due {
            run(obs);
        }
    }
}

pub fn new_observer(f: impl Fn() + 'static) -> ObserverId {
    GRAPH.with(|g| {
        let mut g = g.borrow_mut();
        let id = g.next_observer;
        g.next_observer += 1;
        g.observers.insert(id, Rc::new(f));
        id
    })
}

/// Remove an observer and all of its dependency edges.
pub fn remove_observer(id: ObserverId) {
    let _ = GRAPH.try_with(|g| {
        let removed = match g.try_borrow_mut() {
            Ok(mut g) => g.remove_observer(id),
            Err(_) => {
                log::warn!("observer {id} removed while the dependency graph is busy; its edges are kept");
                None
            }
        };
        drop(removed);
    });
}

/// Run `id` immediately. If it is already running it is marked dirty and
/// runs again once the current run returns.
pub fn run_observer_now(id: ObserverId) {
    let running = GRAPH.with(|g| {
        let mut g = g.borrow_mut();
        let running = g.running.contains(&id);
        if running {
            g.dirty.insert(id);
        }
        running
    });
    if !running {
        run(id);
    }
}

/// Run `f` with dependency tracking suspended.
pub fn untracked<R>(f: impl FnOnce() -> R) -> R {
    let _guard = ObserverGuard::enter(None);
    f()
}

pub fn observer_count(source: Source) -> usize {
    GRAPH.with(|g| g.borrow().edges.get(&source).map_or(0, BTreeSet::len))
}

pub fn is_observer_alive(id: ObserverId) -> bool {
    GRAPH.with(|g| g.borrow().observers.contains_key(&id))
}

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

thread_local! {
    static CURRENT_SCOPE: RefCell<Option<Weak<ScopeInner>>> = const { RefCell::new(None) };
}

/// Lifetime of one mounted component: its remembered slots and its cleanups.
pub struct Scope {
    inner: Rc<ScopeInner>,
}

struct ScopeInner {
    disposers: RefCell<Vec<Box<dyn FnOnce()>>>,
    slots: RefCell<SlotTable>,
    disposed: Cell<bool>,
}

#[derive(Default)]
pub(crate) struct SlotTable {
    pub(crate) slots: Vec<Box<dyn Any>>,
    pub(crate) cursor: usize,
    pub(crate) keyed: HashMap<String, Box<dyn Any>>,
}

impl Scope {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ScopeInner {
                disposers: RefCell::new(Vec::new()),
                slots: RefCell::new(SlotTable::default()),
                disposed: Cell::new(false),
            }),
        }
    }

    /// Run `f` with this scope current.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        struct Restore(Option<Weak<ScopeInner>>);
        impl Drop for Restore {
            fn drop(&mut self) {
                let prev = self.0.take();
                let _ = CURRENT_SCOPE.try_with(|current| *current.borrow_mut() = prev);
            }
        }

        let prev = CURRENT_SCOPE.with(|current| current.replace(Some(Rc::downgrade(&self.inner))));
        let _restore = Restore(prev);
        f()
    }

    /// Like `run`, but rewinds the order-based slot cursor first, so the Nth
    /// `remember` call of this pass gets the Nth stored value.
    pub fn compose<R>(&self, f: impl FnOnce() -> R) -> R {
        self.inner.slots.borrow_mut().cursor = 0;
        self.run(f)
    }

    pub fn add_disposer(&self, disposer: impl FnOnce() + 'static) {
        if self.inner.disposed.get() {
            log::warn!("disposer added to an already disposed scope; running it now");
            disposer();
            return;
        }
        self.inner.disposers.borrow_mut().push(Box::new(disposer));
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    pub(crate) fn with_slots<R>(&self, f: impl FnOnce(&mut SlotTable) -> R) -> R {
        f(&mut self.inner.slots.borrow_mut())
    }

    /// Release remembered values, then run disposers in registration order.
    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        let slots = std::mem::take(&mut *self.inner.slots.borrow_mut());
        drop(slots);

        let disposers = std::mem::take(&mut *self.inner.disposers.borrow_mut());
        for disposer in disposers {
            disposer();
        }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Scope {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("disposed", &self.inner.disposed.get())
            .field("slots", &self.inner.slots.borrow().slots.len())
            .finish_non_exhaustive()
    }
}

pub fn current_scope() -> Option<Scope> {
    CURRENT_SCOPE.with(|current| {
        current
            .borrow()
            .as_ref()
            .and_then(|weak| weak.upgrade().map(|inner| Scope { inner }))
    })
}

/// Register a cleanup with the current scope; it runs when the owning
/// component is unmounted.
pub fn on_dispose(f: impl FnOnce() + 'static) {
    if let Some(scope) = current_scope() {
        scope.add_disposer(f);
    } else {
        log::warn!("on_dispose called outside of a scope; cleanup will never run");
    }
}

impl Drop for ScopeInner {
    fn drop(&mut self) {
        let disposers = std::mem::take(&mut *self.disposers.borrow_mut());
        for disposer in disposers {
            disposer();
        }
    }
}

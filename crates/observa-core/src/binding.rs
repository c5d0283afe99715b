use std::fmt;
use std::rc::Rc;

use crate::reactive;
use crate::store::{Field, Store};

/// Read/write accessor pair over a value owned somewhere else.
///
/// A child that receives a `Binding` can mutate its parent's field without
/// owning the parent's store. Writes go straight to the owner and notify its
/// observers before `set` returns.
pub struct Binding<V> {
    get: Rc<dyn Fn() -> V>,
    set: Rc<dyn Fn(V)>,
}

impl<V: Clone + 'static> Binding<V> {
    pub fn new(get: impl Fn() -> V + 'static, set: impl Fn(V) + 'static) -> Self {
        Self {
            get: Rc::new(get),
            set: Rc::new(set),
        }
    }

    pub fn from_store<T: 'static>(store: &Store<T>, field: Field<T, V>) -> Self {
        let reader = store.clone();
        let writer = store.clone();
        Self::new(
            move || reader.get(field),
            move |v| writer.set(field, v),
        )
    }

    pub fn get(&self) -> V {
        (self.get)()
    }

    pub fn set(&self, value: V) {
        (self.set)(value)
    }

    /// Read-modify-write; the read does not register a dependency.
    pub fn update(&self, f: impl FnOnce(&mut V)) {
        let mut value = reactive::untracked(|| self.get());
        f(&mut value);
        self.set(value);
    }
}

impl Binding<bool> {
    pub fn toggle(&self) {
        self.update(|b| *b = !*b);
    }
}

impl<V> Clone for Binding<V> {
    fn clone(&self) -> Self {
        Self {
            get: self.get.clone(),
            set: self.set.clone(),
        }
    }
}

impl<V> fmt::Debug for Binding<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding").finish_non_exhaustive()
    }
}

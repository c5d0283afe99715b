//! Observable stores.
//!
//! A [`Store<T>`] wraps a plain record and tracks reads and writes per field.
//! Fields are addressed with [`Field<T, V>`] keys, usually declared as
//! associated constants next to the record:
//!
//! ```rust
//! use observa_core::*;
//!
//! #[derive(Default)]
//! struct Counter {
//!     value: i64,
//! }
//!
//! impl Counter {
//!     const VALUE: Field<Counter, i64> = field!(Counter, value);
//! }
//!
//! let counter = Store::new(Counter::default());
//! counter.update(Counter::VALUE, |v| *v += 2);
//! assert_eq!(counter.get(Counter::VALUE), 2);
//! ```
//!
//! Reads made while an observer runs register `(observer, store, field)`.
//! Writes notify exactly the observers registered for that field, and only
//! after the record borrow is released, so observers may read the store.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::Binding;
use crate::reactive::{self, Source, StoreId};

/// Typed key for one field of `T`.
pub struct Field<T, V> {
    name: &'static str,
    get: fn(&T) -> &V,
    get_mut: fn(&mut T) -> &mut V,
}

impl<T, V> Field<T, V> {
    pub const fn new(name: &'static str, get: fn(&T) -> &V, get_mut: fn(&mut T) -> &mut V) -> Self {
        Self { name, get, get_mut }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T, V> Clone for Field<T, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, V> Copy for Field<T, V> {}

impl<T, V> fmt::Debug for Field<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&self.name).finish()
    }
}

/// Build a [`Field`] key for a named struct field.
#[macro_export]
macro_rules! field {
    ($owner:ty, $name:ident) => {
        $crate::store::Field::<$owner, _>::new(
            stringify!($name),
            |s| &s.$name,
            |s| &mut s.$name,
        )
    };
}

pub struct Store<T> {
    inner: Rc<StoreInner<T>>,
}

struct StoreInner<T> {
    id: StoreId,
    name: &'static str,
    value: RefCell<T>,
}

impl<T> Drop for StoreInner<T> {
    fn drop(&mut self) {
        reactive::forget_store(self.id);
    }
}

impl<T: 'static> Store<T> {
    pub fn new(value: T) -> Self {
        let name = std::any::type_name::<T>();
        let name = name.rsplit("::").next().unwrap_or(name);
        Self::named(name, value)
    }

    pub fn named(name: &'static str, value: T) -> Self {
        let id = reactive::next_store_id();
        log::trace!("store {id} ({name}) created");
        Self {
            inner: Rc::new(StoreInner {
                id,
                name,
                value: RefCell::new(value),
            }),
        }
    }

    pub fn id(&self) -> StoreId {
        self.inner.id
    }

    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    fn source<V>(&self, field: Field<T, V>) -> Source {
        Source {
            store: self.inner.id,
            field: field.name,
        }
    }

    /// Tracked read of one field.
    pub fn get<V: Clone>(&self, field: Field<T, V>) -> V {
        self.with(field, V::clone)
    }

    /// Tracked read of one field by reference.
    pub fn with<V, R>(&self, field: Field<T, V>, f: impl FnOnce(&V) -> R) -> R {
        reactive::register_read(self.source(field));
        let value = self.inner.value.borrow();
        f((field.get)(&value))
    }

    /// Read without registering a dependency.
    pub fn peek<V: Clone>(&self, field: Field<T, V>) -> V {
        let value = self.inner.value.borrow();
        (field.get)(&value).clone()
    }

    pub fn set<V>(&self, field: Field<T, V>, v: V) {
        self.update(field, move |slot| *slot = v);
    }

    /// Mutate one field in place, then notify its observers.
    pub fn update<V>(&self, field: Field<T, V>, f: impl FnOnce(&mut V)) {
        {
            let mut value = self.inner.value.borrow_mut();
            f((field.get_mut)(&mut value));
        }
        log::trace!("{}.{} written", self.inner.name, field.name);
        reactive::notify(self.source(field));
    }

    /// Number of observers currently registered on `field`.
    pub fn subscriber_count<V>(&self, field: Field<T, V>) -> usize {
        reactive::observer_count(self.source(field))
    }

    /// Two-way accessor pair over `field` of this store.
    pub fn binding<V: Clone + 'static>(&self, field: Field<T, V>) -> Binding<V> {
        Binding::from_store(self, field)
    }

    pub fn downgrade(&self) -> WeakStore<T> {
        WeakStore {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: 'static> Store<T> {
    pub fn toggle(&self, field: Field<T, bool>) {
        self.update(field, |b| *b = !*b);
    }
}

impl<T: Default + 'static> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .finish_non_exhaustive()
    }
}

/// Non-owning handle; used to observe when a store has been released.
pub struct WeakStore<T> {
    inner: Weak<StoreInner<T>>,
}

impl<T> WeakStore<T> {
    pub fn upgrade(&self) -> Option<Store<T>> {
        self.inner.upgrade().map(|inner| Store { inner })
    }

    pub fn is_released(&self) -> bool {
        self.inner.strong_count() == 0
    }
}

impl<T> Clone for WeakStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct Pair {
        left: i32,
        right: bool,
    }

    impl Pair {
        const LEFT: Field<Pair, i32> = field!(Pair, left);
        const RIGHT: Field<Pair, bool> = field!(Pair, right);
    }

    #[test]
    fn writes_notify_only_observers_of_that_field() {
        let store = Store::new(Pair::default());
        let left_runs = Rc::new(Cell::new(0));
        let right_runs = Rc::new(Cell::new(0));

        let left_obs = reactive::new_observer({
            let store = store.clone();
            let runs = left_runs.clone();
            move || {
                runs.set(runs.get() + 1);
                let _ = store.get(Pair::LEFT);
            }
        });
        let right_obs = reactive::new_observer({
            let store = store.clone();
            let runs = right_runs.clone();
            move || {
                runs.set(runs.get() + 1);
                let _ = store.get(Pair::RIGHT);
            }
        });
        reactive::run_observer_now(left_obs);
        reactive::run_observer_now(right_obs);

        store.set(Pair::LEFT, 7);
        assert_eq!(left_runs.get(), 2);
        assert_eq!(right_runs.get(), 1);

        store.toggle(Pair::RIGHT);
        assert!(store.peek(Pair::RIGHT));
        assert_eq!(left_runs.get(), 2);
        assert_eq!(right_runs.get(), 2);

        reactive::remove_observer(left_obs);
        reactive::remove_observer(right_obs);
        assert_eq!(store.subscriber_count(Pair::LEFT), 0);
    }

    #[test]
    fn observer_can_read_the_store_it_was_notified_by() {
        let store = Store::new(Pair::default());
        let seen = Rc::new(Cell::new(0));
        let obs = reactive::new_observer({
            let store = store.clone();
            let seen = seen.clone();
            move || seen.set(store.get(Pair::LEFT))
        });
        reactive::run_observer_now(obs);

        store.update(Pair::LEFT, |v| *v += 5);
        assert_eq!(seen.get(), 5);
        reactive::remove_observer(obs);
    }

    #[test]
    fn peek_does_not_subscribe() {
        let store = Store::new(Pair::default());
        let obs = reactive::new_observer({
            let store = store.clone();
            move || {
                let _ = store.peek(Pair::LEFT);
            }
        });
        reactive::run_observer_now(obs);
        assert_eq!(store.subscriber_count(Pair::LEFT), 0);
        reactive::remove_observer(obs);
    }

    #[test]
    fn weak_store_reports_release() {
        let store = Store::new(Pair::default());
        let weak = store.downgrade();
        assert!(weak.upgrade().is_some());
        drop(store);
        assert!(weak.is_released());
    }
}

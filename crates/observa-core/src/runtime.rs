//! Remembered state bound to the current component's scope.

use std::rc::Rc;

use crate::Store;
use crate::scope::current_scope;

/// Slot-based remember (sequential composition only).
///
/// Returns the same `Rc<T>` on every render of the same mounted component.
/// The value is released when the component is unmounted.
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    let Some(scope) = current_scope() else {
        log::warn!("remember called outside of a component; value will not be retained");
        return Rc::new(init());
    };

    let cursor = scope.with_slots(|table| {
        let cursor = table.cursor;
        table.cursor += 1;
        cursor
    });

    let existing = scope.with_slots(|table| {
        table
            .slots
            .get(cursor)
            .map(|slot| slot.downcast_ref::<Rc<T>>().cloned())
    });

    match existing {
        Some(Some(rc)) => rc,
        Some(None) => {
            log::warn!(
                "remember: slot {cursor} type changed; replacing. \
                 If this is due to conditional composition, prefer remember_with_key."
            );
            let rc: Rc<T> = Rc::new(init());
            scope.with_slots(|table| table.slots[cursor] = Box::new(rc.clone()));
            rc
        }
        None => {
            let rc: Rc<T> = Rc::new(init());
            scope.with_slots(|table| table.slots.push(Box::new(rc.clone())));
            rc
        }
    }
}

/// Key-based remember; stable across conditional branches.
pub fn remember_with_key<T: 'static>(key: impl Into<String>, init: impl FnOnce() -> T) -> Rc<T> {
    let key = key.into();
    let Some(scope) = current_scope() else {
        log::warn!("remember_with_key('{key}') called outside of a component; value will not be retained");
        return Rc::new(init());
    };

    let existing = scope.with_slots(|table| {
        table
            .keyed
            .get(&key)
            .map(|slot| slot.downcast_ref::<Rc<T>>().cloned())
    });
    match existing {
        Some(Some(rc)) => return rc,
        Some(None) => {
            log::warn!("remember_with_key: key '{key}' reused with a different type; replacing.")
        }
        None => {}
    }

    let rc: Rc<T> = Rc::new(init());
    scope.with_slots(|table| table.keyed.insert(key, Box::new(rc.clone())));
    rc
}

/// Scoped local store: created on first mount, kept for the mount's lifetime.
pub fn remember_store<T: 'static>(init: impl FnOnce() -> T) -> Store<T> {
    let rc = remember(|| Store::new(init()));
    (*rc).clone()
}

pub fn remember_store_with_key<T: 'static>(
    key: impl Into<String>,
    init: impl FnOnce() -> T,
) -> Store<T> {
    let rc = remember_with_key(key, || Store::new(init()));
    (*rc).clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Scope;

    #[test]
    fn order_based_slots_survive_recomposition() {
        let scope = Scope::new();
        let first = scope.compose(|| remember(|| 42));
        let second = scope.compose(|| remember(|| 100));
        assert_eq!(*second, 42);
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn key_based_remember() {
        let scope = Scope::new();
        let (a, b) = scope.compose(|| {
            let a = remember_with_key("test", || 42);
            let b = remember_with_key("test", || 100);
            (a, b)
        });
        assert_eq!(*a, 42);
        assert_eq!(*b, 42);
    }

    #[test]
    fn slot_type_change_replaces_value() {
        let scope = Scope::new();
        scope.compose(|| remember(|| 1u8));
        let replaced = scope.compose(|| remember(|| "text"));
        assert_eq!(*replaced, "text");
    }

    #[test]
    fn remembered_store_is_released_on_dispose() {
        let scope = Scope::new();
        let store = scope.compose(|| remember_store(|| 5i32));
        let weak = store.downgrade();
        drop(store);
        assert!(!weak.is_released());

        scope.dispose();
        assert!(weak.is_released());
    }

    #[test]
    fn remember_outside_scope_is_not_retained() {
        let a = remember(|| 1);
        let b = remember(|| 2);
        assert_eq!((*a, *b), (1, 2));
    }
}

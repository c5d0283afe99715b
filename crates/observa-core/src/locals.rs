//! # Ambient context
//!
//! Values provided by an ancestor are visible to every descendant without
//! being threaded through intermediate views. The lookup key is the value's
//! type, so each type has at most one visible provider (the nearest one).
//!
//! ```rust
//! use observa_core::*;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Locale(&'static str);
//!
//! with_context(Locale("es"), || {
//!     assert_eq!(use_context::<Locale>(), Locale("es"));
//! });
//! assert!(resolve::<Locale>().is_err());
//! ```
//!
//! Inside a view tree, use `Provide` (from `observa-ui`) instead: the
//! evaluator captures the provider chain of each component when it is mounted
//! and re-installs it every time that component re-renders on its own.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::ContextError;

/// One provided value.
pub struct ContextFrame {
    type_id: TypeId,
    type_name: &'static str,
    value: Rc<dyn Any>,
}

impl ContextFrame {
    pub fn new<T: Clone + 'static>(value: T) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            value: Rc::new(value),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for ContextFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContextFrame").field(&self.type_name).finish()
    }
}

/// The providers visible at some point of the tree, outermost first.
pub type ContextChain = Vec<Rc<ContextFrame>>;

thread_local! {
    static CONTEXT_STACK: RefCell<ContextChain> = const { RefCell::new(Vec::new()) };
}

// Non-panicking frame guard (ensures the stack is restored on unwind)
struct Restore(Option<ContextChain>);

impl Drop for Restore {
    fn drop(&mut self) {
        if let Some(prev) = self.0.take() {
            let _ = CONTEXT_STACK.try_with(|st| *st.borrow_mut() = prev);
        }
    }
}

/// Provide `value` to everything evaluated inside `f`.
pub fn with_context<T: Clone + 'static, R>(value: T, f: impl FnOnce() -> R) -> R {
    with_frame(Rc::new(ContextFrame::new(value)), f)
}

pub(crate) fn with_frame<R>(frame: Rc<ContextFrame>, f: impl FnOnce() -> R) -> R {
    let prev = CONTEXT_STACK.with(|st| {
        let mut st = st.borrow_mut();
        let prev = st.clone();
        st.push(frame);
        prev
    });
    let _restore = Restore(Some(prev));
    f()
}

/// Replace the whole visible chain while `f` runs.
pub(crate) fn with_chain<R>(chain: &ContextChain, f: impl FnOnce() -> R) -> R {
    let prev = CONTEXT_STACK.with(|st| st.replace(chain.clone()));
    let _restore = Restore(Some(prev));
    f()
}

pub(crate) fn current_chain() -> ContextChain {
    CONTEXT_STACK.with(|st| st.borrow().clone())
}

/// Look up the nearest provided `T`.
pub fn resolve<T: Clone + 'static>() -> Result<T, ContextError> {
    CONTEXT_STACK.with(|st| {
        st.borrow()
            .iter()
            .rev()
            .filter(|frame| frame.type_id == TypeId::of::<T>())
            .find_map(|frame| frame.value.downcast_ref::<T>().cloned())
            .ok_or(ContextError::Missing {
                type_name: std::any::type_name::<T>(),
            })
    })
}

pub fn has_context<T: Clone + 'static>() -> bool {
    resolve::<T>().is_ok()
}

/// Look up the nearest provided `T`, failing fast if no ancestor provided one.
///
/// # Panics
///
/// Panics when `T` was never provided. That is a wiring mistake in the view
/// tree, not a condition callers are expected to recover from.
#[track_caller]
pub fn use_context<T: Clone + 'static>() -> T {
    match resolve::<T>() {
        Ok(value) => value,
        Err(err) => panic!("{err}"),
    }
}

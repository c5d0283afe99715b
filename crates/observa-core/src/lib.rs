//! # Stores, Bindings, and Context
//!
//! Observa is a small reactive core for declarative views. There are four
//! pieces:
//!
//! - `Store<T>`: a record whose field reads are tracked and whose field
//!   writes re-run exactly the observers that read that field.
//! - `remember*`: state owned by a mounted component, released on unmount.
//! - `Binding<V>`: a get/set pair that lets a child write a parent's field.
//! - `with_context` / `use_context`: values visible to a whole subtree.
//!
//! ## Stores
//!
//! ```rust
//! use observa_core::*;
//!
//! #[derive(Default)]
//! struct Flags {
//!     on: bool,
//! }
//!
//! impl Flags {
//!     const ON: Field<Flags, bool> = field!(Flags, on);
//! }
//!
//! let flags = Store::new(Flags::default());
//! let switch = flags.binding(Flags::ON);
//! switch.toggle();
//! assert!(flags.get(Flags::ON));
//! ```
//!
//! Derived values are plain functions over a store; they are recomputed on
//! every read and never cached.
//!
//! ## Components
//!
//! ```rust
//! use observa_core::*;
//!
//! #[derive(Default)]
//! struct Clicks {
//!     n: u32,
//! }
//!
//! impl Clicks {
//!     const N: Field<Clicks, u32> = field!(Clicks, n);
//! }
//!
//! let clicks = Store::new(Clicks::default());
//! let mut evaluator = Evaluator::new();
//! evaluator.mount(Component::new("Label", {
//!     let clicks = clicks.clone();
//!     move || View::new(ViewKind::Text {
//!         text: format!("clicked {}", clicks.get(Clicks::N)),
//!     })
//! }));
//!
//! clicks.update(Clicks::N, |n| *n += 1);
//! let frame = evaluator.frame();
//! assert_eq!(frame.texts().next().map(|(t, _)| t), Some("clicked 1"));
//! ```
//!
//! The evaluator re-renders a component whenever a field it read during its
//! previous render is written. Widgets live in `observa-ui`.

pub mod animation;
pub mod binding;
pub mod color;
pub mod entropy;
pub mod error;
pub mod evaluator;
pub mod locals;
pub mod prelude;
pub mod reactive;
pub mod runtime;
pub mod scope;
pub mod store;
pub mod view;

pub use animation::*;
pub use binding::*;
pub use color::*;
pub use entropy::*;
pub use error::*;
pub use evaluator::*;
pub use locals::*;
pub use runtime::*;
pub use scope::*;
pub use store::*;
pub use view::*;

pub use crate::animation::{AnimationSpec, Easing, ManualClock, with_animation, with_animation_spec};
pub use crate::binding::Binding;
pub use crate::color::Color;
pub use crate::entropy::Entropy;
pub use crate::error::{ContextError, DispatchError};
pub use crate::evaluator::Evaluator;
pub use crate::field;
pub use crate::locals::{resolve, use_context, with_context};
pub use crate::runtime::{remember, remember_store, remember_store_with_key, remember_with_key};
pub use crate::scope::{Scope, on_dispose};
pub use crate::store::{Field, Store};
pub use crate::view::{
    Component, Font, FontWeight, Frame, Interaction, SheetState, TextStyle, View, ViewKind,
};

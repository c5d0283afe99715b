#![allow(non_snake_case)]
//! Widgets and modal presentation.
//!
//! Constructors are plain functions returning a [`View`] description:
//!
//! ```rust
//! use observa_core::*;
//! use observa_ui::*;
//!
//! let view = Column(vec![
//!     Text("Counter").font(Font::Title).bold(),
//!     Button("Reset", || log::info!("reset")),
//! ]);
//! assert_eq!(view.children.len(), 2);
//! ```
//!
//! `Sheet` and `Alert` read their `Binding<bool>` while the calling component
//! renders, so toggling the bound field re-renders that component.

use std::rc::Rc;

use observa_core::locals::ContextFrame;
use observa_core::*;

pub fn Column(children: Vec<View>) -> View {
    View::new(ViewKind::Column).with_children(children)
}

pub fn Text(text: impl Into<String>) -> View {
    View::new(ViewKind::Text { text: text.into() })
}

pub fn Button(label: impl Into<String>, on_tap: impl Fn() + 'static) -> View {
    View::new(ViewKind::Button {
        label: label.into(),
        on_tap: Rc::new(on_tap),
    })
}

/// Unbounded +/- control over an integer binding.
pub fn Stepper(label: impl Into<String>, value: Binding<i64>) -> View {
    View::new(ViewKind::Stepper {
        label: label.into(),
        value,
        step: 1,
    })
}

/// Give `child` a fraction of the available height. Changes made inside
/// `with_animation` transition smoothly.
pub fn Frame(height_fraction: f32, child: View) -> View {
    View::new(ViewKind::Frame { height_fraction }).child(child)
}

/// Modal sheet bound to `presented`; `content` is only built while shown.
pub fn Sheet(presented: Binding<bool>, content: impl FnOnce() -> View) -> View {
    let shown = presented.get();
    let mut sheet = View::new(ViewKind::Sheet {
        presented: shown,
        binding: presented,
        detent: 1.0,
        interactive_dismiss: true,
    });
    if shown {
        sheet = sheet.child(content());
    }
    sheet
}

pub fn AlertButton(label: impl Into<String>, on_tap: impl Fn() + 'static) -> AlertAction {
    AlertAction {
        label: label.into(),
        on_tap: Rc::new(on_tap),
    }
}

/// Attach an alert to `content`. Tapping any action runs it and then
/// dismisses the alert.
pub fn Alert(
    title: impl Into<String>,
    presented: Binding<bool>,
    actions: Vec<AlertAction>,
    content: View,
) -> View {
    let shown = presented.get();
    View::new(ViewKind::Alert {
        title: title.into(),
        presented: shown,
        binding: presented,
        actions,
    })
    .child(content)
}

/// Make `value` resolvable by type from every component inside `child`.
pub fn Provide<T: Clone + 'static>(value: T, child: View) -> View {
    View::new(ViewKind::Provider(Rc::new(ContextFrame::new(value)))).child(child)
}

pub trait ViewExt: Sized {
    fn font(self, font: Font) -> Self;
    fn bold(self) -> Self;
    fn foreground(self, color: Color) -> Self;
    /// Height of a sheet as a fraction of the screen.
    fn presentation_detent(self, fraction: f32) -> Self;
    fn interactive_dismiss_disabled(self, disabled: bool) -> Self;
}

impl ViewExt for View {
    fn font(mut self, font: Font) -> Self {
        self.style.font = font;
        self
    }

    fn bold(mut self) -> Self {
        self.style.weight = FontWeight::Bold;
        self
    }

    fn foreground(mut self, color: Color) -> Self {
        self.style.color = Some(color);
        self
    }

    fn presentation_detent(mut self, fraction: f32) -> Self {
        if let ViewKind::Sheet { detent, .. } = &mut self.kind {
            *detent = fraction.clamp(0.0, 1.0);
        } else {
            log::warn!("presentation_detent only applies to sheets");
        }
        self
    }

    fn interactive_dismiss_disabled(mut self, disabled: bool) -> Self {
        if let ViewKind::Sheet {
            interactive_dismiss,
            ..
        } = &mut self.kind
        {
            *interactive_dismiss = !disabled;
        } else {
            log::warn!("interactive_dismiss_disabled only applies to sheets");
        }
        self
    }
}

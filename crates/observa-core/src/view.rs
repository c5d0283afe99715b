use std::fmt;
use std::rc::Rc;

use crate::locals::ContextFrame;
use crate::{Binding, Color};

pub type Callback = Rc<dyn Fn()>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Font {
    #[default]
    Body,
    Title,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub weight: FontWeight,
    pub color: Option<Color>,
}

#[derive(Clone)]
pub struct AlertAction {
    pub label: String,
    pub on_tap: Callback,
}

impl fmt::Debug for AlertAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertAction")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// A re-render boundary: owns an observer, a scope and its remembered state
/// once mounted.
///
/// When the parent re-renders, a child with the same identity keeps its
/// mounted state and renders again with the new closure. Between parent
/// renders, its own reads decide when it renders.
#[derive(Clone)]
pub struct Component {
    pub name: &'static str,
    pub key: Option<String>,
    render: Rc<dyn Fn() -> View>,
}

impl Component {
    pub fn new(name: &'static str, render: impl Fn() -> View + 'static) -> Self {
        Self {
            name,
            key: None,
            render: Rc::new(render),
        }
    }

    pub fn keyed(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub(crate) fn render(&self) -> View {
        (self.render)()
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub enum ViewKind {
    Column,
    Text {
        text: String,
    },
    Button {
        label: String,
        on_tap: Callback,
    },
    Stepper {
        label: String,
        value: Binding<i64>,
        step: i64,
    },
    /// Sizes its children to a fraction of the available height.
    Frame {
        height_fraction: f32,
    },
    /// Modal sheet. Children are the content and are only present while
    /// `presented` is true. A swipe dismiss writes `false` through `binding`
    /// unless `interactive_dismiss` is off.
    Sheet {
        presented: bool,
        binding: Binding<bool>,
        detent: f32,
        interactive_dismiss: bool,
    },
    Alert {
        title: String,
        presented: bool,
        binding: Binding<bool>,
        actions: Vec<AlertAction>,
    },
    Provider(Rc<ContextFrame>),
    Component(Component),
}

impl fmt::Debug for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewKind::Column => write!(f, "Column"),
            ViewKind::Text { text } => f.debug_struct("Text").field("text", text).finish(),
            ViewKind::Button { label, .. } => f
                .debug_struct("Button")
                .field("label", label)
                .field("on_tap", &"<callback>")
                .finish(),
            ViewKind::Stepper { label, step, .. } => f
                .debug_struct("Stepper")
                .field("label", label)
                .field("step", step)
                .finish_non_exhaustive(),
            ViewKind::Frame { height_fraction } => f
                .debug_struct("Frame")
                .field("height_fraction", height_fraction)
                .finish(),
            ViewKind::Sheet {
                presented, detent, ..
            } => f
                .debug_struct("Sheet")
                .field("presented", presented)
                .field("detent", detent)
                .finish_non_exhaustive(),
            ViewKind::Alert {
                title,
                presented,
                actions,
                ..
            } => f
                .debug_struct("Alert")
                .field("title", title)
                .field("presented", presented)
                .field("actions", actions)
                .finish_non_exhaustive(),
            ViewKind::Provider(frame) => f.debug_tuple("Provider").field(frame).finish(),
            ViewKind::Component(c) => f.debug_tuple("Component").field(c).finish(),
        }
    }
}

/// Description of desired output, produced by a component's render.
#[derive(Clone, Debug)]
pub struct View {
    pub kind: ViewKind,
    pub style: TextStyle,
    pub children: Vec<View>,
}

impl View {
    pub fn new(kind: ViewKind) -> Self {
        Self {
            kind,
            style: TextStyle::default(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<View>) -> Self {
        self.children = children;
        self
    }

    pub fn child(mut self, child: View) -> Self {
        self.children.push(child);
        self
    }
}

impl From<Component> for View {
    fn from(c: Component) -> Self {
        View::new(ViewKind::Component(c))
    }
}

/// Which modal layer a node belongs to. Only the topmost presented layer
/// receives interactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Base,
    Sheet,
    Alert,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SheetState {
    Hidden,
    Shown,
}

/// User input addressed by label. Labels match by prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Interaction {
    /// Buttons and alert actions.
    Tap(String),
    Increment(String),
    Decrement(String),
    /// Swipe down on the topmost presented sheet.
    Dismiss,
}

impl Interaction {
    pub fn tap(label: impl Into<String>) -> Self {
        Interaction::Tap(label.into())
    }

    pub fn increment(label: impl Into<String>) -> Self {
        Interaction::Increment(label.into())
    }

    pub fn decrement(label: impl Into<String>) -> Self {
        Interaction::Decrement(label.into())
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Interaction::Tap(l) | Interaction::Increment(l) | Interaction::Decrement(l) => Some(l),
            Interaction::Dismiss => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Component {
        name: &'static str,
    },
    Column,
    Text {
        text: String,
        style: TextStyle,
    },
    Button {
        label: String,
    },
    Stepper {
        label: String,
        value: i64,
    },
    Frame {
        target: f32,
        current: f32,
    },
    Sheet {
        state: SheetState,
        detent: f32,
        interactive_dismiss: bool,
    },
    Alert {
        title: String,
        actions: Vec<String>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrameNode {
    pub depth: usize,
    pub layer: Layer,
    pub interactive: bool,
    pub kind: NodeKind,
}

/// Output of the evaluator at one instant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub nodes: Vec<FrameNode>,
}

impl Frame {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn sheet_state(&self) -> SheetState {
        let shown = self.nodes.iter().any(|n| {
            matches!(
                n.kind,
                NodeKind::Sheet {
                    state: SheetState::Shown,
                    ..
                }
            )
        });
        if shown {
            SheetState::Shown
        } else {
            SheetState::Hidden
        }
    }

    /// Title of the presented alert, if one is up.
    pub fn alert(&self) -> Option<&str> {
        self.nodes.iter().find_map(|n| match &n.kind {
            NodeKind::Alert { title, .. } => Some(title.as_str()),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = (&str, &TextStyle)> {
        self.nodes.iter().filter_map(|n| match &n.kind {
            NodeKind::Text { text, style } => Some((text.as_str(), style)),
            _ => None,
        })
    }

    pub fn buttons(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter_map(|n| match &n.kind {
            NodeKind::Button { label } => Some(label.as_str()),
            _ => None,
        })
    }

    /// Current (possibly mid-animation) height fractions, in tree order.
    pub fn frame_heights(&self) -> Vec<f32> {
        self.nodes
            .iter()
            .filter_map(|n| match n.kind {
                NodeKind::Frame { current, .. } => Some(current),
                _ => None,
            })
            .collect()
    }
}

//! View tree evaluator.
//!
//! Every mounted [`Component`] owns one observer. Rendering runs the
//! component's render closure under that observer, so the stores fields it
//! reads decide when it renders again. A write re-renders the components
//! that read the written field. Children of a re-rendered component keep
//! their mounted state and render again with the closure their parent just
//! produced; components outside that subtree are left alone.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use web_time::Instant;

use crate::animation::{AnimatedValue, Clock, SystemClock, current_animation};
use crate::error::DispatchError;
use crate::locals::{self, ContextChain};
use crate::reactive::{self, ObserverId};
use crate::scope::Scope;
use crate::view::{
    Callback, Component, Frame, FrameNode, Interaction, Layer, NodeKind, SheetState, View,
    ViewKind,
};
use crate::Binding;

struct Shared {
    clock: Rc<dyn Clock>,
    next_id: Cell<u64>,
    render_counts: RefCell<HashMap<&'static str, usize>>,
}

impl Shared {
    fn id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}

struct Mounted {
    id: u64,
    name: &'static str,
    identity: String,
    component: RefCell<Component>,
    chain: RefCell<ContextChain>,
    scope: Scope,
    observer: Cell<Option<ObserverId>>,
    output: RefCell<Option<View>>,
    children: RefCell<Vec<Rc<Mounted>>>,
    // one per `Frame` node of `output`, in tree order
    transitions: RefCell<Vec<AnimatedValue<f32>>>,
    shared: Rc<Shared>,
}

struct Reconcile {
    previous: Vec<Rc<Mounted>>,
    next: Vec<Rc<Mounted>>,
    ordinals: HashMap<&'static str, usize>,
    transitions: Vec<AnimatedValue<f32>>,
    frame_index: usize,
    now: Instant,
}

impl Mounted {
    fn mount(
        component: Component,
        identity: String,
        chain: ContextChain,
        shared: &Rc<Shared>,
    ) -> Rc<Self> {
        let mounted = Rc::new(Self {
            id: shared.id(),
            name: component.name,
            identity,
            component: RefCell::new(component),
            chain: RefCell::new(chain),
            scope: Scope::new(),
            observer: Cell::new(None),
            output: RefCell::new(None),
            children: RefCell::new(Vec::new()),
            transitions: RefCell::new(Vec::new()),
            shared: shared.clone(),
        });

        let weak = Rc::downgrade(&mounted);
        let observer = reactive::new_observer(move || {
            if let Some(m) = weak.upgrade() {
                m.render();
            }
        });
        mounted.observer.set(Some(observer));
        mounted
            .scope
            .add_disposer(move || reactive::remove_observer(observer));

        log::debug!("mount {}#{} ({})", mounted.name, mounted.id, mounted.identity);
        reactive::run_observer_now(observer);
        mounted
    }

    // Runs as the body of this component's observer.
    fn render(self: &Rc<Self>) {
        if self.scope.is_disposed() {
            return;
        }
        let component = self.component.borrow().clone();
        let chain = self.chain.borrow().clone();
        let view = locals::with_chain(&chain, || self.scope.compose(|| component.render()));

        *self
            .shared
            .render_counts
            .borrow_mut()
            .entry(self.name)
            .or_default() += 1;
        log::debug!("render {}#{}", self.name, self.id);

        self.reconcile(&view, chain);
        *self.output.borrow_mut() = Some(view);
    }

    fn reconcile(&self, view: &View, mut chain: ContextChain) {
        let mut pass = Reconcile {
            previous: self.children.take(),
            next: Vec::new(),
            ordinals: HashMap::new(),
            transitions: self.transitions.take(),
            frame_index: 0,
            now: self.shared.clock.now(),
        };
        self.walk(view, &mut chain, &mut pass);

        for stale in pass.previous.drain(..) {
            stale.dispose();
        }
        pass.transitions.truncate(pass.frame_index);
        *self.children.borrow_mut() = pass.next;
        *self.transitions.borrow_mut() = pass.transitions;
    }

    fn walk(&self, view: &View, chain: &mut ContextChain, pass: &mut Reconcile) {
        match &view.kind {
            ViewKind::Provider(frame) => {
                chain.push(frame.clone());
                for child in &view.children {
                    self.walk(child, chain, pass);
                }
                chain.pop();
                return;
            }
            ViewKind::Component(component) => {
                let ordinal = pass.ordinals.entry(component.name).or_insert(0);
                let identity = component
                    .key
                    .clone()
                    .unwrap_or_else(|| format!("#{ordinal}"));
                *ordinal += 1;

                let reused = pass
                    .previous
                    .iter()
                    .position(|m| m.name == component.name && m.identity == identity)
                    .map(|i| pass.previous.remove(i));
                let child = match reused {
                    Some(m) => {
                        *m.component.borrow_mut() = component.clone();
                        *m.chain.borrow_mut() = chain.clone();
                        // the new closure may capture new props
                        if let Some(observer) = m.observer.get() {
                            reactive::run_observer_now(observer);
                        }
                        m
                    }
                    None => Mounted::mount(component.clone(), identity, chain.clone(), &self.shared),
                };
                pass.next.push(child);
            }
            ViewKind::Frame { height_fraction } => {
                let target = *height_fraction;
                let index = pass.frame_index;
                pass.frame_index += 1;
                match pass.transitions.get_mut(index) {
                    Some(t) if *t.target() != target => match current_animation() {
                        Some(spec) => t.animate_to(target, spec, pass.now),
                        None => t.snap(target),
                    },
                    Some(_) => {}
                    None => pass.transitions.push(AnimatedValue::new(target)),
                }
            }
            _ => {}
        }
        for child in &view.children {
            self.walk(child, chain, pass);
        }
    }

    fn dispose(&self) {
        for child in self.children.take() {
            child.dispose();
        }
        self.output.take();
        self.transitions.take();
        self.scope.dispose();
        self.observer.set(None);
        log::debug!("unmount {}#{}", self.name, self.id);
    }

    fn settle(&self, now: Instant) -> bool {
        let mut running = false;
        for t in self.transitions.borrow_mut().iter_mut() {
            running |= t.settle(now);
        }
        for child in self.children.borrow().iter() {
            running |= child.settle(now);
        }
        running
    }

    fn collect(&self, depth: usize, layer: Layer, out: &mut Collect) {
        out.node(depth, layer, NodeKind::Component { name: self.name });
        let output = self.output.borrow();
        let Some(view) = output.as_ref() else {
            return;
        };
        let children = self.children.borrow();
        let transitions = self.transitions.borrow();
        let mut cursor = Cursor {
            components: children.iter(),
            transitions: transitions.iter(),
        };
        collect_view(view, depth + 1, layer, &mut cursor, out);
    }
}

struct Cursor<'a> {
    components: std::slice::Iter<'a, Rc<Mounted>>,
    transitions: std::slice::Iter<'a, AnimatedValue<f32>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TargetKind {
    Tap,
    Stepper,
    Dismiss,
}

#[derive(Clone)]
enum TargetAction {
    Tap(Callback),
    AlertAction {
        on_tap: Callback,
        presented: Binding<bool>,
    },
    Step {
        value: Binding<i64>,
        step: i64,
    },
    Dismiss {
        presented: Binding<bool>,
        allowed: bool,
    },
}

#[derive(Clone)]
struct Target {
    kind: TargetKind,
    layer: Layer,
    label: String,
    action: TargetAction,
}

struct Collect {
    nodes: Vec<FrameNode>,
    targets: Vec<Target>,
    now: Instant,
}

impl Collect {
    fn node(&mut self, depth: usize, layer: Layer, kind: NodeKind) {
        self.nodes.push(FrameNode {
            depth,
            layer,
            interactive: false,
            kind,
        });
    }

    fn active_layer(&self) -> Layer {
        self.nodes
            .iter()
            .filter_map(|n| match n.kind {
                NodeKind::Alert { .. } => Some(Layer::Alert),
                NodeKind::Sheet {
                    state: SheetState::Shown,
                    ..
                } => Some(Layer::Sheet),
                _ => None,
            })
            .max()
            .unwrap_or(Layer::Base)
    }
}

fn collect_children(view: &View, depth: usize, layer: Layer, cursor: &mut Cursor<'_>, out: &mut Collect) {
    for child in &view.children {
        collect_view(child, depth, layer, cursor, out);
    }
}

fn collect_view(view: &View, depth: usize, layer: Layer, cursor: &mut Cursor<'_>, out: &mut Collect) {
    match &view.kind {
        ViewKind::Column => {
            out.node(depth, layer, NodeKind::Column);
            collect_children(view, depth + 1, layer, cursor, out);
        }
        ViewKind::Text { text } => {
            out.node(
                depth,
                layer,
                NodeKind::Text {
                    text: text.clone(),
                    style: view.style,
                },
            );
        }
        ViewKind::Button { label, on_tap } => {
            out.node(depth, layer, NodeKind::Button { label: label.clone() });
            out.targets.push(Target {
                kind: TargetKind::Tap,
                layer,
                label: label.clone(),
                action: TargetAction::Tap(on_tap.clone()),
            });
        }
        ViewKind::Stepper { label, value, step } => {
            out.node(
                depth,
                layer,
                NodeKind::Stepper {
                    label: label.clone(),
                    value: value.get(),
                },
            );
            out.targets.push(Target {
                kind: TargetKind::Stepper,
                layer,
                label: label.clone(),
                action: TargetAction::Step {
                    value: value.clone(),
                    step: *step,
                },
            });
        }
        ViewKind::Frame { height_fraction } => {
            let (target, current) = match cursor.transitions.next() {
                Some(t) => (*t.target(), t.value_at(out.now)),
                None => (*height_fraction, *height_fraction),
            };
            out.node(depth, layer, NodeKind::Frame { target, current });
            collect_children(view, depth + 1, layer, cursor, out);
        }
        ViewKind::Sheet {
            presented,
            binding,
            detent,
            interactive_dismiss,
        } => {
            let state = if *presented {
                SheetState::Shown
            } else {
                SheetState::Hidden
            };
            out.node(
                depth,
                layer,
                NodeKind::Sheet {
                    state,
                    detent: *detent,
                    interactive_dismiss: *interactive_dismiss,
                },
            );
            let content_layer = layer.max(Layer::Sheet);
            if *presented {
                out.targets.push(Target {
                    kind: TargetKind::Dismiss,
                    layer: content_layer,
                    label: String::new(),
                    action: TargetAction::Dismiss {
                        presented: binding.clone(),
                        allowed: *interactive_dismiss,
                    },
                });
            }
            collect_children(view, depth + 1, content_layer, cursor, out);
        }
        ViewKind::Alert {
            title,
            presented,
            binding,
            actions,
        } => {
            if *presented {
                out.node(
                    depth,
                    Layer::Alert,
                    NodeKind::Alert {
                        title: title.clone(),
                        actions: actions.iter().map(|a| a.label.clone()).collect(),
                    },
                );
                for action in actions {
                    out.targets.push(Target {
                        kind: TargetKind::Tap,
                        layer: Layer::Alert,
                        label: action.label.clone(),
                        action: TargetAction::AlertAction {
                            on_tap: action.on_tap.clone(),
                            presented: binding.clone(),
                        },
                    });
                }
            }
            collect_children(view, depth, layer, cursor, out);
        }
        ViewKind::Provider(_) => collect_children(view, depth, layer, cursor, out),
        ViewKind::Component(_) => {
            if let Some(child) = cursor.components.next() {
                child.collect(depth, layer, out);
            }
        }
    }
}

// The innermost presented sheet takes the swipe.
fn dismiss_sheet(targets: &[Target], active: Layer) -> Result<(), DispatchError> {
    let Some(target) = targets.iter().rev().find(|t| t.kind == TargetKind::Dismiss) else {
        return Err(DispatchError::NoSheet);
    };
    if target.layer != active {
        return Err(DispatchError::Blocked {
            label: "sheet".to_string(),
            active,
        });
    }
    match &target.action {
        TargetAction::Dismiss { allowed: false, .. } => Err(DispatchError::DismissDisabled),
        TargetAction::Dismiss { presented, .. } => {
            log::debug!("dispatch Dismiss -> sheet");
            let presented = presented.clone();
            presented.set(false);
            Ok(())
        }
        _ => Err(DispatchError::NoSheet),
    }
}

/// Mounts a root component and keeps its tree up to date.
pub struct Evaluator {
    shared: Rc<Shared>,
    root: Option<Rc<Mounted>>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_clock(Rc::new(SystemClock))
    }

    pub fn with_clock(clock: Rc<dyn Clock>) -> Self {
        Self {
            shared: Rc::new(Shared {
                clock,
                next_id: Cell::new(1),
                render_counts: RefCell::new(HashMap::new()),
            }),
            root: None,
        }
    }

    /// Mount `root`, replacing whatever was mounted. Context provided around
    /// this call is visible to the whole tree.
    pub fn mount(&mut self, root: Component) {
        self.unmount();
        let identity = root.key.clone().unwrap_or_else(|| "#0".to_string());
        let chain = locals::current_chain();
        self.root = Some(Mounted::mount(root, identity, chain, &self.shared));
    }

    pub fn unmount(&mut self) {
        if let Some(root) = self.root.take() {
            root.dispose();
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.root.is_some()
    }

    pub fn frame(&self) -> Frame {
        self.snapshot().0
    }

    fn snapshot(&self) -> (Frame, Vec<Target>, Layer) {
        let mut out = Collect {
            nodes: Vec::new(),
            targets: Vec::new(),
            now: self.shared.clock.now(),
        };
        if let Some(root) = &self.root {
            reactive::untracked(|| root.collect(0, Layer::Base, &mut out));
        }
        let active = out.active_layer();
        for node in &mut out.nodes {
            let actionable = matches!(
                node.kind,
                NodeKind::Button { .. } | NodeKind::Stepper { .. } | NodeKind::Alert { .. }
            );
            node.interactive = actionable && node.layer == active;
        }
        (Frame { nodes: out.nodes }, out.targets, active)
    }

    /// Deliver one user interaction to the topmost presented layer.
    pub fn dispatch(&self, interaction: &Interaction) -> Result<(), DispatchError> {
        if self.root.is_none() {
            return Err(DispatchError::NotMounted);
        }
        let (_, targets, active) = self.snapshot();
        let (kind, kind_name, label) = match interaction {
            Interaction::Tap(label) => (TargetKind::Tap, "button", label.as_str()),
            Interaction::Increment(label) | Interaction::Decrement(label) => {
                (TargetKind::Stepper, "stepper", label.as_str())
            }
            Interaction::Dismiss => return dismiss_sheet(&targets, active),
        };
        let candidates: Vec<&Target> = targets
            .iter()
            .filter(|t| t.kind == kind && t.label.starts_with(label))
            .collect();
        if candidates.is_empty() {
            return Err(DispatchError::NoTarget {
                kind: kind_name,
                label: label.to_string(),
            });
        }
        let Some(target) = candidates.into_iter().find(|t| t.layer == active) else {
            log::debug!("dispatch {interaction:?} blocked by {active:?} layer");
            return Err(DispatchError::Blocked {
                label: label.to_string(),
                active,
            });
        };

        log::debug!("dispatch {interaction:?} -> \"{}\"", target.label);
        let action = target.action.clone();
        drop(targets);
        match action {
            TargetAction::Tap(on_tap) => on_tap(),
            TargetAction::AlertAction { on_tap, presented } => {
                on_tap();
                if reactive::untracked(|| presented.get()) {
                    presented.set(false);
                }
            }
            TargetAction::Step { value, step } => {
                let delta = match interaction {
                    Interaction::Decrement(_) => -step,
                    _ => step,
                };
                value.update(|v| *v = v.saturating_add(delta));
            }
            TargetAction::Dismiss { presented, .. } => presented.set(false),
        }
        Ok(())
    }

    /// Finish elapsed animations. Returns whether any is still running.
    pub fn advance(&self) -> bool {
        let now = self.shared.clock.now();
        self.root.as_ref().is_some_and(|root| root.settle(now))
    }

    /// How many times components named `name` have rendered.
    pub fn render_count(&self, name: &str) -> usize {
        self.shared
            .render_counts
            .borrow()
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    pub fn reset_render_counts(&self) {
        self.shared.render_counts.borrow_mut().clear();
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Evaluator {
    fn drop(&mut self) {
        self.unmount();
    }
}

use std::cell::Cell;
use std::rc::Rc;

use web_time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    pub fn interpolate(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationSpec {
    pub duration: Duration,
    pub easing: Easing,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(300),
            easing: Easing::EaseInOut,
        }
    }
}

impl AnimationSpec {
    pub fn tween(duration: Duration, easing: Easing) -> Self {
        Self { duration, easing }
    }

    pub fn fast() -> Self {
        Self::tween(Duration::from_millis(150), Easing::EaseOut)
    }
}

thread_local! {
    static TRANSACTION: Cell<Option<AnimationSpec>> = const { Cell::new(None) };
}

/// Run `f`; size changes caused by its mutations animate with the default spec.
pub fn with_animation<R>(f: impl FnOnce() -> R) -> R {
    with_animation_spec(AnimationSpec::default(), f)
}

pub fn with_animation_spec<R>(spec: AnimationSpec, f: impl FnOnce() -> R) -> R {
    struct Restore(Option<AnimationSpec>);
    impl Drop for Restore {
        fn drop(&mut self) {
            let prev = self.0;
            let _ = TRANSACTION.try_with(|t| t.set(prev));
        }
    }
    let _restore = Restore(TRANSACTION.with(|t| t.replace(Some(spec))));
    f()
}

/// The animation requested by the innermost enclosing `with_animation`, if any.
pub fn current_animation() -> Option<AnimationSpec> {
    TRANSACTION.with(Cell::get)
}

pub trait Interpolate {
    fn interpolate(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

// Animation clock
pub trait Clock: 'static {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Clone)]
pub struct ManualClock {
    t: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            t: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.t.set(self.t.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.t.get()
    }
}

/// Value that moves from `start` to `target` over `spec.duration`.
///
/// The current value is a pure function of the clock reading, so sampling it
/// never mutates the animation.
#[derive(Clone, Debug)]
pub struct AnimatedValue<T: Interpolate + Clone> {
    start: T,
    target: T,
    spec: AnimationSpec,
    started: Option<Instant>,
}

impl<T: Interpolate + Clone> AnimatedValue<T> {
    pub fn new(initial: T) -> Self {
        Self {
            start: initial.clone(),
            target: initial,
            spec: AnimationSpec::default(),
            started: None,
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// Jump to `target` without animating.
    pub fn snap(&mut self, target: T) {
        self.start = target.clone();
        self.target = target;
        self.started = None;
    }

    /// Retarget from wherever the value is at `now`.
    pub fn animate_to(&mut self, target: T, spec: AnimationSpec, now: Instant) {
        self.start = self.value_at(now);
        self.target = target;
        self.spec = spec;
        self.started = Some(now);
    }

    pub fn value_at(&self, now: Instant) -> T {
        let Some(started) = self.started else {
            return self.target.clone();
        };
        let elapsed = now.saturating_duration_since(started);
        if elapsed >= self.spec.duration {
            return self.target.clone();
        }
        let t = elapsed.as_secs_f32() / self.spec.duration.as_secs_f32();
        self.start
            .interpolate(&self.target, self.spec.easing.interpolate(t))
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.started
            .is_some_and(|s| now.saturating_duration_since(s) < self.spec.duration)
    }

    /// Drop finished animations; returns whether this one is still running.
    pub fn settle(&mut self, now: Instant) -> bool {
        if self.started.is_some() && !self.is_animating(now) {
            self.snap(self.target.clone());
        }
        self.started.is_some()
    }
}

//! Frame-driven animatable values.
//!
//! An [`Animatable`] owns one continuous value. Gesture code writes it with
//! [`Animatable::snap_to`]; transitions move it with [`Animatable::animate_to`]
//! one frame at a time through the runtime's [`FrameClock`]. Completion
//! callbacks are best-effort: dropping the last handle drops them unseen.

use std::cell::RefCell;
use std::rc::Rc;

use swipekit_core::{FrameCallbackRegistration, FrameClock};

use crate::spec::{AnimationSpec, AnimationType, SpringSpec};

/// Integration sub-step for spring physics (~60fps).
const SPRING_TIMESTEP_SECS: f32 = 0.016;

/// Trait for types that can be linearly interpolated.
pub trait Lerp {
    fn lerp(&self, target: &Self, fraction: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction
    }
}

/// Values that can be driven by a spring.
pub trait SpringScalar: Lerp + Clone {
    fn to_f32(&self) -> f32;

    /// Progress of `current` along `start → target`; 1.0 when the two ends coincide.
    fn spring_progress(start: &Self, target: &Self, current: &Self) -> f32 {
        let start_val = start.to_f32();
        let target_val = target.to_f32();
        if (target_val - start_val).abs() < f32::EPSILON {
            1.0
        } else {
            (current.to_f32() - start_val) / (target_val - start_val)
        }
    }

    fn is_near_target(current: &Self, target: &Self, threshold: f32) -> bool {
        (current.to_f32() - target.to_f32()).abs() < threshold
    }
}

impl SpringScalar for f32 {
    fn to_f32(&self) -> f32 {
        *self
    }
}

/// Why an animation's completion callback ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEndReason {
    /// The value reached its target.
    Finished,
    /// A new animation, `snap_to` or `stop` superseded this one.
    Interrupted,
}

type OnEnd = Box<dyn FnOnce(AnimationEndReason) + 'static>;

/// Shared handle to an animated value. Clones observe the same value.
pub struct Animatable<T: SpringScalar + 'static> {
    inner: Rc<RefCell<AnimatableInner<T>>>,
}

struct AnimatableInner<T: SpringScalar + 'static> {
    clock: FrameClock,
    current: T,
    /// Spring velocity in progress units per second.
    velocity: f32,
    start: T,
    target: T,
    animation_type: AnimationType,
    running: bool,
    start_time_nanos: Option<u64>,
    last_frame_nanos: Option<u64>,
    registration: Option<FrameCallbackRegistration>,
    on_end: Option<OnEnd>,
}

impl<T: SpringScalar + 'static> AnimatableInner<T> {
    /// Stops the running animation and hands back its callback, if any.
    fn interrupt(&mut self) -> Option<OnEnd> {
        if let Some(registration) = self.registration.take() {
            registration.cancel();
        }
        let was_running = std::mem::replace(&mut self.running, false);
        self.start_time_nanos = None;
        self.last_frame_nanos = None;
        self.velocity = 0.0;
        let on_end = self.on_end.take();
        if was_running {
            on_end
        } else {
            None
        }
    }

    fn settle(&mut self) {
        self.current = self.target.clone();
        self.start = self.target.clone();
        self.start_time_nanos = None;
        self.last_frame_nanos = None;
        self.velocity = 0.0;
        self.running = false;
    }

    /// Advances a tween; returns true once the target is reached.
    fn step_tween(&mut self, spec: AnimationSpec, frame_time_nanos: u64) -> bool {
        let start_time = *self.start_time_nanos.get_or_insert(frame_time_nanos);
        let elapsed_nanos = frame_time_nanos.saturating_sub(start_time);
        let duration_nanos = spec.duration_millis.saturating_mul(1_000_000).max(1);
        let linear_progress = (elapsed_nanos as f32 / duration_nanos as f32).clamp(0.0, 1.0);
        if linear_progress >= 1.0 {
            self.settle();
            return true;
        }
        let eased = spec.easing.transform(linear_progress);
        self.current = self.start.lerp(&self.target, eased);
        false
    }

    /// Advances a spring by the time since the previous frame.
    fn step_spring(&mut self, spec: SpringSpec, frame_time_nanos: u64) -> bool {
        let Some(previous) = self.last_frame_nanos.replace(frame_time_nanos) else {
            // First frame only anchors the clock.
            return false;
        };
        let dt = frame_time_nanos.saturating_sub(previous) as f32 / 1_000_000_000.0;
        if dt <= 0.0 {
            return false;
        }

        let stiffness = spec.stiffness.max(f32::EPSILON);
        let damping = 2.0 * spec.damping_ratio * stiffness.sqrt();

        // Semi-implicit Euler in progress space, where the target sits at 1.0.
        let mut simulated = 0.0f32;
        while simulated < dt {
            let step = SPRING_TIMESTEP_SECS.min(dt - simulated);
            let progress = T::spring_progress(&self.start, &self.target, &self.current);
            let force = -stiffness * (progress - 1.0) - damping * self.velocity;
            self.velocity += force * step;
            let next = (progress + self.velocity * step).clamp(0.0, 2.0);
            self.current = self.start.lerp(&self.target, next);
            simulated += step;
        }

        let at_rest = self.velocity.abs() < spec.velocity_threshold;
        let near_target = T::is_near_target(&self.current, &self.target, spec.position_threshold);
        if at_rest && near_target {
            self.settle();
            true
        } else {
            false
        }
    }
}

impl<T: SpringScalar + 'static> Animatable<T> {
    pub fn new(initial: T, clock: FrameClock) -> Self {
        let inner = AnimatableInner {
            clock,
            current: initial.clone(),
            velocity: 0.0,
            start: initial.clone(),
            target: initial,
            animation_type: AnimationType::default(),
            running: false,
            start_time_nanos: None,
            last_frame_nanos: None,
            registration: None,
            on_end: None,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    pub fn value(&self) -> T {
        self.inner.borrow().current.clone()
    }

    pub fn target(&self) -> T {
        self.inner.borrow().target.clone()
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().running
    }

    /// Animates to `target` without a completion callback.
    pub fn animate_to(&self, target: T, animation: impl Into<AnimationType>) {
        self.start_animation(target, animation.into(), None);
    }

    /// Animates to `target` and calls `on_end` exactly once, unless every
    /// handle is dropped first.
    pub fn animate_to_then(
        &self,
        target: T,
        animation: impl Into<AnimationType>,
        on_end: impl FnOnce(AnimationEndReason) + 'static,
    ) {
        self.start_animation(target, animation.into(), Some(Box::new(on_end)));
    }

    /// Jumps to `value`, interrupting any running animation.
    pub fn snap_to(&self, value: T) {
        let interrupted = {
            let mut inner = self.inner.borrow_mut();
            let interrupted = inner.interrupt();
            inner.current = value.clone();
            inner.start = value.clone();
            inner.target = value;
            interrupted
        };
        if let Some(on_end) = interrupted {
            on_end(AnimationEndReason::Interrupted);
        }
    }

    /// Freezes the value where it is.
    pub fn stop(&self) {
        let interrupted = {
            let mut inner = self.inner.borrow_mut();
            let interrupted = inner.interrupt();
            inner.target = inner.current.clone();
            inner.start = inner.current.clone();
            interrupted
        };
        if let Some(on_end) = interrupted {
            on_end(AnimationEndReason::Interrupted);
        }
    }

    fn start_animation(&self, target: T, animation: AnimationType, on_end: Option<OnEnd>) {
        let interrupted = self.inner.borrow_mut().interrupt();
        if let Some(previous) = interrupted {
            previous(AnimationEndReason::Interrupted);
        }

        {
            let mut inner = self.inner.borrow_mut();
            inner.start = inner.current.clone();
            inner.target = target;
            inner.animation_type = animation;
            inner.running = true;
            inner.on_end = on_end;
        }
        Self::schedule_frame(&self.inner);
    }

    fn schedule_frame(this: &Rc<RefCell<AnimatableInner<T>>>) {
        let clock = {
            let inner = this.borrow();
            if inner.registration.is_some() {
                return;
            }
            inner.clock.clone()
        };
        let weak = Rc::downgrade(this);
        let registration = clock.with_frame_nanos(move |time| {
            if let Some(strong) = weak.upgrade() {
                Self::on_frame(&strong, time);
            }
        });
        if !registration.is_active() {
            log::debug!("runtime gone, animation cannot be scheduled");
        }
        this.borrow_mut().registration = Some(registration);
    }

    fn on_frame(this: &Rc<RefCell<AnimatableInner<T>>>, frame_time_nanos: u64) {
        let (schedule_next, finished) = {
            let mut inner = this.borrow_mut();
            inner.registration = None;
            if !inner.running {
                return;
            }
            let done = match inner.animation_type {
                AnimationType::Tween(spec) => inner.step_tween(spec, frame_time_nanos),
                AnimationType::Spring(spec) => inner.step_spring(spec, frame_time_nanos),
            };
            if done {
                (false, inner.on_end.take())
            } else {
                (true, None)
            }
        };

        if schedule_next {
            Self::schedule_frame(this);
        } else if let Some(on_end) = finished {
            on_end(AnimationEndReason::Finished);
        }
    }
}

impl<T: SpringScalar + 'static> Clone for Animatable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: SpringScalar + std::fmt::Debug + 'static> std::fmt::Debug for Animatable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Animatable")
            .field("current", &inner.current)
            .field("target", &inner.target)
            .field("running", &inner.running)
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;

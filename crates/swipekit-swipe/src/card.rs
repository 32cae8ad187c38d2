//! Per-card swipe state machine.
//!
//! A card follows the pointer while dragged. On release it either springs
//! back to rest or, once the drag reached the threshold, flies off screen
//! and reports the swipe direction on the main context exactly once.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use swipekit_animation::{Animatable, AnimationEndReason, AnimationSpec, Easing, SpringSpec};
use swipekit_core::RuntimeHandle;
use swipekit_foundation::{LayoutMeasurer, PanRelease};
use swipekit_ui_graphics::Point;

use crate::settings::SwipeSettings;
use crate::stack_layout::{CardTransform, StackLayout};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    /// Direction of a committed swipe; zero travel counts as left.
    pub fn from_dx(dx: f32) -> Self {
        if dx > 0.0 {
            SwipeDirection::Right
        } else {
            SwipeDirection::Left
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardState {
    Idle,
    Dragging,
    /// Springing back to rest after a release below the threshold.
    Resetting,
    /// Flying off screen; gestures are ignored.
    Exiting(SwipeDirection),
    /// Terminal. The outcome has been handed to the main context.
    Committing(SwipeDirection),
}

type OutcomeCallback = Box<dyn FnOnce(SwipeDirection) + 'static>;

/// Handle to one swipeable card. Clones share the same card.
#[derive(Clone)]
pub struct SwipeCard {
    inner: Rc<CardInner>,
}

struct CardInner {
    runtime: RuntimeHandle,
    settings: SwipeSettings,
    layout: StackLayout,
    x: Animatable<f32>,
    y: Animatable<f32>,
    state: Cell<CardState>,
    /// Axes still springing home during a reset.
    resetting_axes: Cell<u8>,
    measurer: Box<dyn LayoutMeasurer>,
    on_outcome: RefCell<Option<OutcomeCallback>>,
}

impl SwipeCard {
    pub fn new(
        runtime: &RuntimeHandle,
        settings: SwipeSettings,
        measurer: impl LayoutMeasurer + 'static,
    ) -> Self {
        let settings = settings.sanitized();
        let clock = runtime.frame_clock();
        Self {
            inner: Rc::new(CardInner {
                runtime: runtime.clone(),
                settings,
                layout: StackLayout::new(settings.style),
                x: Animatable::new(0.0, clock.clone()),
                y: Animatable::new(0.0, clock),
                state: Cell::new(CardState::Idle),
                resetting_axes: Cell::new(0),
                measurer: Box::new(measurer),
                on_outcome: RefCell::new(None),
            }),
        }
    }

    /// Sets the callback that receives the committed direction. It runs on
    /// the main context, at most once.
    pub fn set_on_outcome(&self, on_outcome: impl FnOnce(SwipeDirection) + 'static) {
        *self.inner.on_outcome.borrow_mut() = Some(Box::new(on_outcome));
    }

    pub fn settings(&self) -> SwipeSettings {
        self.inner.settings
    }

    pub fn state(&self) -> CardState {
        self.inner.state.get()
    }

    pub fn is_disabled(&self) -> bool {
        self.inner.settings.disabled
    }

    pub fn displacement(&self) -> Point {
        Point::new(self.inner.x.value(), self.inner.y.value())
    }

    /// `min(‖displacement‖ / threshold, 1)`.
    pub fn progress(&self) -> f32 {
        let distance = self.displacement().length();
        (distance / self.inner.settings.threshold).min(1.0)
    }

    pub fn on_drag_start(&self) {
        if !self.accepts_gestures() {
            return;
        }
        let inner = &self.inner;
        if inner.state.get() == CardState::Resetting {
            log::debug!("drag supersedes reset");
        }
        inner.resetting_axes.set(0);
        inner.state.set(CardState::Dragging);
        inner.x.stop();
        inner.y.stop();
    }

    /// Moves the card to the gesture translation. Starts the drag if no
    /// start was seen.
    pub fn on_drag_update(&self, dx: f32, dy: f32) {
        if !self.accepts_gestures() {
            return;
        }
        if self.inner.state.get() != CardState::Dragging {
            self.on_drag_start();
        }
        let translation = Point::new(dx, dy).finite_or_zero();
        self.inner.x.snap_to(translation.x);
        self.inner.y.snap_to(translation.y);
    }

    pub fn on_drag_end(&self, release: PanRelease) {
        if !self.accepts_gestures() {
            return;
        }
        let translation = release.translation.finite_or_zero();
        self.on_drag_update(translation.x, translation.y);

        if self.progress() < 1.0 {
            CardInner::start_reset(&self.inner);
            return;
        }

        let direction = SwipeDirection::from_dx(translation.x);
        let Some(bounds) = self.inner.measurer.measure() else {
            log::debug!("card not laid out at release, resetting instead of {direction:?}");
            CardInner::start_reset(&self.inner);
            return;
        };

        let local = release.position.finite_or_zero();
        let target = Point::new(
            (bounds.width + local.x) * sign(translation.x),
            (bounds.height + local.y) * sign(translation.y),
        );
        CardInner::start_exit(&self.inner, direction, target);
    }

    /// The platform aborted the gesture; behaves like a release below the
    /// threshold.
    pub fn on_drag_cancel(&self) {
        if !self.accepts_gestures() {
            return;
        }
        if matches!(self.inner.state.get(), CardState::Dragging) {
            CardInner::start_reset(&self.inner);
        }
    }

    /// Stack transform of this card at depth `position`, where
    /// `shared_progress` is the top card's progress.
    pub fn transform(&self, position: usize, shared_progress: f32) -> CardTransform {
        self.inner
            .layout
            .transform(shared_progress, position, self.displacement())
    }

    fn accepts_gestures(&self) -> bool {
        !self.inner.settings.disabled
            && !matches!(
                self.inner.state.get(),
                CardState::Exiting(_) | CardState::Committing(_)
            )
    }
}

impl CardInner {
    fn start_reset(this: &Rc<Self>) {
        this.state.set(CardState::Resetting);
        this.resetting_axes.set(2);
        let spring = SpringSpec::gentle();
        for axis in [&this.x, &this.y] {
            let weak = Rc::downgrade(this);
            axis.animate_to_then(0.0, spring, move |reason| {
                if let Some(card) = weak.upgrade() {
                    card.on_axis_reset(reason);
                }
            });
        }
    }

    fn on_axis_reset(&self, reason: AnimationEndReason) {
        if reason != AnimationEndReason::Finished || self.state.get() != CardState::Resetting {
            return;
        }
        let remaining = self.resetting_axes.get().saturating_sub(1);
        self.resetting_axes.set(remaining);
        if remaining == 0 {
            self.state.set(CardState::Idle);
            log::trace!("card back at rest");
        }
    }

    fn start_exit(this: &Rc<Self>, direction: SwipeDirection, target: Point) {
        log::debug!(
            "card exiting {direction:?} toward ({:.1}, {:.1})",
            target.x,
            target.y
        );
        this.state.set(CardState::Exiting(direction));
        let tween = AnimationSpec::tween(this.settings.exit_duration_millis, Easing::EaseInOutQuad);
        let weak: Weak<Self> = Rc::downgrade(this);
        this.x.animate_to_then(target.x, tween, move |reason| {
            if reason != AnimationEndReason::Finished {
                return;
            }
            if let Some(card) = weak.upgrade() {
                CardInner::commit(&card, direction);
            }
        });
        this.y.animate_to(target.y, tween);
    }

    fn commit(this: &Rc<Self>, direction: SwipeDirection) {
        this.state.set(CardState::Committing(direction));
        log::debug!("card committed {direction:?}");
        let weak = Rc::downgrade(this);
        this.runtime.post_main(move || {
            let Some(card) = weak.upgrade() else {
                return;
            };
            let on_outcome = card.on_outcome.borrow_mut().take();
            if let Some(on_outcome) = on_outcome {
                on_outcome(direction);
            }
        });
    }
}

impl std::fmt::Debug for SwipeCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwipeCard")
            .field("state", &self.state())
            .field("displacement", &self.displacement())
            .field("progress", &self.progress())
            .finish()
    }
}

/// Sign that maps zero to zero.
fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "tests/card_tests.rs"]
mod tests;

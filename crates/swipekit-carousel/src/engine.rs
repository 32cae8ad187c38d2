//! Vertical paged carousel with rubber-band edges.
//!
//! Position runs from 0 (first page) down to `-(N-1)·page_size` (last
//! page) and never leaves that range. Dragging past an edge feeds a
//! separate, bounded overshoot value instead. On release the carousel snaps
//! to a page, either the nearest one or, for a fast release, the page next
//! to the current one against the velocity.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use swipekit_animation::{Animatable, AnimationEndReason, AnimationSpec, Easing};
use swipekit_core::RuntimeHandle;
use swipekit_foundation::{
    interpolate_clamped, uniform_breakpoints, GestureOutcome, GestureSampler, PanEvent, PanPhase,
};

use crate::settings::CarouselSettings;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CarouselPhase {
    Idle,
    Dragging,
    Snapping,
}

/// Index tolerance for treating a position as resting on a page.
const PAGE_EPSILON: f32 = 1e-3;

type IndexCallback = Box<dyn FnMut(usize) + 'static>;

/// Handle to a carousel engine. Clones share the same engine.
#[derive(Clone)]
pub struct CarouselEngine {
    inner: Rc<CarouselInner>,
}

struct CarouselInner {
    runtime: RuntimeHandle,
    settings: CarouselSettings,
    page_count: Cell<usize>,
    position: Animatable<f32>,
    overshoot: Animatable<f32>,
    /// Position the current drag is measured from.
    initial_position: Cell<f32>,
    phase: Cell<CarouselPhase>,
    /// Page a running or interrupted snap is heading to.
    snap_target: Cell<Option<usize>>,
    /// Page the carousel last came to rest on.
    settled_index: Cell<usize>,
    sampler: RefCell<GestureSampler>,
    on_index_change: RefCell<Option<IndexCallback>>,
}

impl CarouselEngine {
    pub fn new(runtime: &RuntimeHandle, page_count: usize, settings: CarouselSettings) -> Self {
        let clock = runtime.frame_clock();
        Self {
            inner: Rc::new(CarouselInner {
                runtime: runtime.clone(),
                settings: settings.sanitized(),
                page_count: Cell::new(page_count),
                position: Animatable::new(0.0, clock.clone()),
                overshoot: Animatable::new(0.0, clock),
                initial_position: Cell::new(0.0),
                phase: Cell::new(CarouselPhase::Idle),
                snap_target: Cell::new(None),
                settled_index: Cell::new(0),
                sampler: RefCell::new(GestureSampler::new()),
                on_index_change: RefCell::new(None),
            }),
        }
    }

    /// Called on the main context whenever a snap settles on a new page.
    pub fn set_on_index_change(&self, callback: impl FnMut(usize) + 'static) {
        *self.inner.on_index_change.borrow_mut() = Some(Box::new(callback));
    }

    pub fn settings(&self) -> CarouselSettings {
        self.inner.settings
    }

    pub fn page_count(&self) -> usize {
        self.inner.page_count.get()
    }

    pub fn phase(&self) -> CarouselPhase {
        self.inner.phase.get()
    }

    pub fn position(&self) -> f32 {
        self.inner.position.value()
    }

    pub fn overshoot(&self) -> f32 {
        self.inner.overshoot.value()
    }

    /// Fractional page index derived from the position.
    pub fn animated_index(&self) -> f32 {
        self.inner.animated_index()
    }

    /// Whole page the position is currently on or past.
    pub fn current_index(&self) -> usize {
        self.inner.current_page()
    }

    pub fn settled_index(&self) -> usize {
        self.inner.settled_index.get()
    }

    /// Viewport height including overshoot.
    pub fn viewport_height(&self) -> f32 {
        self.inner.settings.page_size + self.overshoot()
    }

    /// Height of page `index`; the edge page stretches with the overshoot.
    pub fn page_height(&self, index: usize) -> f32 {
        let page_size = self.inner.settings.page_size;
        let overshoot = self.overshoot();
        let last = self.page_count().saturating_sub(1);
        if index == 0 && overshoot > 0.0 {
            page_size + overshoot
        } else if index == last && overshoot < 0.0 {
            page_size + overshoot
        } else {
            page_size
        }
    }

    pub fn on_drag_begin(&self) {
        if !self.inner.navigable() {
            return;
        }
        let inner = &self.inner;
        inner.phase.set(CarouselPhase::Dragging);
        inner.position.stop();
        inner.overshoot.stop();
        inner.initial_position.set(inner.position.value());
    }

    /// Applies the pan's vertical translation since it began.
    pub fn on_drag_update(&self, translation_y: f32) {
        if !self.inner.navigable() {
            return;
        }
        if self.phase() != CarouselPhase::Dragging {
            self.on_drag_begin();
        }
        let inner = &self.inner;
        let settings = &inner.settings;
        let translation_y = if translation_y.is_finite() {
            translation_y
        } else {
            0.0
        };

        let next = inner.initial_position.get() + translation_y;
        let clamped = next.clamp(inner.min_position(), 0.0);
        let limit = settings.page_size * settings.overshoot_factor;
        let overshoot = ((next - clamped) / settings.overshoot_weight).clamp(-limit, limit);

        inner.snap_target.set(None);
        inner.position.snap_to(clamped);
        inner.overshoot.snap_to(overshoot);
    }

    /// Snaps after release. `velocity_y` is in px/s, positive downward.
    pub fn on_drag_end(&self, velocity_y: f32) {
        if !self.inner.navigable() {
            return;
        }
        let velocity_y = if velocity_y.is_finite() {
            velocity_y
        } else {
            0.0
        };
        let animated = self.animated_index();
        let current = animated.trunc();
        let next = if velocity_y.abs() >= self.inner.settings.fast_swipe_threshold {
            current - velocity_y.signum()
        } else if animated - current > 0.5 {
            current + 1.0
        } else {
            current
        };
        let next = next.clamp(0.0, self.inner.last_index() as f32) as usize;
        log::debug!(
            "release at index {animated:.3} with velocity {velocity_y:.0}, snapping to {next}"
        );
        CarouselInner::snap_to_index(&self.inner, next);
    }

    /// Handles a tap at `y` inside the page. The top band goes back one
    /// page, the bottom band forward one. Returns the page navigated to.
    pub fn on_tap(&self, y: f32) -> Option<usize> {
        if !self.inner.navigable() || !y.is_finite() {
            return None;
        }
        let settings = &self.inner.settings;
        let band = settings.actions_area_factor * settings.page_size;
        let current = self.inner.current_page();
        let target = if y < band {
            current.checked_sub(1)
        } else if y > settings.page_size - band {
            Some(current + 1).filter(|&index| index <= self.inner.last_index())
        } else {
            None
        };

        match target {
            Some(index) => {
                CarouselInner::snap_to_index(&self.inner, index);
                Some(index)
            }
            None => {
                // A tap that began as a pan stopped the snap; resume it.
                if self.phase() == CarouselPhase::Dragging {
                    let resume = self
                        .inner
                        .snap_target
                        .get()
                        .map_or(current, |target| target.min(self.inner.last_index()));
                    CarouselInner::snap_to_index(&self.inner, resume);
                }
                None
            }
        }
    }

    pub fn animate_to_index(&self, index: usize) {
        if !self.inner.navigable() {
            return;
        }
        let index = index.min(self.inner.last_index());
        CarouselInner::snap_to_index(&self.inner, index);
    }

    /// Accessibility increment.
    pub fn scroll_forward(&self) -> bool {
        let current = self.inner.current_page();
        if !self.inner.navigable() || current >= self.inner.last_index() {
            return false;
        }
        CarouselInner::snap_to_index(&self.inner, current + 1);
        true
    }

    /// Accessibility decrement.
    pub fn scroll_backward(&self) -> bool {
        let current = self.inner.current_page();
        if !self.inner.navigable() || current == 0 {
            return false;
        }
        CarouselInner::snap_to_index(&self.inner, current - 1);
        true
    }

    /// Follows a change of the backing list.
    pub fn set_page_count(&self, page_count: usize) {
        let inner = &self.inner;
        if inner.page_count.replace(page_count) == page_count {
            return;
        }
        log::debug!("carousel page count now {page_count}");

        if page_count <= 1 {
            inner.phase.set(CarouselPhase::Idle);
            inner.snap_target.set(None);
            inner.position.snap_to(0.0);
            inner.overshoot.snap_to(0.0);
            inner.initial_position.set(0.0);
            inner.settled_index.set(0);
            return;
        }

        let last = inner.last_index();
        if inner.settled_index.get() > last {
            inner.settled_index.set(last);
        }
        let min = inner.min_position();
        inner
            .initial_position
            .set(inner.initial_position.get().max(min));
        match inner.snap_target.get() {
            Some(target) if target > last => CarouselInner::snap_to_index(inner, last),
            _ if inner.position.value() < min => {
                inner.position.snap_to(min);
                if inner.phase.get() == CarouselPhase::Snapping {
                    CarouselInner::snap_to_index(inner, last);
                }
            }
            _ => {}
        }
    }

    /// Routes one pan event through the gesture sampler.
    pub fn handle_pan(&self, event: PanEvent) {
        let outcome = self.inner.sampler.borrow_mut().handle(event);
        match event.phase {
            PanPhase::Begin => self.on_drag_begin(),
            PanPhase::Update => self.on_drag_update(event.translation.y),
            PanPhase::Cancel => self.on_drag_end(0.0),
            PanPhase::End => match outcome {
                Some(GestureOutcome::Pan(release)) => {
                    self.on_drag_update(release.translation.y);
                    self.on_drag_end(release.velocity.y);
                }
                Some(GestureOutcome::Tap(position)) => {
                    self.on_tap(position.y);
                }
                None => {}
            },
        }
    }
}

impl CarouselInner {
    fn navigable(&self) -> bool {
        self.page_count.get() > 1
    }

    fn last_index(&self) -> usize {
        self.page_count.get().saturating_sub(1)
    }

    fn min_position(&self) -> f32 {
        -(self.last_index() as f32) * self.settings.page_size
    }

    fn animated_index(&self) -> f32 {
        let count = self.page_count.get();
        if count <= 1 {
            return 0.0;
        }
        let input = uniform_breakpoints(count, self.settings.page_size);
        let output = uniform_breakpoints(count, 1.0);
        interpolate_clamped(self.position.value().abs(), &input, &output)
    }

    /// Page the position is on or past. Within `PAGE_EPSILON` of a page
    /// boundary the nearest page counts, so float error at rest cannot drop
    /// a page.
    fn current_page(&self) -> usize {
        let animated = self.animated_index();
        let nearest = animated.round();
        let page = if (animated - nearest).abs() < PAGE_EPSILON {
            nearest
        } else {
            animated.trunc()
        };
        (page as usize).min(self.last_index())
    }

    fn snap_to_index(this: &Rc<Self>, index: usize) {
        let target = -(index as f32) * this.settings.page_size;
        let duration = this.settings.duration_millis;
        this.phase.set(CarouselPhase::Snapping);
        this.snap_target.set(Some(index));

        this.overshoot.animate_to(
            0.0,
            AnimationSpec::tween(duration, Easing::EaseInOutCubic),
        );
        let weak = Rc::downgrade(this);
        this.position.animate_to_then(
            target,
            AnimationSpec::tween(duration, Easing::EaseInOutQuad),
            move |reason| {
                if let Some(inner) = weak.upgrade() {
                    CarouselInner::on_snap_end(&inner, index, reason);
                }
            },
        );
    }

    fn on_snap_end(this: &Rc<Self>, index: usize, reason: AnimationEndReason) {
        // Interrupted snaps re-anchor too, so the next drag starts from here.
        this.initial_position.set(this.position.value());
        if reason != AnimationEndReason::Finished {
            return;
        }
        this.phase.set(CarouselPhase::Idle);
        this.snap_target.set(None);
        if this.settled_index.replace(index) == index {
            return;
        }
        log::debug!("carousel settled on page {index}");
        Self::post_index_change(this, index);
    }

    fn post_index_change(this: &Rc<Self>, index: usize) {
        if this.on_index_change.borrow().is_none() {
            return;
        }
        let weak = Rc::downgrade(this);
        this.runtime.post_main(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let callback = inner.on_index_change.borrow_mut().take();
            if let Some(mut callback) = callback {
                callback(index);
                let mut slot = inner.on_index_change.borrow_mut();
                if slot.is_none() {
                    *slot = Some(callback);
                }
            }
        });
    }
}

impl std::fmt::Debug for CarouselEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarouselEngine")
            .field("page_count", &self.page_count())
            .field("phase", &self.phase())
            .field("position", &self.position())
            .field("overshoot", &self.overshoot())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;

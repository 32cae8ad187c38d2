//! Turns a raw pan stream into displacement, position and release velocity.

use swipekit_ui_graphics::Point;
use web_time::Instant;

use super::types::{GestureOutcome, PanEvent, PanPhase, PanRelease};
use crate::gesture_constants::{DRAG_THRESHOLD, MAX_FLING_VELOCITY};
use crate::velocity_tracker::VelocityTracker;

/// Samples one pointer on one gesture surface.
///
/// Events must be fed in arrival order. Timestamps come from the wall clock
/// unless the `*_at` variants are used.
#[derive(Debug, Clone, Default)]
pub struct GestureSampler {
    active: bool,
    origin: Option<Instant>,
    translation: Point,
    position: Point,
    max_travel: f32,
    tracker: VelocityTracker,
}

impl GestureSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Translation since the gesture began.
    pub fn translation(&self) -> Point {
        self.translation
    }

    /// Latest pointer position in local coordinates.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Furthest distance the pointer travelled from its start.
    pub fn travel(&self) -> f32 {
        self.max_travel
    }

    pub fn begin(&mut self, position: Point) {
        self.origin = Some(Instant::now());
        self.begin_at(position, 0);
    }

    pub fn begin_at(&mut self, position: Point, time_ms: i64) {
        let position = position.finite_or_zero();
        self.active = true;
        self.translation = Point::ZERO;
        self.position = position;
        self.max_travel = 0.0;
        self.tracker.reset();
        self.tracker.add_position(time_ms, Point::ZERO);
        log::trace!("pan began at ({:.1}, {:.1})", position.x, position.y);
    }

    pub fn update(&mut self, translation: Point, position: Point) {
        let time_ms = self.wall_clock_ms();
        self.update_at(translation, position, time_ms);
    }

    /// Records a move. An update without a preceding begin starts the
    /// gesture implicitly.
    pub fn update_at(&mut self, translation: Point, position: Point, time_ms: i64) {
        let translation = translation.finite_or_zero();
        let position = position.finite_or_zero();
        if !self.active {
            if self.origin.is_none() {
                self.origin = Some(Instant::now());
            }
            self.begin_at(position - translation, time_ms);
        }
        self.translation = translation;
        self.position = position;
        self.max_travel = self.max_travel.max(translation.length());
        self.tracker.add_position(time_ms, translation);
    }

    /// Finishes the gesture. A platform-supplied `velocity` wins over the
    /// tracked estimate.
    pub fn end(&mut self, velocity: Option<Point>) -> GestureOutcome {
        let tracked = self.tracker.velocity_with_max(MAX_FLING_VELOCITY);
        let velocity = velocity.map(Point::finite_or_zero).unwrap_or(tracked);
        let outcome = if self.max_travel < DRAG_THRESHOLD {
            GestureOutcome::Tap(self.position)
        } else {
            GestureOutcome::Pan(PanRelease::new(self.translation, self.position, velocity))
        };
        self.reset();
        outcome
    }

    pub fn cancel(&mut self) {
        self.reset();
    }

    /// Routes one platform event. Returns the outcome on `End`.
    pub fn handle(&mut self, event: PanEvent) -> Option<GestureOutcome> {
        match event.phase {
            PanPhase::Begin => {
                self.begin(event.position);
                None
            }
            PanPhase::Update => {
                self.update(event.translation, event.position);
                None
            }
            PanPhase::End => {
                self.update(event.translation, event.position);
                Some(self.end(event.velocity))
            }
            PanPhase::Cancel => {
                self.cancel();
                None
            }
        }
    }

    fn reset(&mut self) {
        self.active = false;
        self.origin = None;
        self.translation = Point::ZERO;
        self.max_travel = 0.0;
        self.tracker.reset();
    }

    fn wall_clock_ms(&self) -> i64 {
        self.origin
            .map(|origin| origin.elapsed().as_millis() as i64)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_travel_is_a_tap() {
        let mut sampler = GestureSampler::new();
        sampler.begin_at(Point::new(50.0, 20.0), 0);
        sampler.update_at(Point::new(2.0, 3.0), Point::new(52.0, 23.0), 16);
        let outcome = sampler.end(None);
        assert_eq!(outcome, GestureOutcome::Tap(Point::new(52.0, 23.0)));
        assert!(!sampler.is_active());
    }

    #[test]
    fn pan_release_carries_translation_position_and_velocity() {
        let mut sampler = GestureSampler::new();
        sampler.begin_at(Point::new(0.0, 0.0), 0);
        for step in 1..=4 {
            let offset = step as f32 * 40.0;
            sampler.update_at(Point::new(offset, 0.0), Point::new(offset, 0.0), step * 10);
        }

        let GestureOutcome::Pan(release) = sampler.end(None) else {
            panic!("expected a pan");
        };
        assert_eq!(release.translation, Point::new(160.0, 0.0));
        assert_eq!(release.position, Point::new(160.0, 0.0));
        assert!(release.velocity.x > 3_000.0, "got {:?}", release.velocity);
        assert_eq!(release.velocity.y, 0.0);
    }

    #[test]
    fn supplied_velocity_wins() {
        let mut sampler = GestureSampler::new();
        sampler.begin_at(Point::ZERO, 0);
        sampler.update_at(Point::new(0.0, -120.0), Point::new(0.0, -120.0), 10);
        let GestureOutcome::Pan(release) = sampler.end(Some(Point::new(0.0, -900.0))) else {
            panic!("expected a pan");
        };
        assert_eq!(release.velocity, Point::new(0.0, -900.0));
    }

    #[test]
    fn update_without_begin_starts_gesture() {
        let mut sampler = GestureSampler::new();
        sampler.update_at(Point::new(30.0, 0.0), Point::new(80.0, 10.0), 5);
        assert!(sampler.is_active());
        assert_eq!(sampler.translation(), Point::new(30.0, 0.0));
        assert_eq!(sampler.travel(), 30.0);
    }

    #[test]
    fn non_finite_input_is_sanitized() {
        let mut sampler = GestureSampler::new();
        sampler.begin_at(Point::ZERO, 0);
        sampler.update_at(Point::new(f32::NAN, 12.0), Point::new(1.0, f32::INFINITY), 8);
        assert_eq!(sampler.translation(), Point::new(0.0, 12.0));
        assert_eq!(sampler.position(), Point::new(1.0, 0.0));
    }

    #[test]
    fn cancel_discards_the_gesture() {
        let mut sampler = GestureSampler::new();
        sampler.handle(PanEvent::begin(Point::ZERO));
        sampler.handle(PanEvent::update(Point::new(40.0, 0.0), Point::new(40.0, 0.0)));
        sampler.handle(PanEvent::cancel());
        assert!(!sampler.is_active());
        assert_eq!(sampler.translation(), Point::ZERO);
    }
}

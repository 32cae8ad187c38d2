//! Release-velocity estimation from pointer samples.
//!
//! Uses the impulse strategy: each segment between two samples adds kinetic
//! energy, and the final energy is converted back into a velocity. This is
//! robust to the uneven sample spacing touch screens deliver.

use smallvec::SmallVec;
use swipekit_ui_graphics::Point;

/// Samples kept per axis.
const HISTORY_SIZE: usize = 20;

/// Samples older than this (relative to the newest) are ignored.
const HORIZON_MS: i64 = 100;

/// A gap this long between consecutive samples means the pointer had stopped.
pub const ASSUME_STOPPED_MS: i64 = 40;

#[derive(Clone, Copy, Debug, Default)]
struct Sample {
    time_ms: i64,
    value: f32,
}

/// Velocity estimator for one axis of absolute positions.
#[derive(Clone, Debug)]
pub struct VelocityTracker1D {
    samples: [Sample; HISTORY_SIZE],
    /// Slot the next sample is written to.
    head: usize,
    len: usize,
}

impl Default for VelocityTracker1D {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityTracker1D {
    pub fn new() -> Self {
        Self {
            samples: [Sample::default(); HISTORY_SIZE],
            head: 0,
            len: 0,
        }
    }

    pub fn add_data_point(&mut self, time_ms: i64, value: f32) {
        self.samples[self.head] = Sample { time_ms, value };
        self.head = (self.head + 1) % HISTORY_SIZE;
        self.len = (self.len + 1).min(HISTORY_SIZE);
    }

    /// Velocity in units per second; 0.0 with fewer than two usable samples.
    pub fn calculate_velocity(&self) -> f32 {
        let window = self.recent_window();
        if window.len() < 2 {
            return 0.0;
        }

        let mut work = 0.0f32;
        for (step, pair) in window.windows(2).enumerate() {
            let (older, newer) = (pair[0], pair[1]);
            let elapsed = (newer.time_ms - older.time_ms) as f32;
            if elapsed == 0.0 {
                continue;
            }
            let segment_velocity = (newer.value - older.value) / elapsed;
            let carried = kinetic_energy_to_velocity(work);
            work += (segment_velocity - carried) * segment_velocity.abs();
            if step == 0 {
                work *= 0.5;
            }
        }

        let velocity = kinetic_energy_to_velocity(work) * 1000.0;
        if velocity.is_finite() {
            velocity
        } else {
            0.0
        }
    }

    /// Velocity clamped to `±max_velocity`; 0.0 for a non-positive cap.
    pub fn calculate_velocity_with_max(&self, max_velocity: f32) -> f32 {
        if !max_velocity.is_finite() || max_velocity <= 0.0 {
            return 0.0;
        }
        self.calculate_velocity().clamp(-max_velocity, max_velocity)
    }

    pub fn reset(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Usable samples, oldest first: inside the horizon and without a stop gap.
    fn recent_window(&self) -> SmallVec<[Sample; HISTORY_SIZE]> {
        let mut newest_first: SmallVec<[Sample; HISTORY_SIZE]> = SmallVec::new();
        for offset in 1..=self.len {
            let slot = (self.head + HISTORY_SIZE - offset) % HISTORY_SIZE;
            let sample = self.samples[slot];
            if let Some(newest) = newest_first.first() {
                if newest.time_ms - sample.time_ms > HORIZON_MS {
                    break;
                }
            }
            if let Some(previous) = newest_first.last() {
                if previous.time_ms - sample.time_ms > ASSUME_STOPPED_MS {
                    break;
                }
            }
            newest_first.push(sample);
        }
        newest_first.reverse();
        newest_first
    }
}

#[inline]
fn kinetic_energy_to_velocity(kinetic_energy: f32) -> f32 {
    kinetic_energy.signum() * (2.0 * kinetic_energy.abs()).sqrt()
}

/// Two-axis tracker fed with pointer translations.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    x: VelocityTracker1D,
    y: VelocityTracker1D,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_position(&mut self, time_ms: i64, position: Point) {
        self.x.add_data_point(time_ms, position.x);
        self.y.add_data_point(time_ms, position.y);
    }

    pub fn velocity_with_max(&self, max_velocity: f32) -> Point {
        Point::new(
            self.x.calculate_velocity_with_max(max_velocity),
            self.y.calculate_velocity_with_max(max_velocity),
        )
    }

    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_single_sample_report_zero() {
        let mut tracker = VelocityTracker1D::new();
        assert_eq!(tracker.calculate_velocity(), 0.0);
        tracker.add_data_point(0, 100.0);
        assert_eq!(tracker.calculate_velocity(), 0.0);
    }

    #[test]
    fn steady_motion_matches_slope() {
        let mut tracker = VelocityTracker1D::new();
        for step in 0..4 {
            tracker.add_data_point(step * 10, step as f32 * 100.0);
        }
        let velocity = tracker.calculate_velocity();
        assert!(
            (velocity - 10_000.0).abs() < 1_000.0,
            "Expected ~10000, got {velocity}"
        );
    }

    #[test]
    fn backwards_motion_is_negative() {
        let mut tracker = VelocityTracker1D::new();
        tracker.add_data_point(0, 300.0);
        tracker.add_data_point(10, 200.0);
        tracker.add_data_point(20, 100.0);
        assert!(tracker.calculate_velocity() < 0.0);
    }

    #[test]
    fn cap_applies_in_both_directions() {
        let mut tracker = VelocityTracker1D::new();
        tracker.add_data_point(0, 0.0);
        tracker.add_data_point(1, 10_000.0);
        assert_eq!(tracker.calculate_velocity_with_max(8_000.0), 8_000.0);

        tracker.reset();
        tracker.add_data_point(0, 10_000.0);
        tracker.add_data_point(1, 0.0);
        assert_eq!(tracker.calculate_velocity_with_max(8_000.0), -8_000.0);
        assert_eq!(tracker.calculate_velocity_with_max(0.0), 0.0);
    }

    #[test]
    fn stale_samples_are_ignored() {
        let mut tracker = VelocityTracker1D::new();
        tracker.add_data_point(0, 0.0);
        tracker.add_data_point(150, 100.0);
        tracker.add_data_point(160, 200.0);
        tracker.add_data_point(170, 300.0);
        let velocity = tracker.calculate_velocity();
        assert!(
            (velocity - 10_000.0).abs() < 1_000.0,
            "only the recent run should count, got {velocity}"
        );
    }

    #[test]
    fn pause_before_release_reports_zero() {
        let mut tracker = VelocityTracker1D::new();
        tracker.add_data_point(0, 0.0);
        tracker.add_data_point(ASSUME_STOPPED_MS + 1, 100.0);
        assert_eq!(tracker.calculate_velocity(), 0.0);
    }

    #[test]
    fn ring_buffer_wraps() {
        let mut tracker = VelocityTracker1D::new();
        for step in 0..(HISTORY_SIZE as i64 * 2) {
            tracker.add_data_point(step * 5, step as f32 * -10.0);
        }
        let velocity = tracker.calculate_velocity();
        assert!(
            (velocity + 2_000.0).abs() < 200.0,
            "Expected ~-2000, got {velocity}"
        );
    }
}

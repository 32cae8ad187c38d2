use super::*;

use crate::easing::Easing;
use std::cell::Cell;
use swipekit_testing::{TestRuntime, FRAME_NANOS};

fn recorder() -> (Rc<RefCell<Vec<AnimationEndReason>>>, impl FnOnce(AnimationEndReason)) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    (log, move |reason| sink.borrow_mut().push(reason))
}

fn quad(duration_millis: u64) -> AnimationSpec {
    AnimationSpec::tween(duration_millis, Easing::EaseInOutQuad)
}

#[test]
fn tween_interpolates_over_time_and_lands_on_target() {
    let harness = TestRuntime::new();
    let value = Animatable::new(0.0f32, harness.frame_clock());
    let (ends, on_end) = recorder();

    value.animate_to_then(100.0, quad(100), on_end);
    assert!(value.is_running());
    assert_eq!(value.value(), 0.0, "nothing moves before the first frame");

    let mut saw_midpoint = false;
    for _ in 0..32 {
        if !value.is_running() {
            break;
        }
        harness.advance_frame();
        let current = value.value();
        if current > 0.0 && current < 100.0 {
            saw_midpoint = true;
        }
    }

    assert!(saw_midpoint, "animation should report intermediate values");
    assert_eq!(value.value(), 100.0);
    assert!(!value.is_running());
    assert_eq!(ends.borrow().as_slice(), &[AnimationEndReason::Finished]);
}

#[test]
fn spring_settles_exactly_on_target() {
    let harness = TestRuntime::new();
    let value = Animatable::new(250.0f32, harness.frame_clock());
    let (ends, on_end) = recorder();

    value.animate_to_then(0.0, SpringSpec::gentle(), on_end);
    let frames = harness.run_until_idle();

    assert!(frames > 2, "spring should take several frames, took {frames}");
    assert_eq!(value.value(), 0.0);
    assert_eq!(ends.borrow().as_slice(), &[AnimationEndReason::Finished]);
}

#[test]
fn spring_to_current_value_settles_immediately() {
    let harness = TestRuntime::new();
    let value = Animatable::new(0.0f32, harness.frame_clock());
    value.animate_to(0.0, SpringSpec::gentle());

    let frames = harness.run_until_idle();
    assert!(frames <= 2, "took {frames} frames");
    assert!(!value.is_running());
}

#[test]
fn new_animation_interrupts_the_running_one() {
    let harness = TestRuntime::new();
    let value = Animatable::new(0.0f32, harness.frame_clock());
    let (first, first_end) = recorder();
    let (second, second_end) = recorder();

    value.animate_to_then(100.0, quad(200), first_end);
    harness.advance_frame();
    harness.advance_frame();
    let midway = value.value();
    assert!(midway > 0.0);

    value.animate_to_then(-50.0, quad(100), second_end);
    assert_eq!(first.borrow().as_slice(), &[AnimationEndReason::Interrupted]);

    harness.run_until_idle();
    assert_eq!(value.value(), -50.0);
    assert_eq!(second.borrow().as_slice(), &[AnimationEndReason::Finished]);
    assert_eq!(first.borrow().len(), 1, "interrupted callback runs once");
}

#[test]
fn stop_freezes_value_and_reports_interruption() {
    let harness = TestRuntime::new();
    let value = Animatable::new(0.0f32, harness.frame_clock());
    let (ends, on_end) = recorder();

    value.animate_to_then(100.0, quad(300), on_end);
    harness.advance_frame();
    harness.advance_frame();
    let frozen = value.value();

    value.stop();
    harness.advance_frame();
    assert_eq!(value.value(), frozen);
    assert_eq!(value.target(), frozen);
    assert_eq!(ends.borrow().as_slice(), &[AnimationEndReason::Interrupted]);
    assert!(!harness.runtime().has_frame_callbacks());
}

#[test]
fn snap_to_without_animation_has_no_callback() {
    let harness = TestRuntime::new();
    let value = Animatable::new(0.0f32, harness.frame_clock());
    value.snap_to(42.0);
    assert_eq!(value.value(), 42.0);
    assert!(!value.is_running());
    assert!(!harness.runtime().has_frame_callbacks());
}

#[test]
fn dropping_last_handle_drops_completion_callback() {
    let harness = TestRuntime::new();
    let fired = Rc::new(Cell::new(false));
    {
        let value = Animatable::new(0.0f32, harness.frame_clock());
        let fired = Rc::clone(&fired);
        value.animate_to_then(10.0, quad(50), move |_| fired.set(true));
        harness.advance_frame();
    }

    harness.run_until_idle();
    assert!(!fired.get(), "callback must not outlive the animatable");
}

#[test]
fn tween_follows_its_easing_curve() {
    let harness = TestRuntime::new();
    let value = Animatable::new(0.0f32, harness.frame_clock());
    value.animate_to(100.0, AnimationSpec::tween(200, Easing::EaseInOutCubic));

    // The first frame anchors the start time.
    harness.advance_frame();
    harness.advance_frame();
    harness.advance_frame();
    let fraction = (2 * FRAME_NANOS) as f32 / 200_000_000.0;
    let expected = 100.0 * Easing::EaseInOutCubic.transform(fraction);
    assert!((value.value() - expected).abs() < 1e-3, "{}", value.value());
}

#[test]
fn easing_bounds_are_correct() {
    for easing in [Easing::EaseInOutQuad, Easing::EaseInOutCubic] {
        assert_eq!(easing.transform(0.0), 0.0, "start of {easing:?}");
        assert_eq!(easing.transform(1.0), 1.0, "end of {easing:?}");
        assert_eq!(easing.transform(-0.5), 0.0, "clamped below for {easing:?}");
        assert_eq!(easing.transform(1.5), 1.0, "clamped above for {easing:?}");
    }
}

#[test]
fn symmetric_easings_pass_through_midpoint() {
    assert!((Easing::EaseInOutQuad.transform(0.5) - 0.5).abs() < 1e-6);
    assert!((Easing::EaseInOutCubic.transform(0.5) - 0.5).abs() < 1e-6);
    assert!(Easing::EaseInOutCubic.transform(0.25) < Easing::EaseInOutQuad.transform(0.25));
    let quad = Easing::EaseInOutQuad.transform(0.25) + Easing::EaseInOutQuad.transform(0.75);
    assert!((quad - 1.0).abs() < 1e-6);
}

#[test]
fn gentle_spring_is_underdamped() {
    let gentle = SpringSpec::gentle();
    assert_eq!(gentle, SpringSpec::new(0.5, 100.0));
    assert!(gentle.damping_ratio < 1.0);
}

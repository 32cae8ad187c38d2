//! Piecewise-linear interpolation over breakpoint tables.
//!
//! `interpolate_clamped(value, input, output)` maps `value` through the
//! segments `input[i] → output[i]`. `input` must be ascending. Degenerate
//! tables (fewer than two points, zero-width segments) never divide by zero.

use smallvec::SmallVec;

/// Breakpoint table that stays on the stack for typical page counts.
pub type Breakpoints = SmallVec<[f32; 16]>;

/// Maps `value` through the table, pinning values outside it to the
/// nearest edge output.
pub fn interpolate_clamped(value: f32, input: &[f32], output: &[f32]) -> f32 {
    let len = input.len().min(output.len());
    match len {
        0 => return value,
        1 => return output[0],
        _ => {}
    }
    let input = &input[..len];
    let output = &output[..len];

    if value < input[0] {
        return output[0];
    }
    if value > input[len - 1] {
        return output[len - 1];
    }

    // First segment whose upper bound reaches `value`.
    let upper = input
        .iter()
        .skip(1)
        .position(|&edge| value <= edge)
        .map_or(len - 1, |index| index + 1);
    segment(
        value,
        input[upper - 1],
        input[upper],
        output[upper - 1],
        output[upper],
    )
}

/// Evenly spaced breakpoints `[0, step, 2·step, …]` of length `count`.
pub fn uniform_breakpoints(count: usize, step: f32) -> Breakpoints {
    (0..count).map(|index| index as f32 * step).collect()
}

fn segment(value: f32, in_start: f32, in_end: f32, out_start: f32, out_end: f32) -> f32 {
    let width = in_end - in_start;
    if width.abs() <= f32::EPSILON {
        return out_end;
    }
    let fraction = (value - in_start) / width;
    out_start + (out_end - out_start) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_inside_segments() {
        let input = [0.0, 10.0, 20.0];
        let output = [4.0, 16.0, 4.0];
        assert_eq!(interpolate_clamped(0.0, &input, &output), 4.0);
        assert_eq!(interpolate_clamped(5.0, &input, &output), 10.0);
        assert_eq!(interpolate_clamped(10.0, &input, &output), 16.0);
        assert_eq!(interpolate_clamped(15.0, &input, &output), 10.0);
    }

    #[test]
    fn clamps_outside_the_table() {
        let input = [1.0, 2.0];
        let output = [10.0, 20.0];
        assert_eq!(interpolate_clamped(-5.0, &input, &output), 10.0);
        assert_eq!(interpolate_clamped(9.0, &input, &output), 20.0);
    }

    #[test]
    fn degenerate_tables_do_not_divide_by_zero() {
        assert_eq!(interpolate_clamped(3.0, &[], &[]), 3.0);
        assert_eq!(interpolate_clamped(3.0, &[0.0], &[0.0]), 0.0);
        let flat = interpolate_clamped(0.0, &[0.0, 0.0], &[1.0, 2.0]);
        assert!(flat.is_finite());
    }

    #[test]
    fn uniform_breakpoints_are_evenly_spaced() {
        let points = uniform_breakpoints(4, 300.0);
        assert_eq!(points.as_slice(), &[0.0, 300.0, 600.0, 900.0]);
        assert!(uniform_breakpoints(0, 300.0).is_empty());
    }
}

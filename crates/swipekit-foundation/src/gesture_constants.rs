//! Shared gesture constants.
//!
//! Values are in logical pixels and logical pixels per second.

/// Travel below which a released pointer counts as a tap rather than a pan.
///
/// Matches the common touch-slop convention (~8dp).
pub const DRAG_THRESHOLD: f32 = 8.0;

/// Upper bound applied to tracked release velocities.
pub const MAX_FLING_VELOCITY: f32 = 8_000.0;

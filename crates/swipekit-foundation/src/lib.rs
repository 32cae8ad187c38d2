//! Foundation layer for swipekit: gesture sampling, velocity tracking,
//! breakpoint interpolation and layout measurement.

pub mod gesture_constants;
pub mod input;
pub mod interpolation;
mod measure;
mod sanitize;
pub mod velocity_tracker;

pub use gesture_constants::{DRAG_THRESHOLD, MAX_FLING_VELOCITY};
pub use input::{GestureOutcome, GestureSampler, PanEvent, PanPhase, PanRelease};
pub use interpolation::{interpolate_clamped, uniform_breakpoints};
pub use measure::{LayoutMeasurer, LayoutSlot};
pub use sanitize::checked_or;
pub use velocity_tracker::{VelocityTracker, VelocityTracker1D};

pub mod prelude {
    pub use crate::input::{GestureOutcome, GestureSampler, PanEvent, PanRelease};
    pub use crate::interpolation::interpolate_clamped;
    pub use crate::measure::LayoutMeasurer;
}

//! Pointer input for gesture surfaces.

mod sampler;
mod types;

pub use sampler::GestureSampler;
pub use types::{GestureOutcome, PanEvent, PanPhase, PanRelease};

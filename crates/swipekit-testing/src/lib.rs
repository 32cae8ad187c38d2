//! Testing utilities and harness for swipekit

mod harness;
mod measure;

pub use harness::*;
pub use measure::*;

pub mod prelude {
    pub use crate::harness::{TestRuntime, FRAME_NANOS};
    pub use crate::measure::{fixed_bounds, unmeasured};
}

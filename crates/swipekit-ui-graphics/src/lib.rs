//! Pure geometry shared by the swipekit crates.

mod geometry;

pub use geometry::*;

pub mod prelude {
    pub use crate::geometry::{Point, Rect, Size};
}

//! Paged carousel for swipekit.
//!
//! [`CarouselEngine`] owns the page position and rubber-band overshoot,
//! [`dot_style`] maps the fractional index onto indicator dots, and
//! [`Carousel`] ties the engine to a keyed list of pages.

mod collection;
mod engine;
mod indicator;
mod settings;

pub use collection::{Carousel, Dots, PageFrame};
pub use engine::{CarouselEngine, CarouselPhase};
pub use indicator::{dot_style, DotStyle, IndicatorStyle};
pub use settings::{
    CarouselSettings, DEFAULT_ACTIONS_AREA_FACTOR, DEFAULT_DURATION_MILLIS,
    DEFAULT_FAST_SWIPE_THRESHOLD, DEFAULT_OVERSHOOT_FACTOR, DEFAULT_OVERSHOOT_WEIGHT,
    DEFAULT_PAGE_SIZE,
};

pub mod prelude {
    pub use crate::collection::Carousel;
    pub use crate::engine::{CarouselEngine, CarouselPhase};
    pub use crate::indicator::{dot_style, IndicatorStyle};
    pub use crate::settings::CarouselSettings;
}

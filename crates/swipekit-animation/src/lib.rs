//! Animation system for swipekit
//!
//! Provides time-based animations with easing curves and spring physics,
//! driven by the [`swipekit_core::FrameClock`].

mod animatable;
mod easing;
mod spec;

pub use animatable::{Animatable, AnimationEndReason, Lerp, SpringScalar};
pub use easing::Easing;
pub use spec::{AnimationSpec, AnimationType, SpringSpec};

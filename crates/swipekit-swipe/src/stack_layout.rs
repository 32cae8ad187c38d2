//! Depth transforms for a receding card stack.
//!
//! As the top card's progress moves toward 1, every card behind it
//! interpolates from its own depth toward the next shallower one, so the
//! stack appears to advance one level by the time the top card commits.

use swipekit_foundation::interpolate_clamped;
use swipekit_ui_graphics::Point;

use crate::settings::StackStyle;

/// Visual transform for one card.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardTransform {
    pub translate_x: f32,
    pub translate_y: f32,
    /// Degrees, clockwise.
    pub rotate_z: f32,
    pub scale: f32,
}

impl CardTransform {
    pub const IDENTITY: Self = Self {
        translate_x: 0.0,
        translate_y: 0.0,
        rotate_z: 0.0,
        scale: 1.0,
    };
}

impl Default for CardTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StackLayout {
    style: StackStyle,
}

impl StackLayout {
    pub fn new(style: StackStyle) -> Self {
        Self {
            style: style.sanitized(),
        }
    }

    pub fn style(&self) -> StackStyle {
        self.style
    }

    /// Transform of the card at depth `position` while the top card is at
    /// `progress`, with this card's own `displacement`.
    pub fn transform(&self, progress: f32, position: usize, displacement: Point) -> CardTransform {
        let progress = if progress.is_finite() { progress } else { 0.0 };
        let displacement = displacement.finite_or_zero();
        let depth = position as f32;
        let next_depth = position.saturating_sub(1) as f32;
        let style = &self.style;

        let scale = interpolate_clamped(
            progress,
            &[0.0, 1.0],
            &[
                1.0 - style.scale_ratio * depth,
                1.0 - style.scale_ratio * next_depth,
            ],
        );
        let add_y = interpolate_clamped(
            progress,
            &[0.0, 1.0],
            &[style.add_y_ratio * depth, style.add_y_ratio * next_depth],
        );
        let rotate_z = (displacement.x / style.angle_velocity_ratio)
            .clamp(-style.rotation_clip, style.rotation_clip);

        CardTransform {
            translate_x: displacement.x,
            translate_y: displacement.y + add_y,
            rotate_z,
            scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn top_card_follows_the_pointer() {
        let layout = StackLayout::default();
        let transform = layout.transform(0.5, 0, Point::new(60.0, -20.0));
        assert_eq!(transform.translate_x, 60.0);
        assert_eq!(transform.translate_y, -20.0);
        assert_eq!(transform.rotate_z, 5.0);
        assert_eq!(transform.scale, 1.0);
    }

    #[test]
    fn rotation_is_clipped() {
        let layout = StackLayout::default();
        assert_eq!(layout.transform(1.0, 0, Point::new(500.0, 0.0)).rotate_z, 12.0);
        assert_eq!(layout.transform(1.0, 0, Point::new(-500.0, 0.0)).rotate_z, -12.0);
    }

    #[test]
    fn second_card_advances_one_level() {
        let layout = StackLayout::default();

        let resting = layout.transform(0.0, 1, Point::ZERO);
        assert!(close(resting.scale, 0.9));
        assert!(close(resting.translate_y, 40.0));

        let halfway = layout.transform(0.5, 1, Point::ZERO);
        assert!(close(halfway.scale, 0.95));
        assert!(close(halfway.translate_y, 20.0));

        let advanced = layout.transform(1.0, 1, Point::ZERO);
        assert!(close(advanced.scale, 1.0));
        assert!(close(advanced.translate_y, 0.0));
    }

    #[test]
    fn deeper_cards_advance_toward_the_previous_depth() {
        let layout = StackLayout::default();
        let transform = layout.transform(1.0, 2, Point::ZERO);
        assert!(close(transform.scale, 0.9));
        assert!(close(transform.translate_y, 40.0));
    }

    #[test]
    fn progress_outside_the_unit_range_is_clamped() {
        let layout = StackLayout::default();
        assert_eq!(
            layout.transform(3.0, 1, Point::ZERO),
            layout.transform(1.0, 1, Point::ZERO)
        );
        assert_eq!(
            layout.transform(f32::NAN, 1, Point::ZERO),
            layout.transform(0.0, 1, Point::ZERO)
        );
    }
}

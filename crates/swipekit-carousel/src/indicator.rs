//! Page-indicator dots driven by the fractional page index.

use swipekit_foundation::interpolate_clamped;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndicatorStyle {
    pub small: f32,
    pub large: f32,
    pub dim_opacity: f32,
    pub full_opacity: f32,
}

impl Default for IndicatorStyle {
    fn default() -> Self {
        Self {
            small: 6.0,
            large: 16.0,
            dim_opacity: 0.5,
            full_opacity: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotStyle {
    pub height: f32,
    pub opacity: f32,
}

/// Style of dot `dot_index` when the carousel sits at `animated_index`.
///
/// A dot is largest while its page is current and shrinks linearly toward
/// the neighbouring pages.
pub fn dot_style(animated_index: f32, dot_index: usize, style: &IndicatorStyle) -> DotStyle {
    let animated_index = if animated_index.is_finite() {
        animated_index
    } else {
        0.0
    };
    if dot_index == 0 {
        let input = [0.0, 1.0];
        return DotStyle {
            height: interpolate_clamped(animated_index, &input, &[style.large, style.small]),
            opacity: interpolate_clamped(
                animated_index,
                &input,
                &[style.full_opacity, style.dim_opacity],
            ),
        };
    }

    let center = dot_index as f32;
    let input = [center - 1.0, center, center + 1.0];
    DotStyle {
        height: interpolate_clamped(
            animated_index,
            &input,
            &[style.small, style.large, style.small],
        ),
        opacity: interpolate_clamped(
            animated_index,
            &input,
            &[style.dim_opacity, style.full_opacity, style.dim_opacity],
        ),
    }
}

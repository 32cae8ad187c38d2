use swipekit_foundation::checked_or;

pub const DEFAULT_PAGE_SIZE: f32 = 300.0;
pub const DEFAULT_DURATION_MILLIS: u64 = 300;
pub const DEFAULT_OVERSHOOT_FACTOR: f32 = 0.15;
pub const DEFAULT_OVERSHOOT_WEIGHT: f32 = 2.0;
pub const DEFAULT_ACTIONS_AREA_FACTOR: f32 = 0.25;
/// Release speed (px/s) above which a drag flings one page.
pub const DEFAULT_FAST_SWIPE_THRESHOLD: f32 = 1_000.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CarouselSettings {
    /// Height of one page.
    pub page_size: f32,
    /// Length of snap and overshoot-decay transitions.
    pub duration_millis: u64,
    /// Overshoot limit as a fraction of `page_size`.
    pub overshoot_factor: f32,
    /// Divisor applied to drag travel past an edge.
    pub overshoot_weight: f32,
    /// Height of the top and bottom tap bands as a fraction of `page_size`.
    pub actions_area_factor: f32,
    pub fast_swipe_threshold: f32,
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            duration_millis: DEFAULT_DURATION_MILLIS,
            overshoot_factor: DEFAULT_OVERSHOOT_FACTOR,
            overshoot_weight: DEFAULT_OVERSHOOT_WEIGHT,
            actions_area_factor: DEFAULT_ACTIONS_AREA_FACTOR,
            fast_swipe_threshold: DEFAULT_FAST_SWIPE_THRESHOLD,
        }
    }
}

impl CarouselSettings {
    pub fn with_page_size(mut self, page_size: f32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_duration(mut self, millis: u64) -> Self {
        self.duration_millis = millis;
        self
    }

    pub fn with_overshoot_factor(mut self, factor: f32) -> Self {
        self.overshoot_factor = factor;
        self
    }

    pub fn with_overshoot_weight(mut self, weight: f32) -> Self {
        self.overshoot_weight = weight;
        self
    }

    pub fn with_actions_area_factor(mut self, factor: f32) -> Self {
        self.actions_area_factor = factor;
        self
    }

    pub fn with_fast_swipe_threshold(mut self, threshold: f32) -> Self {
        self.fast_swipe_threshold = threshold;
        self
    }

    /// Replaces invalid fields with their defaults.
    pub fn sanitized(self) -> Self {
        Self {
            page_size: checked_or(self.page_size, DEFAULT_PAGE_SIZE, "page_size", |v| v > 0.0),
            duration_millis: self.duration_millis,
            overshoot_factor: checked_or(
                self.overshoot_factor,
                DEFAULT_OVERSHOOT_FACTOR,
                "overshoot_factor",
                |v| v >= 0.0,
            ),
            overshoot_weight: checked_or(
                self.overshoot_weight,
                DEFAULT_OVERSHOOT_WEIGHT,
                "overshoot_weight",
                |v| v > 0.0,
            ),
            actions_area_factor: checked_or(
                self.actions_area_factor,
                DEFAULT_ACTIONS_AREA_FACTOR,
                "actions_area_factor",
                |v| (0.0..=0.5).contains(&v),
            ),
            fast_swipe_threshold: checked_or(
                self.fast_swipe_threshold,
                DEFAULT_FAST_SWIPE_THRESHOLD,
                "fast_swipe_threshold",
                |v| v > 0.0,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_fields_fall_back_to_defaults() {
        let settings = CarouselSettings::default()
            .with_page_size(0.0)
            .with_overshoot_weight(-1.0)
            .with_overshoot_factor(f32::NAN)
            .with_actions_area_factor(0.9)
            .with_fast_swipe_threshold(f32::INFINITY)
            .sanitized();
        assert_eq!(settings, CarouselSettings::default());
    }

    #[test]
    fn valid_fields_survive() {
        let settings = CarouselSettings::default()
            .with_page_size(480.0)
            .with_duration(120)
            .with_overshoot_factor(0.0)
            .sanitized();
        assert_eq!(settings.page_size, 480.0);
        assert_eq!(settings.duration_millis, 120);
        assert_eq!(settings.overshoot_factor, 0.0);
    }
}

use swipekit_foundation::checked_or;

/// Displacement at which a swipe commits.
pub const DEFAULT_THRESHOLD: f32 = 200.0;
pub const DEFAULT_EXIT_DURATION_MILLIS: u64 = 300;
pub const DEFAULT_VISIBLE_COUNT: usize = 3;

/// Visual constants of the receding stack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackStyle {
    /// Scale lost per depth level.
    pub scale_ratio: f32,
    /// Vertical offset added per depth level.
    pub add_y_ratio: f32,
    /// Maximum tilt in degrees.
    pub rotation_clip: f32,
    /// Horizontal displacement per degree of tilt.
    pub angle_velocity_ratio: f32,
}

impl Default for StackStyle {
    fn default() -> Self {
        Self {
            scale_ratio: 0.1,
            add_y_ratio: 40.0,
            rotation_clip: 12.0,
            angle_velocity_ratio: 12.0,
        }
    }
}

impl StackStyle {
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            scale_ratio: checked_or(self.scale_ratio, defaults.scale_ratio, "scale_ratio", any),
            add_y_ratio: checked_or(self.add_y_ratio, defaults.add_y_ratio, "add_y_ratio", any),
            rotation_clip: checked_or(
                self.rotation_clip.abs(),
                defaults.rotation_clip,
                "rotation_clip",
                positive,
            ),
            angle_velocity_ratio: checked_or(
                self.angle_velocity_ratio,
                defaults.angle_velocity_ratio,
                "angle_velocity_ratio",
                positive,
            ),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeSettings {
    pub threshold: f32,
    pub exit_duration_millis: u64,
    /// Disabled cards ignore gestures and stay at their resting layout.
    pub disabled: bool,
    /// Cards mounted at once in a deck.
    pub visible_count: usize,
    pub style: StackStyle,
}

impl Default for SwipeSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            exit_duration_millis: DEFAULT_EXIT_DURATION_MILLIS,
            disabled: false,
            visible_count: DEFAULT_VISIBLE_COUNT,
            style: StackStyle::default(),
        }
    }
}

impl SwipeSettings {
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_exit_duration(mut self, millis: u64) -> Self {
        self.exit_duration_millis = millis;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_visible_count(mut self, count: usize) -> Self {
        self.visible_count = count;
        self
    }

    pub fn with_style(mut self, style: StackStyle) -> Self {
        self.style = style;
        self
    }

    /// Replaces invalid fields with their defaults.
    pub fn sanitized(self) -> Self {
        let visible_count = if self.visible_count == 0 {
            log::warn!("visible_count must be at least 1, using {DEFAULT_VISIBLE_COUNT}");
            DEFAULT_VISIBLE_COUNT
        } else {
            self.visible_count
        };
        Self {
            threshold: checked_or(self.threshold, DEFAULT_THRESHOLD, "threshold", positive),
            exit_duration_millis: self.exit_duration_millis,
            disabled: self.disabled,
            visible_count,
            style: self.style.sanitized(),
        }
    }
}

fn positive(value: f32) -> bool {
    value > 0.0
}

fn any(_: f32) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_fields_fall_back_to_defaults() {
        let settings = SwipeSettings::default()
            .with_threshold(-5.0)
            .with_visible_count(0)
            .with_style(StackStyle {
                angle_velocity_ratio: 0.0,
                scale_ratio: f32::NAN,
                ..StackStyle::default()
            })
            .sanitized();
        assert_eq!(settings.threshold, DEFAULT_THRESHOLD);
        assert_eq!(settings.visible_count, DEFAULT_VISIBLE_COUNT);
        assert_eq!(settings.style, StackStyle::default());
    }

    #[test]
    fn valid_fields_survive() {
        let settings = SwipeSettings::default()
            .with_threshold(120.0)
            .with_exit_duration(150)
            .with_disabled(true)
            .sanitized();
        assert_eq!(settings.threshold, 120.0);
        assert_eq!(settings.exit_duration_millis, 150);
        assert!(settings.disabled);
    }
}

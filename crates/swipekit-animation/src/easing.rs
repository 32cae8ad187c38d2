/// Easing curves for tween animations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    /// Symmetric quadratic in-out. Default curve for timed transitions.
    EaseInOutQuad,
    /// Symmetric cubic in-out. Used to decay rubber-band overshoot.
    EaseInOutCubic,
}

impl Easing {
    /// Apply the easing function to a linear fraction [0, 1].
    pub fn transform(&self, fraction: f32) -> f32 {
        let t = fraction.clamp(0.0, 1.0);
        match self {
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

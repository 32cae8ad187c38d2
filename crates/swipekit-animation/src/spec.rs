use crate::easing::Easing;

/// Timed transition: duration plus easing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    /// Duration in milliseconds.
    pub duration_millis: u64,
    pub easing: Easing,
}

impl AnimationSpec {
    pub fn tween(duration_millis: u64, easing: Easing) -> Self {
        Self {
            duration_millis,
            easing,
        }
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::tween(300, Easing::EaseInOutQuad)
    }
}

/// Spring animation configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    /// 1.0 = critically damped, < 1.0 = bouncy, > 1.0 = over-damped.
    pub damping_ratio: f32,
    /// Higher values settle faster.
    pub stiffness: f32,
    /// Velocity (in progress units per second) below which the spring may settle.
    pub velocity_threshold: f32,
    /// Distance to target (in value units) below which the spring may settle.
    pub position_threshold: f32,
}

impl SpringSpec {
    pub fn new(damping_ratio: f32, stiffness: f32) -> Self {
        Self {
            damping_ratio,
            stiffness,
            velocity_threshold: 0.01,
            position_threshold: 0.001,
        }
    }

    /// Soft, slightly bouncy spring (damping 10 at mass 1, stiffness 100).
    /// Used to return dragged cards to rest.
    pub fn gentle() -> Self {
        Self::new(0.5, 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationType {
    Tween(AnimationSpec),
    Spring(SpringSpec),
}

impl Default for AnimationType {
    fn default() -> Self {
        AnimationType::Tween(AnimationSpec::default())
    }
}

impl From<AnimationSpec> for AnimationType {
    fn from(spec: AnimationSpec) -> Self {
        AnimationType::Tween(spec)
    }
}

impl From<SpringSpec> for AnimationType {
    fn from(spec: SpringSpec) -> Self {
        AnimationType::Spring(spec)
    }
}

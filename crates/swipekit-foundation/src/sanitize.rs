//! Validation shared by the engines' settings types.

/// Returns `value` when it is finite and passes `valid`, otherwise logs a
/// warning naming the field and returns `default`.
pub fn checked_or(value: f32, default: f32, name: &str, valid: impl Fn(f32) -> bool) -> f32 {
    if value.is_finite() && valid(value) {
        value
    } else {
        log::warn!("invalid {name} {value}, using {default}");
        default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_values_pass_through() {
        assert_eq!(checked_or(3.5, 1.0, "width", |v| v > 0.0), 3.5);
        assert_eq!(checked_or(-2.0, 1.0, "offset", |_| true), -2.0);
    }

    #[test]
    fn rejected_or_non_finite_values_use_the_default() {
        assert_eq!(checked_or(0.0, 1.0, "width", |v| v > 0.0), 1.0);
        assert_eq!(checked_or(f32::NAN, 1.0, "offset", |_| true), 1.0);
        assert_eq!(checked_or(f32::NEG_INFINITY, 1.0, "offset", |_| true), 1.0);
    }
}

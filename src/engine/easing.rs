//! Easing for timed transitions.

use std::f32::consts::PI;

/// Symmetric ease-in/ease-out: accelerate to the midpoint, decelerate
/// out. Cosine form, clamped to [0, 1].
pub(crate) fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    0.5 - (PI * t).cos() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert!((ease_in_out(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn midpoint_is_half() {
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn curve_is_monotonically_increasing() {
        let mut previous = ease_in_out(0.0);
        for step in 1..=100 {
            let value = ease_in_out(step as f32 / 100.0);
            assert!(value >= previous, "dipped at step {step}");
            previous = value;
        }
    }

    #[test]
    fn curve_is_symmetric_about_the_midpoint() {
        for step in 0..=50 {
            let t = step as f32 / 100.0;
            let sum = ease_in_out(t) + ease_in_out(1.0 - t);
            assert!((sum - 1.0).abs() < 1e-5, "asymmetric at t={t}");
        }
    }

    #[test]
    fn out_of_range_input_clamps() {
        assert_eq!(ease_in_out(-0.5), 0.0);
        assert!((ease_in_out(1.5) - 1.0).abs() < 1e-6);
    }
}

//! Cosine-eased interpolation between color temperatures.
//!
//! Transitions use cosine easing rather than a linear ramp so temperature
//! changes are perceptually gentle at both edges of a transition window:
//! slow start, faster middle, slow finish.

use std::f64::consts::PI;

/// Map a linear fraction in `[0, 1]` onto the cosine ease-in/ease-out curve.
///
/// `smooth_step(0) == 0`, `smooth_step(1) == 1`, and the curve is symmetric
/// around the midpoint (`smooth_step(0.5) == 0.5`).
pub fn smooth_step(t: f64) -> f64 {
    (1.0 - (t * PI).cos()) / 2.0
}

/// Interpolate between two temperatures at the given elapsed fraction.
///
/// Fractions at or below 0.0 return exactly `from`; at or above 1.0 return
/// exactly `to`. In between, the blend is cosine-eased and never overshoots
/// the `[min(from, to), max(from, to)]` interval.
///
/// The result is rounded to the nearest integer Kelvin, halves away from
/// zero (the rounding rule of `f64::round`).
pub fn interpolate(from: u32, to: u32, elapsed: f64) -> u32 {
    if elapsed <= 0.0 {
        return from;
    }
    if elapsed >= 1.0 {
        return to;
    }
    let eased = smooth_step(elapsed);
    (from as f64 + (to as f64 - from as f64) * eased).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_exact() {
        assert_eq!(interpolate(3400, 6500, 0.0), 3400);
        assert_eq!(interpolate(3400, 6500, 1.0), 6500);
        assert_eq!(interpolate(6500, 3400, 0.0), 6500);
        assert_eq!(interpolate(6500, 3400, 1.0), 3400);
    }

    #[test]
    fn test_out_of_range_fractions_pin_to_endpoints() {
        assert_eq!(interpolate(3400, 6500, -0.5), 3400);
        assert_eq!(interpolate(3400, 6500, 1.5), 6500);
        assert_eq!(interpolate(3400, 6500, f64::NEG_INFINITY), 3400);
        assert_eq!(interpolate(3400, 6500, f64::INFINITY), 6500);
    }

    #[test]
    fn test_midpoint_is_halfway() {
        // Cosine easing is symmetric: half the time gives half the blend.
        assert_eq!(interpolate(3400, 6500, 0.5), 4950);
        assert_eq!(interpolate(6500, 3400, 0.5), 4950);
    }

    #[test]
    fn test_ease_in_bias_near_start() {
        // smooth_step(0.25) = (1 - cos(pi/4)) / 2 ~= 0.1464
        let quarter = interpolate(3400, 6500, 0.25);
        assert_eq!(quarter, 3854);
        // Far closer to the start than a linear ramp (4175) would be
        assert!(quarter - 3400 < 6500 - quarter);
    }

    #[test]
    fn test_golden_values_pin_rounding() {
        // These pin both the cosine curve and the f64::round rounding rule
        assert_eq!(interpolate(3400, 6500, 0.75), 6046);
        assert_eq!(interpolate(6500, 3400, 0.25), 6046);
        assert_eq!(interpolate(1000, 2000, 0.1), 1024);
    }

    #[test]
    fn test_monotonic_no_overshoot() {
        let mut previous = interpolate(3400, 6500, 0.0);
        for step in 1..=100 {
            let current = interpolate(3400, 6500, step as f64 / 100.0);
            assert!(current >= previous, "not monotonic at step {}", step);
            assert!((3400..=6500).contains(&current));
            previous = current;
        }
    }

    #[test]
    fn test_same_endpoints_are_stable() {
        for fraction in [0.0, 0.3, 0.5, 0.9, 1.0] {
            assert_eq!(interpolate(5000, 5000, fraction), 5000);
        }
    }

    #[test]
    fn test_smooth_step_curve_shape() {
        assert_eq!(smooth_step(0.0), 0.0);
        assert!((smooth_step(0.5) - 0.5).abs() < 1e-12);
        assert!((smooth_step(1.0) - 1.0).abs() < 1e-12);
        assert!(smooth_step(0.25) < 0.25);
        assert!(smooth_step(0.75) > 0.75);
    }
}

//! Numeric helpers for policy implementations.
//!
//! Probability-valued policies are kept strictly inside the open unit
//! interval with [`clamp`], so that logs and reciprocals downstream stay
//! finite. Closed-form policies that raise negative bases to fractional
//! powers go through the complex plane and come back with [`real_part`].

use num_complex::Complex64;

use crate::value::Value;

/// Lower bound used by [`clamp`].
pub const CLAMP_MIN: f64 = f64::EPSILON;

/// Upper bound used by [`clamp`].
pub const CLAMP_MAX: f64 = 1.0 - f64::EPSILON;

/// Clamp `x` into `[f64::EPSILON, 1 - f64::EPSILON]`.
pub fn clamp(x: f64) -> f64 {
    clamp_between(x, CLAMP_MIN, CLAMP_MAX)
}

/// Clamp `x` into `[lo, hi]`.
///
/// NaN is mapped to `lo`, unlike [`f64::clamp`] which would propagate it.
pub fn clamp_between(x: f64, lo: f64, hi: f64) -> f64 {
    if x.is_nan() || x <= lo {
        lo
    } else if x >= hi {
        hi
    } else {
        x
    }
}

/// Real component of a value.
///
/// Real values pass through unchanged; complex values yield their real
/// part. Values without a numeric view return `None`.
pub fn real_part(value: Value) -> Option<f64> {
    match value {
        Value::Complex(c) => Some(c.re),
        other => other.as_f64(),
    }
}

/// Real part of the principal power `base ^ exp`.
///
/// For non-negative bases this is the ordinary power. For negative bases
/// the principal complex root is taken, e.g. `(-8)^(1/3)` yields
/// `2 * cos(pi/3) = 1`.
pub fn real_pow(base: f64, exp: f64) -> f64 {
    if base >= 0.0 {
        base.powf(exp)
    } else {
        Complex64::new(base, 0.0).powf(exp).re
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn clamp_keeps_probabilities_open() {
        assert_eq!(clamp(0.0), f64::EPSILON);
        assert_eq!(clamp(-3.0), f64::EPSILON);
        assert_eq!(clamp(1.0), 1.0 - f64::EPSILON);
        assert_eq!(clamp(0.3), 0.3);
    }

    #[test]
    fn clamp_between_maps_nan_to_lower_bound() {
        assert_eq!(clamp_between(f64::NAN, 0.1, 0.9), 0.1);
        assert_eq!(clamp_between(5.0, 0.1, 0.9), 0.9);
    }

    #[test]
    fn real_part_passes_reals_through() {
        assert_eq!(real_part(Value::Float(0.4)), Some(0.4));
        assert_eq!(real_part(Value::Int(2)), Some(2.0));
        assert_eq!(real_part(Value::Complex(Complex64::new(1.5, -2.0))), Some(1.5));
        assert_eq!(real_part(Value::Bool(true)), None);
    }

    #[test]
    fn real_pow_takes_principal_root_of_negatives() {
        assert_relative_eq!(real_pow(4.0, 0.5), 2.0);
        assert_relative_eq!(real_pow(-8.0, 1.0 / 3.0), 1.0, epsilon = 1e-12);
        // (-1)^(1/2) = i, whose real part is zero.
        assert_relative_eq!(real_pow(-1.0, 0.5), 0.0, epsilon = 1e-12);
    }
}

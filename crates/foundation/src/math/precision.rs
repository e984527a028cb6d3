//! Precision policies.
//!
//! Geometry comparisons in the engine go through these helpers so that the
//! tolerance is the same everywhere.

/// Tolerance (degrees or meters) under which two coordinates are the same vertex.
pub const COORD_EPSILON: f64 = 1e-9;

/// Canonicalize a floating-point value for deterministic output.
///
/// Rules:
/// - `-0.0` becomes `0.0`
/// - all NaNs become a single canonical NaN
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        // Handles +0.0 and -0.0.
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= COORD_EPSILON
}

#[cfg(test)]
mod tests {
    use super::{approx_eq, canonical_f64};

    #[test]
    fn canonicalizes_negative_zero() {
        assert!(canonical_f64(-0.0).is_sign_positive());
        assert_eq!(canonical_f64(0.0), 0.0);
        assert!(canonical_f64(f64::NAN).is_nan());
    }

    #[test]
    fn approx_eq_uses_shared_tolerance() {
        assert!(approx_eq(1.0, 1.0 + 1e-12));
        assert!(!approx_eq(1.0, 1.0001));
    }
}

use crate::MxError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-9,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, MxError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(MxError::NonFinite { what, value: v })
    }
}

/// Round to the nearest multiple of `step` (halves away from zero).
pub fn round_to_step(v: Real, step: Real) -> Real {
    (v / step).round() * step
}

/// Round to a fixed number of decimal places.
pub fn round_to_decimals(v: Real, decimals: u32) -> Real {
    let scale = 10f64.powi(decimals as i32);
    (v * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn round_to_step_multiples_of_five() {
        assert_eq!(round_to_step(279.9, 5.0), 280.0);
        assert_eq!(round_to_step(277.4, 5.0), 275.0);
        assert_eq!(round_to_step(277.5, 5.0), 280.0);
    }

    #[test]
    fn round_to_decimals_basic() {
        assert_eq!(round_to_decimals(0.643_09, 3), 0.643);
        assert_eq!(round_to_decimals(246.004, 2), 246.0);
    }
}

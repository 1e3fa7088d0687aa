//! Conversion from log space back to ordinary floats.

use crate::{Float, MathError, MathResult};

/// Natural logarithm of [`f64::MAX`].
pub const LN_FLOAT_MAX: Float = 709.782712893384;

/// Returns `e^ln_value`, or [`MathError::NumericOverflow`] if the result is
/// not representable.
///
/// Underflow is not an error: tiny results become subnormal or `0.0`.
pub fn exp_checked(ln_value: Float) -> MathResult<Float> {
    if ln_value.is_nan() {
        return Err(MathError::OutOfDomain {
            function: "exp",
            x: ln_value,
        });
    }
    if ln_value > LN_FLOAT_MAX {
        return Err(MathError::NumericOverflow { ln_value });
    }
    let value = ln_value.exp();
    if value.is_infinite() {
        return Err(MathError::NumericOverflow { ln_value });
    }
    Ok(value)
}

/// Returns `direct` if it is a finite normal float, and otherwise falls back
/// to `e^ln_value`.
///
/// `direct` is usually computed with fewer roundings than the log-space value,
/// but it may have overflowed to infinity or underflowed to zero even when
/// the true result is representable (or vice versa).
pub fn eval_positive(direct: Float, ln_value: Float) -> MathResult<Float> {
    if direct.is_normal() && direct > 0.0 {
        Ok(direct)
    } else {
        exp_checked(ln_value)
    }
}

/// Returns `e^(ln_a - ln_b)`, the ratio of two positive quantities given by
/// their logarithms.
pub fn ratio_from_ln(ln_a: Float, ln_b: Float) -> MathResult<Float> {
    exp_checked(ln_a - ln_b)
}

//! Approximate comparison functions that automatically use [`EPSILON`].

pub use approx::AbsDiffEq;

use crate::{EPSILON, Float};

/// Compares two numbers, but considers them equal if they are separated by less
/// than `EPSILON`.
///
/// Handles infinity specially.
pub fn approx_eq<T: AbsDiffEq<Epsilon = Float>>(a: &T, b: &T) -> bool {
    // use native float equality to handle infinities
    a == b || approx::abs_diff_eq!(a, b, epsilon = EPSILON)
}

/// Compares two numbers, but considers them equal if they are separated by
/// less than `max_relative` times the larger magnitude.
pub fn approx_eq_rel(a: Float, b: Float, max_relative: Float) -> bool {
    a == b || approx::relative_eq!(a, b, epsilon = 0.0, max_relative = max_relative)
}

/// Compares two numbers, but considers them equal if they are separated by less
/// than `EPSILON`.
pub fn approx_cmp<T: AbsDiffEq<Epsilon = Float> + PartialOrd>(a: &T, b: &T) -> std::cmp::Ordering {
    if approx_eq(a, b) {
        std::cmp::Ordering::Equal
    } else if a < b {
        std::cmp::Ordering::Less
    } else {
        std::cmp::Ordering::Greater
    }
}

/// Returns whether one number is less than another by at least `EPSILON`.
pub fn approx_lt<T: AbsDiffEq<Epsilon = Float> + PartialOrd>(a: &T, b: &T) -> bool {
    a < b && !approx_eq(a, b)
}
/// Returns whether one number is greater than another by at least `EPSILON`.
pub fn approx_gt<T: AbsDiffEq<Epsilon = Float> + PartialOrd>(a: &T, b: &T) -> bool {
    a > b && !approx_eq(a, b)
}

/// Returns whether `x` is greater than `EPSILON`.
pub fn is_approx_positive(x: Float) -> bool {
    approx_gt(&x, &0.0)
}

/// Returns `f` as an integer if it is exactly an integer.
pub fn to_exact_integer(f: Float) -> Option<u64> {
    (f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as Float).then_some(f as u64)
}

/// Returns `2f` as an integer if `f` is exactly a non-negative half-integer
/// (such as `1.5` or `4.0`).
pub fn to_exact_half_integer(f: Float) -> Option<u64> {
    to_exact_integer(f * 2.0)
}

//! Special functions, log-space evaluation, and quadrature for N-dimensional
//! solid geometry.
//!
//! Volumes of N-dimensional solids grow or shrink exponentially with the
//! number of dimensions, so most functions here come in two flavors: one that
//! returns the value directly and one that returns its natural logarithm. The
//! logarithm is always finite for valid input; the direct value is only
//! produced once it is known to be representable (see [`exp_checked()`]).

pub use approx;

/// Floating-point type used for geometry.
pub type Float = f64;

/// Small floating-point value used for comparisons and tiny offsets.
pub const EPSILON: Float = 0.000001;

/// Asserts that both arguments are approximately equal.
#[macro_export]
macro_rules! assert_approx_eq {
    ($a:expr, $b:expr $(,)?) => {
        $crate::approx::assert_abs_diff_eq!($a, $b, epsilon = $crate::EPSILON)
    };
}

pub mod approx_cmp;
pub mod ball;
pub mod combinatorics;
mod error;
pub mod gamma;
pub mod log_space;
pub mod quadrature;

pub use error::{MathError, MathResult};

/// Structs, traits, functions, and constants.
pub mod prelude {
    pub use crate::approx_cmp::*;
    pub use crate::ball::{
        BallProfile, BallProfileEntry, ball_profile, ln_unit_ball_volume, ln_unit_sphere_area,
    };
    pub use crate::combinatorics::{binomial, checked_pow2};
    pub use crate::gamma::{GammaMemo, gamma, ln_gamma, ln_gamma_doubled};
    pub use crate::log_space::{eval_positive, exp_checked, ratio_from_ln};
    pub use crate::quadrature::adaptive_simpson;
    pub use crate::{EPSILON, Float, MathError, MathResult};
}
pub use prelude::*;

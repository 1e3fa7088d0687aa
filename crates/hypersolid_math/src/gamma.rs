//! Gamma function and its logarithm.
//!
//! Volumes of N-dimensional balls only ever need Γ at integers and
//! half-integers, so those arguments are evaluated exactly by product. Every
//! other positive argument goes through a Lanczos approximation.

use std::collections::HashMap;
use std::f64::consts::PI;

use crate::approx_cmp::to_exact_half_integer;
use crate::{Float, MathError, MathResult};

/// Lanczos parameter `g`.
const LANCZOS_G: Float = 7.0;
/// Lanczos coefficients for `g = 7`, `n = 9`.
#[allow(clippy::excessive_precision)]
const LANCZOS_COEFFICIENTS: [Float; 9] = [
    0.99999999999980993,
    676.5203681218851,
    -1259.1392167224028,
    771.32342877765313,
    -176.61502916214059,
    12.507343278686905,
    -0.13857109526572012,
    9.9843695780195716e-6,
    1.5056327351493116e-7,
];

/// Largest doubled argument that is evaluated by exact product.
const MAX_EXACT_DOUBLED: u64 = 400;

fn check_domain(function: &'static str, x: Float) -> MathResult<()> {
    if x.is_nan() || x <= 0.0 || x.is_infinite() {
        return Err(MathError::OutOfDomain { function, x });
    }
    Ok(())
}

/// Returns Γ(`x`) for `x > 0`.
///
/// Returns [`MathError::NumericOverflow`] if the result is larger than
/// [`f64::MAX`] (roughly `x > 171.6`).
pub fn gamma(x: Float) -> MathResult<Float> {
    check_domain("gamma", x)?;

    let direct = match to_exact_half_integer(x).filter(|&n| n <= MAX_EXACT_DOUBLED) {
        Some(doubled) if doubled % 2 == 0 => {
            // (n-1)!
            (1..doubled / 2).map(|k| k as Float).product::<Float>()
        }
        Some(doubled) => {
            // sqrt(pi) * (1/2) * (3/2) * ... * (x-1)
            (0..doubled / 2).map(|k| k as Float + 0.5).product::<Float>() * PI.sqrt()
        }
        None if x < 0.5 => PI / ((PI * x).sin() * lanczos(1.0 - x)),
        None => lanczos(x),
    };

    if direct.is_finite() {
        Ok(direct)
    } else {
        Err(MathError::NumericOverflow {
            ln_value: ln_gamma(x)?,
        })
    }
}

/// Returns ln Γ(`x`) for `x > 0`.
///
/// This is finite for every valid argument, even where Γ itself overflows.
pub fn ln_gamma(x: Float) -> MathResult<Float> {
    check_domain("ln_gamma", x)?;

    Ok(match to_exact_half_integer(x) {
        Some(doubled) => ln_gamma_doubled(doubled),
        None if x < 0.5 => PI.ln() - (PI * x).sin().ln() - ln_lanczos(1.0 - x),
        None => ln_lanczos(x),
    })
}

/// Returns ln Γ(`n`/2).
///
/// This never fails for `n >= 1`. Γ has a pole at 0, so `n = 0` gives
/// infinity.
pub fn ln_gamma_doubled(n: u64) -> Float {
    match n {
        0 => Float::INFINITY,
        n if n > MAX_EXACT_DOUBLED => ln_lanczos(n as Float / 2.0),
        n if n % 2 == 0 => (1..n / 2).map(|k| (k as Float).ln()).sum(),
        n => (0..n / 2).map(|k| (k as Float + 0.5).ln()).sum::<Float>() + 0.5 * PI.ln(),
    }
}

/// Lanczos series sum `A_g(x - 1)` and the shifted base `t`.
fn lanczos_parts(x: Float) -> (Float, Float) {
    let x = x - 1.0;
    let [c0, rest @ ..] = LANCZOS_COEFFICIENTS;
    let a = rest
        .iter()
        .enumerate()
        .fold(c0, |acc, (i, &c)| acc + c / (x + i as Float + 1.0));
    let t = x + LANCZOS_G + 0.5;
    (a, t)
}

/// Γ(`x`) for `x >= 0.5`.
fn lanczos(x: Float) -> Float {
    let (a, t) = lanczos_parts(x);
    // t^(x - 1/2) e^(-t) would overflow on its own well before Γ does
    (2.0 * PI).sqrt() * ((x - 0.5) * t.ln() - t).exp() * a
}

/// ln Γ(`x`) for `x >= 0.5`.
fn ln_lanczos(x: Float) -> Float {
    let (a, t) = lanczos_parts(x);
    0.5 * (2.0 * PI).ln() + (x - 0.5) * t.ln() - t + a.ln()
}

/// Caller-owned memo of ln Γ at half-integer arguments.
///
/// Sweeping many dimensions (such as in [`crate::ball::ball_profile()`])
/// evaluates ln Γ(d/2 + 1) for every `d`, and each exact evaluation is a
/// product of `O(d)` terms. The memo extends previously computed values by
/// one factor at a time instead.
#[derive(Debug, Default, Clone)]
pub struct GammaMemo {
    /// ln Γ(n/2), keyed by `n`.
    doubled_args: HashMap<u64, Float>,
}
impl GammaMemo {
    /// Constructs an empty memo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of memoized values.
    pub fn len(&self) -> usize {
        self.doubled_args.len()
    }
    /// Returns whether no values are memoized.
    pub fn is_empty(&self) -> bool {
        self.doubled_args.is_empty()
    }

    /// Returns ln Γ(`x`), memoizing the result if `x` is a half-integer.
    pub fn ln_gamma(&mut self, x: Float) -> MathResult<Float> {
        check_domain("ln_gamma", x)?;
        match to_exact_half_integer(x) {
            Some(doubled) => Ok(self.memoized_ln_gamma_doubled(doubled)),
            None => ln_gamma(x),
        }
    }

    /// Returns ln Γ(`n`/2) for `n >= 1`.
    fn memoized_ln_gamma_doubled(&mut self, n: u64) -> Float {
        if let Some(&value) = self.doubled_args.get(&n) {
            return value;
        }

        // Walk down by steps of 1 (2 in doubled units) to the nearest known
        // value or a base case, then fill in upward.
        let mut base = n;
        let mut base_value = None;
        while base > 2 {
            if let Some(&value) = self.doubled_args.get(&base) {
                base_value = Some(value);
                break;
            }
            base -= 2;
        }
        let mut value = base_value.unwrap_or(match base {
            1 => 0.5 * PI.ln(), // Γ(1/2) = sqrt(pi)
            _ => 0.0,           // Γ(1) = 1
        });
        self.doubled_args.insert(base, value);
        let mut m = base;
        while m < n {
            // Γ(x + 1) = x Γ(x)
            value += (m as Float / 2.0).ln();
            m += 2;
            self.doubled_args.insert(m, value);
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_gamma_exact_arguments() {
        assert_eq!(gamma(1.0), Ok(1.0));
        assert_eq!(gamma(2.0), Ok(1.0));
        assert_eq!(gamma(5.0), Ok(24.0));
        assert_eq!(gamma(11.0), Ok(3628800.0));
        assert_relative_eq!(gamma(0.5).unwrap(), PI.sqrt(), max_relative = 1e-15);
        assert_relative_eq!(
            gamma(2.5).unwrap(),
            0.75 * PI.sqrt(),
            max_relative = 1e-15,
        );
    }

    #[test]
    fn test_gamma_lanczos_arguments() {
        assert_relative_eq!(gamma(1.0 / 3.0).unwrap(), 2.678938534707747, max_relative = 1e-10);
        assert_relative_eq!(gamma(0.1).unwrap(), 9.513507698668732, max_relative = 1e-10);
        assert_relative_eq!(gamma(4.2).unwrap(), 7.756689535793181, max_relative = 1e-10);
    }

    #[test]
    fn test_gamma_domain() {
        assert!(matches!(gamma(0.0), Err(MathError::OutOfDomain { .. })));
        assert!(matches!(gamma(-1.5), Err(MathError::OutOfDomain { .. })));
        assert!(matches!(gamma(Float::NAN), Err(MathError::OutOfDomain { .. })));
        assert!(matches!(ln_gamma(-3.0), Err(MathError::OutOfDomain { .. })));
    }

    #[test]
    fn test_gamma_overflow() {
        assert!(gamma(171.0).is_ok());
        let Err(MathError::NumericOverflow { ln_value }) = gamma(172.0) else {
            panic!("expected overflow");
        };
        assert_relative_eq!(ln_value, ln_gamma(172.0).unwrap());
        assert!(matches!(gamma(200.3), Err(MathError::NumericOverflow { .. })));
    }

    #[test]
    fn test_ln_gamma_large() {
        // Stirling: ln Γ(1000) = 5905.220423209181...
        assert_relative_eq!(ln_gamma(1000.0).unwrap(), 5905.220423209181, max_relative = 1e-12);
        assert!(ln_gamma(1e6 + 0.25).unwrap().is_finite());
    }

    #[test]
    fn test_ln_gamma_doubled() {
        assert_eq!(ln_gamma_doubled(0), Float::INFINITY);
        assert_eq!(ln_gamma_doubled(2), 0.0);
        assert_relative_eq!(ln_gamma_doubled(7), ln_gamma(3.5).unwrap());
        assert_relative_eq!(ln_gamma_doubled(12), 120.0_f64.ln(), max_relative = 1e-14);
        // exact and Lanczos paths agree at the crossover
        assert_relative_eq!(
            ln_gamma_doubled(MAX_EXACT_DOUBLED),
            ln_lanczos(MAX_EXACT_DOUBLED as Float / 2.0),
            max_relative = 1e-12,
        );
    }

    #[test]
    fn test_gamma_memo() {
        let mut memo = GammaMemo::new();
        assert!(memo.is_empty());
        for doubled in (1..=120).rev() {
            let x = doubled as Float / 2.0;
            assert_relative_eq!(
                memo.ln_gamma(x).unwrap(),
                ln_gamma(x).unwrap(),
                epsilon = 1e-12,
                max_relative = 1e-12,
            );
        }
        assert_eq!(memo.len(), 120);
        assert_relative_eq!(memo.ln_gamma(1.3).unwrap(), ln_gamma(1.3).unwrap());
        assert!(memo.ln_gamma(0.0).is_err());
    }

    proptest! {
        #[test]
        fn proptest_gamma_recurrence(x in 0.01_f64..100.0) {
            // Γ(x + 1) = x Γ(x)
            let lhs = ln_gamma(x + 1.0).unwrap();
            let rhs = x.ln() + ln_gamma(x).unwrap();
            prop_assert!((lhs - rhs).abs() <= 1e-9 * (1.0 + lhs.abs()));
        }

        #[test]
        fn proptest_gamma_matches_ln_gamma(x in 0.05_f64..150.0) {
            let g = gamma(x).unwrap();
            let ln = ln_gamma(x).unwrap();
            prop_assert!((g.ln() - ln).abs() <= 1e-9 * (1.0 + ln.abs()));
        }
    }
}

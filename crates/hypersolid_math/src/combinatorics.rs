//! Exact integer combinatorics for face counts.
//!
//! Every function returns `None` instead of wrapping when the result does not
//! fit in a `u128`.

/// Returns the binomial coefficient `n` choose `k`, which is 0 if `k > n`.
pub fn binomial(n: u32, k: u32) -> Option<u128> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    // C(n, i+1) = C(n, i) * (n-i) / (i+1), and the division is always exact.
    (0..k).try_fold(1_u128, |acc, i| {
        Some(acc.checked_mul((n - i) as u128)? / (i as u128 + 1))
    })
}

/// Returns `2^n`.
pub fn checked_pow2(n: u32) -> Option<u128> {
    1_u128.checked_shl(n)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(0, 0), Some(1));
        assert_eq!(binomial(5, 2), Some(10));
        assert_eq!(binomial(5, 6), Some(0));
        assert_eq!(binomial(100, 50), Some(100891344545564193334812497256));
        assert_eq!(binomial(200, 100), None);
    }

    #[test]
    fn test_checked_pow2() {
        assert_eq!(checked_pow2(0), Some(1));
        assert_eq!(checked_pow2(10), Some(1024));
        assert_eq!(checked_pow2(127), Some(1 << 127));
        assert_eq!(checked_pow2(128), None);
    }

    proptest! {
        #[test]
        fn proptest_pascal_rule(n in 1_u32..60, k in 1_u32..60) {
            let lhs = binomial(n, k).unwrap();
            let rhs = binomial(n - 1, k - 1).unwrap() + binomial(n - 1, k).unwrap();
            prop_assert_eq!(lhs, rhs);
        }

        #[test]
        fn proptest_binomial_row_sum(n in 0_u32..100) {
            let sum: u128 = (0..=n).map(|k| binomial(n, k).unwrap()).sum();
            prop_assert_eq!(Some(sum), checked_pow2(n));
        }
    }
}

//! Numerical integration.

use crate::Float;

/// Maximum recursion depth for adaptive subdivision.
const MAX_DEPTH: u32 = 48;
/// Number of panels the interval is split into before adapting.
const INITIAL_PANELS: usize = 8;

/// One Simpson panel: endpoints, midpoint, and the Simpson estimate over it.
#[derive(Debug, Copy, Clone)]
struct Panel {
    a: Float,
    fa: Float,
    m: Float,
    fm: Float,
    b: Float,
    fb: Float,
    estimate: Float,
}
impl Panel {
    fn new(f: &impl Fn(Float) -> Float, a: Float, fa: Float, b: Float, fb: Float) -> Self {
        let m = (a + b) / 2.0;
        let fm = f(m);
        let estimate = (b - a) / 6.0 * (fa + 4.0 * fm + fb);
        Self {
            a,
            fa,
            m,
            fm,
            b,
            fb,
            estimate,
        }
    }
}

/// Integrates `f` over `[a, b]` using adaptive Simpson's rule until the
/// estimated error is below `rel_tol` times the magnitude of the integral.
///
/// `f` must be finite on the closed interval.
pub fn adaptive_simpson(f: impl Fn(Float) -> Float, a: Float, b: Float, rel_tol: Float) -> Float {
    if a == b {
        return 0.0;
    }

    let step = (b - a) / INITIAL_PANELS as Float;
    let mut x0 = a;
    let mut f0 = f(a);
    let mut panels = Vec::with_capacity(INITIAL_PANELS);
    for i in 1..=INITIAL_PANELS {
        let x1 = if i == INITIAL_PANELS { b } else { a + step * i as Float };
        let f1 = f(x1);
        panels.push(Panel::new(&f, x0, f0, x1, f1));
        (x0, f0) = (x1, f1);
    }

    let coarse: Float = panels.iter().map(|p| p.estimate).sum();
    let tol = rel_tol * coarse.abs() / INITIAL_PANELS as Float;
    let mut depth_exhausted = false;
    let total = panels
        .into_iter()
        .map(|p| refine(&f, p, tol, MAX_DEPTH, &mut depth_exhausted))
        .sum();
    if depth_exhausted {
        log::debug!("adaptive Simpson reached maximum depth on [{a}, {b}]");
    }
    total
}

fn refine(
    f: &impl Fn(Float) -> Float,
    p: Panel,
    tol: Float,
    depth: u32,
    depth_exhausted: &mut bool,
) -> Float {
    let left = Panel::new(f, p.a, p.fa, p.m, p.fm);
    let right = Panel::new(f, p.m, p.fm, p.b, p.fb);
    let sum = left.estimate + right.estimate;
    let delta = sum - p.estimate;

    // Errors smaller than rounding noise can never be resolved.
    let tol = tol.max(sum.abs() * Float::EPSILON * 64.0);

    if delta.abs() <= 15.0 * tol || left.m == p.a || right.m == p.b {
        sum + delta / 15.0
    } else if depth == 0 {
        *depth_exhausted = true;
        sum + delta / 15.0
    } else {
        refine(f, left, tol / 2.0, depth - 1, depth_exhausted)
            + refine(f, right, tol / 2.0, depth - 1, depth_exhausted)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_polynomial_exact() {
        // Simpson's rule is exact for cubics.
        let v = adaptive_simpson(|x| x * x * x - 2.0 * x + 1.0, 0.0, 2.0, 1e-12);
        assert_relative_eq!(v, 2.0, max_relative = 1e-14);
    }

    #[test]
    fn test_smooth_functions() {
        assert_relative_eq!(
            adaptive_simpson(Float::sin, 0.0, PI, 1e-12),
            2.0,
            max_relative = 1e-11,
        );
        assert_relative_eq!(
            adaptive_simpson(|x| 1.0 / (1.0 + x * x), 0.0, 1.0, 1e-12),
            PI / 4.0,
            max_relative = 1e-11,
        );
        assert_relative_eq!(
            adaptive_simpson(Float::exp, -1.0, 1.0, 1e-12),
            1.0_f64.exp() - (-1.0_f64).exp(),
            max_relative = 1e-11,
        );
    }

    #[test]
    fn test_sharp_peak() {
        // narrow Lorentzian; integral = atan(100) - atan(-100)
        let v = adaptive_simpson(|x| 100.0 / (1.0 + 10000.0 * x * x), -1.0, 1.0, 1e-10);
        assert_relative_eq!(v, 2.0 * 100.0_f64.atan(), max_relative = 1e-9);
    }

    #[test]
    fn test_empty_and_reversed_interval() {
        assert_eq!(adaptive_simpson(|x| x, 1.0, 1.0, 1e-12), 0.0);
        assert_relative_eq!(
            adaptive_simpson(|x| x, 1.0, 0.0, 1e-12),
            -0.5,
            max_relative = 1e-14,
        );
    }
}

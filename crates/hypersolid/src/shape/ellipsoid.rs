use std::f64::consts::{FRAC_PI_2, LN_2, PI};

use float_ord::FloatOrd;
use hypersolid_math::approx_cmp::approx_eq_rel;
use hypersolid_math::{
    Float, adaptive_simpson, ln_gamma_doubled, ln_unit_ball_volume, ln_unit_sphere_area,
};
use serde::Serialize;
use smallvec::SmallVec;

use super::{
    Properties, PropertyValue, ShapeKind, Solid, check_point, check_slice, validate_ndim,
    validate_param,
};
use crate::{Limits, QueryError, ShapeValidationError};

/// Relative tolerance for the surface area integral.
const SURFACE_RELATIVE_TOLERANCE: Float = 1e-12;
/// Relative tolerance for deciding that all semi-axes are equal.
const SPHERE_RELATIVE_TOLERANCE: Float = 1e-10;

/// Axis-aligned ellipsoid in `ndim` dimensions, with one semi-axis per
/// dimension, centered at the origin.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HyperEllipsoid {
    semi_axes: SmallVec<[Float; 8]>,
}
impl HyperEllipsoid {
    /// Constructs a hyperellipsoid, checking against the default [`Limits`].
    /// The number of dimensions is the number of semi-axes.
    pub fn new(semi_axes: &[Float]) -> Result<Self, ShapeValidationError> {
        Self::with_limits(semi_axes, &Limits::default())
    }
    /// Constructs a hyperellipsoid, checking against `limits`.
    pub fn with_limits(semi_axes: &[Float], limits: &Limits) -> Result<Self, ShapeValidationError> {
        let ndim = u32::try_from(semi_axes.len()).unwrap_or(u32::MAX);
        validate_ndim(ShapeKind::Ellipsoid, ndim, limits)?;
        let semi_axes = semi_axes
            .iter()
            .map(|&a| validate_param("semi_axis", a))
            .collect::<Result<_, _>>()?;
        Ok(Self { semi_axes })
    }

    /// Returns the semi-axes.
    pub fn semi_axes(&self) -> &[Float] {
        &self.semi_axes
    }

    fn min_axis(&self) -> Float {
        self.semi_axes.iter().copied().map(FloatOrd).min().map_or(0.0, |x| x.0)
    }
    fn max_axis(&self) -> Float {
        self.semi_axes.iter().copied().map(FloatOrd).max().map_or(0.0, |x| x.0)
    }

    /// Returns whether all semi-axes are equal within a relative tolerance of
    /// 1e-10.
    pub fn is_sphere(&self) -> bool {
        approx_eq_rel(self.min_axis(), self.max_axis(), SPHERE_RELATIVE_TOLERANCE)
    }

    /// Returns the eccentricity `√(1 - (a_min/a_max)²)`.
    ///
    /// In 2 dimensions this is the classical eccentricity of the ellipse. In
    /// higher dimensions it is the largest eccentricity of any axis-aligned
    /// cross section.
    pub fn eccentricity(&self) -> Float {
        let ratio = self.min_axis() / self.max_axis();
        (1.0 - ratio * ratio).max(0.0).sqrt()
    }

    /// Returns the radius of the sphere with the same volume, which is the
    /// geometric mean of the semi-axes.
    pub fn mean_radius(&self) -> Float {
        let n = self.semi_axes.len() as Float;
        (self.semi_axes.iter().map(|a| a.ln()).sum::<Float>() / n).exp()
    }

    /// Returns Ramanujan's second approximation of the perimeter, or `None`
    /// if this is not a 2D ellipse.
    pub fn ramanujan_perimeter(&self) -> Option<Float> {
        let &[a, b] = self.semi_axes.as_slice() else {
            return None;
        };
        let h = ((a - b) / (a + b)).powi(2);
        Some(PI * (a + b) * (1.0 + 3.0 * h / (10.0 + (4.0 - 3.0 * h).sqrt())))
    }
}

/// Returns `E[√Q(g)]` for a standard normal vector `g`, where
/// `Q(x) = Σ cᵢxᵢ²`.
///
/// Uses `√q = (1/2√π) ∫₀^∞ (1 - e^(-sq)) s^(-3/2) ds` and the Gaussian moment
/// generating function `E[e^(-sQ(g))] = Π (1 + 2scᵢ)^(-1/2)`, then substitutes
/// `s = tan²φ` to get a smooth integrand on a finite interval.
fn expected_sqrt_quadratic_form(c: &[Float]) -> Float {
    let integrand = |phi: Float| {
        if phi == 0.0 {
            return c.iter().sum();
        }
        let t = phi.tan().powi(2);
        let ln_p = -0.5 * c.iter().map(|&ci| (2.0 * t * ci).ln_1p()).sum::<Float>();
        // 1 - p, without cancellation when p is close to 1
        let one_minus_p = -ln_p.exp_m1();
        one_minus_p / phi.sin().powi(2)
    };
    adaptive_simpson(integrand, 0.0, FRAC_PI_2, SURFACE_RELATIVE_TOLERANCE) / PI.sqrt()
}

impl Solid for HyperEllipsoid {
    fn ndim(&self) -> u8 {
        self.semi_axes.len() as u8
    }
    fn kind(&self) -> ShapeKind {
        ShapeKind::Ellipsoid
    }

    fn ln_volume(&self) -> Float {
        let ln_axes_product = self.semi_axes.iter().map(|a| a.ln()).sum::<Float>();
        ln_unit_ball_volume(self.ndim() as u32) + ln_axes_product
    }

    fn ln_surface_area(&self) -> Float {
        // The ellipsoid is the image of the unit sphere under A = diag(a), so
        //
        //     S = det(A) ∫ |A⁻¹u| du = Π aᵢ · |S^(d-1)| · E_u[√Q(u)]
        //
        // over the unit sphere, with cᵢ = 1/aᵢ². Since √Q is homogeneous,
        // E_u[√Q(u)] = E_g[√Q(g)] / E|g| for a standard normal g.
        let d = self.ndim() as u32;
        let a_max = self.max_axis();
        let ln_a_max = a_max.ln();
        let ln_sphere = ln_unit_sphere_area(d);

        if self.semi_axes.iter().all(|&a| a == a_max) {
            return ln_sphere + (d as Float - 1.0) * ln_a_max;
        }

        // Normalize so that the largest semi-axis is 1.
        let normalized: SmallVec<[Float; 8]> =
            self.semi_axes.iter().map(|a| a / a_max).collect();
        let c: SmallVec<[Float; 8]> = normalized.iter().map(|b| 1.0 / (b * b)).collect();

        // E|g| = √2 Γ((d+1)/2) / Γ(d/2)
        let ln_expected_norm =
            0.5 * LN_2 + ln_gamma_doubled(d as u64 + 1) - ln_gamma_doubled(d as u64);

        (d as Float - 1.0) * ln_a_max
            + normalized.iter().map(|b| b.ln()).sum::<Float>()
            + ln_sphere
            + expected_sqrt_quadratic_form(&c).ln()
            - ln_expected_norm
    }

    fn contains_point(&self, point: &[Float]) -> Result<bool, QueryError> {
        check_point(self.ndim(), point)?;
        let q: Float = std::iter::zip(point, &self.semi_axes)
            .map(|(x, a)| (x / a).powi(2))
            .sum();
        Ok(q <= 1.0)
    }
    fn ln_cross_section(&self, axis: usize, offset: Float) -> Result<Float, QueryError> {
        check_slice(self.ndim(), axis, offset)?;
        let u = (offset / self.semi_axes[axis]).abs();
        if u > 1.0 {
            return Ok(Float::NEG_INFINITY);
        }
        // The slice is an ellipsoid with the remaining semi-axes scaled by
        // √(1 - u²).
        let d = self.ndim() as u32 - 1;
        let ln_other_axes = self
            .semi_axes
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != axis)
            .map(|(_, a)| a.ln())
            .sum::<Float>();
        let ln_scale = 0.5 * ((1.0 - u).ln() + (1.0 + u).ln());
        Ok(ln_unit_ball_volume(d) + ln_other_axes + d as Float * ln_scale)
    }

    fn extra_properties(&self) -> Properties {
        let mut props = Properties::new();
        props.insert("eccentricity", PropertyValue::Real(self.eccentricity()));
        props.insert(
            "axis_ratio",
            PropertyValue::Real(self.max_axis() / self.min_axis()),
        );
        props.insert("is_sphere", PropertyValue::Flag(self.is_sphere()));
        props.insert("mean_radius", PropertyValue::Real(self.mean_radius()));
        if let Some(p) = self.ramanujan_perimeter() {
            props.insert("ramanujan_perimeter", PropertyValue::Real(p));
        }
        props
    }

    fn name(&self) -> String {
        match (self.is_sphere(), self.ndim()) {
            (true, 2) => "Circle".to_owned(),
            (true, 3) => "Sphere".to_owned(),
            (true, d) => format!("{d}D HyperSphere"),
            (false, 2) => "Ellipse".to_owned(),
            (false, 3) => "Ellipsoid".to_owned(),
            (false, d) => format!("{d}D HyperEllipsoid"),
        }
    }
    fn volume_formula(&self) -> String {
        match self.ndim() {
            2 => "V = πab".to_owned(),
            3 => "V = (4/3)πabc".to_owned(),
            d => format!("V = π^({d}/2) / Γ({d}/2 + 1) · a₁a₂⋯a{d}"),
        }
    }
    fn surface_area_formula(&self) -> String {
        match self.ndim() {
            2 => "P = 4a·E(e)".to_owned(),
            d => format!("S = a₁a₂⋯a{d} · |S^{}| · E[√(Σ uᵢ²/aᵢ²)]", d - 1),
        }
    }
}

use hypersolid_math::{Float, MathResult, binomial, checked_pow2, eval_positive};
use serde::Serialize;

use super::properties::insert_count;
use super::{
    Properties, PropertyValue, ShapeKind, Solid, check_point, check_slice, validate_ndim,
    validate_param,
};
use crate::{Limits, QueryError, ShapeValidationError};

/// Measure polytope with side length `s` in `ndim` dimensions, occupying
/// `[0, s]` along every axis.
#[derive(Serialize, Debug, Copy, Clone, PartialEq)]
pub struct HyperCube {
    ndim: u8,
    side_length: Float,
}
impl HyperCube {
    /// Constructs a hypercube, checking against the default [`Limits`].
    pub fn new(ndim: u32, side_length: Float) -> Result<Self, ShapeValidationError> {
        Self::with_limits(ndim, side_length, &Limits::default())
    }
    /// Constructs a hypercube, checking against `limits`.
    pub fn with_limits(
        ndim: u32,
        side_length: Float,
        limits: &Limits,
    ) -> Result<Self, ShapeValidationError> {
        Ok(Self {
            ndim: validate_ndim(ShapeKind::Cube, ndim, limits)?,
            side_length: validate_param("side_length", side_length)?,
        })
    }

    /// Returns the side length.
    pub fn side_length(&self) -> Float {
        self.side_length
    }
}

/// Returns the number of `k`-faces of a `d`-cube, `C(d, k) · 2^(d-k)`.
pub(super) fn cube_face_count(d: u32, k: u32) -> Option<u128> {
    if k > d {
        return Some(0);
    }
    binomial(d, k)?.checked_mul(checked_pow2(d - k)?)
}

impl Solid for HyperCube {
    fn ndim(&self) -> u8 {
        self.ndim
    }
    fn kind(&self) -> ShapeKind {
        ShapeKind::Cube
    }

    fn ln_volume(&self) -> Float {
        self.ndim as Float * self.side_length.ln()
    }
    fn ln_surface_area(&self) -> Float {
        let d = self.ndim as Float;
        (2.0 * d).ln() + (d - 1.0) * self.side_length.ln()
    }

    fn volume(&self) -> MathResult<Float> {
        let direct = self.side_length.powi(self.ndim as i32);
        eval_positive(direct, self.ln_volume())
    }
    fn surface_area(&self) -> MathResult<Float> {
        let d = self.ndim as i32;
        let direct = 2.0 * d as Float * self.side_length.powi(d - 1);
        eval_positive(direct, self.ln_surface_area())
    }

    fn contains_point(&self, point: &[Float]) -> Result<bool, QueryError> {
        check_point(self.ndim, point)?;
        Ok(point.iter().all(|x| (0.0..=self.side_length).contains(x)))
    }
    fn ln_cross_section(&self, axis: usize, offset: Float) -> Result<Float, QueryError> {
        check_slice(self.ndim, axis, offset)?;
        if !(0.0..=self.side_length).contains(&offset) {
            return Ok(Float::NEG_INFINITY);
        }
        Ok((self.ndim as Float - 1.0) * self.side_length.ln())
    }

    fn extra_properties(&self) -> Properties {
        let d = self.ndim as u32;
        let s = self.side_length;
        let sqrt_d = (d as Float).sqrt();

        let mut props = Properties::new();
        insert_count(&mut props, "vertices", self.face_count(0));
        insert_count(&mut props, "edges", self.face_count(1));
        insert_count(&mut props, "facets", Some(2 * d as u128));
        props.insert("diagonal", PropertyValue::Real(s * sqrt_d));
        props.insert("inradius", PropertyValue::Real(s / 2.0));
        props.insert("circumradius", PropertyValue::Real(s * sqrt_d / 2.0));
        props
    }

    fn face_count(&self, k: u8) -> Option<u128> {
        cube_face_count(self.ndim as u32, k as u32)
    }

    fn name(&self) -> String {
        match self.ndim {
            2 => "Square".to_owned(),
            3 => "Cube".to_owned(),
            d => format!("{d}D HyperCube"),
        }
    }
    fn volume_formula(&self) -> String {
        format!("V = s^{}", self.ndim)
    }
    fn surface_area_formula(&self) -> String {
        let d = self.ndim as u32;
        format!("S = {} · s^{}", 2 * d, d - 1)
    }
}

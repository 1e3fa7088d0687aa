use std::f64::consts::LN_2;

use hypersolid_math::{Float, binomial, ln_gamma_doubled};
use serde::Serialize;
use smallvec::SmallVec;

use super::properties::insert_count;
use super::{
    Properties, PropertyValue, ShapeKind, Solid, check_last_axis_slice, check_point,
    validate_ndim, validate_param,
};
use crate::{Limits, QueryError, ShapeValidationError};

/// Regular simplex with edge length `e` in `ndim` dimensions.
///
/// The first vertex is at the origin and the second is at `e` along axis 0.
/// Each further vertex `k` lies at height [`Simplex::height()`] of a
/// `k`-simplex along axis `k-1`, directly above the centroid of the vertices
/// before it. All coordinates inside are nonnegative, and the last vertex is
/// the apex over the facet in the hyperplane `x_(ndim-1) = 0`.
#[derive(Serialize, Debug, Copy, Clone, PartialEq)]
pub struct Simplex {
    ndim: u8,
    edge_length: Float,
}
impl Simplex {
    /// Constructs a regular simplex, checking against the default [`Limits`].
    pub fn new(ndim: u32, edge_length: Float) -> Result<Self, ShapeValidationError> {
        Self::with_limits(ndim, edge_length, &Limits::default())
    }
    /// Constructs a regular simplex, checking against `limits`.
    pub fn with_limits(
        ndim: u32,
        edge_length: Float,
        limits: &Limits,
    ) -> Result<Self, ShapeValidationError> {
        Ok(Self {
            ndim: validate_ndim(ShapeKind::Simplex, ndim, limits)?,
            edge_length: validate_param("edge_length", edge_length)?,
        })
    }

    /// Returns the edge length.
    pub fn edge_length(&self) -> Float {
        self.edge_length
    }

    /// Returns the radius of the circumscribed sphere, `e √(d / 2(d+1))`.
    pub fn circumradius(&self) -> Float {
        let d = self.ndim as Float;
        self.edge_length * (d / (2.0 * (d + 1.0))).sqrt()
    }
    /// Returns the radius of the inscribed sphere, `e / √(2d(d+1))`.
    pub fn inradius(&self) -> Float {
        let d = self.ndim as Float;
        self.edge_length / (2.0 * d * (d + 1.0)).sqrt()
    }
    /// Returns the distance from a vertex to the opposite facet,
    /// `e √((d+1) / 2d)`.
    pub fn height(&self) -> Float {
        simplex_height(self.ndim as u32, self.edge_length)
    }
}

fn simplex_height(d: u32, e: Float) -> Float {
    let d = d as Float;
    e * ((d + 1.0) / (2.0 * d)).sqrt()
}

/// Returns the natural logarithm of the volume of a regular `d`-simplex with
/// edge length `e`, `e^d / d! · √((d+1) / 2^d)`.
fn ln_regular_simplex_volume(d: u32, e: Float) -> Float {
    let d_f = d as Float;
    d_f * e.ln() - ln_gamma_doubled(2 * d as u64 + 2) + 0.5 * ((d_f + 1.0).ln() - d_f * LN_2)
}

impl Solid for Simplex {
    fn ndim(&self) -> u8 {
        self.ndim
    }
    fn kind(&self) -> ShapeKind {
        ShapeKind::Simplex
    }

    fn ln_volume(&self) -> Float {
        ln_regular_simplex_volume(self.ndim as u32, self.edge_length)
    }
    fn ln_surface_area(&self) -> Float {
        // d+1 facets, each a regular (d-1)-simplex
        let d = self.ndim as u32;
        (d as Float + 1.0).ln() + ln_regular_simplex_volume(d - 1, self.edge_length)
    }

    fn contains_point(&self, point: &[Float]) -> Result<bool, QueryError> {
        check_point(self.ndim, point)?;
        // Peel off one axis at a time. The slice at height `t` along the
        // last remaining axis is the facet below it shrunk toward its
        // centroid by `t / h`.
        let mut p: SmallVec<[Float; 8]> = point.into();
        let mut e = self.edge_length;
        for k in (1..=self.ndim as u32).rev() {
            let h = simplex_height(k, e);
            let t = p[k as usize - 1];
            if !(0.0..=h).contains(&t) {
                return Ok(false);
            }
            let shrink = if h > 0.0 { t / h } else { 0.0 };
            for j in 1..k {
                p[j as usize - 1] -= shrink * simplex_height(j, e) / (j + 1) as Float;
            }
            e *= 1.0 - shrink;
        }
        Ok(true)
    }
    fn ln_cross_section(&self, axis: usize, offset: Float) -> Result<Float, QueryError> {
        check_last_axis_slice(ShapeKind::Simplex, self.ndim, axis, offset)?;
        let h = self.height();
        if !(0.0..=h).contains(&offset) {
            return Ok(Float::NEG_INFINITY);
        }
        let d = self.ndim as u32 - 1;
        if d == 0 {
            return Ok(0.0);
        }
        let e = self.edge_length * (1.0 - offset / h);
        Ok(ln_regular_simplex_volume(d, e))
    }

    fn extra_properties(&self) -> Properties {
        let mut props = Properties::new();
        props.insert("circumradius", PropertyValue::Real(self.circumradius()));
        props.insert("inradius", PropertyValue::Real(self.inradius()));
        props.insert("height", PropertyValue::Real(self.height()));
        insert_count(&mut props, "vertices", self.face_count(0));
        insert_count(&mut props, "edges", self.face_count(1));
        insert_count(&mut props, "facets", Some(self.ndim as u128 + 1));
        props
    }

    fn face_count(&self, k: u8) -> Option<u128> {
        // Every set of k+1 vertices spans a k-face.
        binomial(self.ndim as u32 + 1, k as u32 + 1)
    }

    fn name(&self) -> String {
        match self.ndim {
            1 => "Line Segment".to_owned(),
            2 => "Triangle".to_owned(),
            3 => "Tetrahedron".to_owned(),
            d => format!("{d}D Simplex"),
        }
    }
    fn volume_formula(&self) -> String {
        let d = self.ndim as u32;
        format!("V = e^{d} / {d}! · √({} / 2^{d})", d + 1)
    }
    fn surface_area_formula(&self) -> String {
        let d = self.ndim as u32;
        format!("S = {} · V_{}(e)", d + 1, d - 1)
    }
}

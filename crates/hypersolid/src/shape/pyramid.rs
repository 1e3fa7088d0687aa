use hypersolid_math::{Float, MathResult, eval_positive};
use serde::Serialize;

use super::cube::cube_face_count;
use super::properties::insert_count;
use super::{
    Properties, PropertyValue, ShapeKind, Solid, check_last_axis_slice, check_point,
    validate_ndim, validate_param,
};
use crate::{Limits, QueryError, ShapeValidationError};

/// Right pyramid in `ndim` dimensions whose base is an (`ndim`-1)-cube with
/// edge `base_edge`, with the apex at `height` above the center of the base.
///
/// The base is centered at the origin in the hyperplane `x_(ndim-1) = 0`, and
/// the apex is at `height` along the last axis.
#[derive(Serialize, Debug, Copy, Clone, PartialEq)]
pub struct HyperPyramid {
    ndim: u8,
    base_edge: Float,
    height: Float,
}
impl HyperPyramid {
    /// Constructs a hyperpyramid, checking against the default [`Limits`].
    pub fn new(ndim: u32, base_edge: Float, height: Float) -> Result<Self, ShapeValidationError> {
        Self::with_limits(ndim, base_edge, height, &Limits::default())
    }
    /// Constructs a hyperpyramid, checking against `limits`.
    pub fn with_limits(
        ndim: u32,
        base_edge: Float,
        height: Float,
        limits: &Limits,
    ) -> Result<Self, ShapeValidationError> {
        Ok(Self {
            ndim: validate_ndim(ShapeKind::Pyramid, ndim, limits)?,
            base_edge: validate_param("base_edge", base_edge)?,
            height: validate_param("height", height)?,
        })
    }

    /// Returns the edge length of the base.
    pub fn base_edge(&self) -> Float {
        self.base_edge
    }
    /// Returns the height of the apex above the base.
    pub fn height(&self) -> Float {
        self.height
    }

    /// Returns the height of each lateral facet, measured from the apex to
    /// the center of the base facet it stands on.
    pub fn slant_height(&self) -> Float {
        self.height.hypot(self.base_edge / 2.0)
    }
    /// Returns the distance from the apex to each base vertex.
    pub fn lateral_edge(&self) -> Float {
        let d = self.ndim as Float;
        (self.height.powi(2) + (d - 1.0) * self.base_edge.powi(2) / 4.0).sqrt()
    }
}

impl Solid for HyperPyramid {
    fn ndim(&self) -> u8 {
        self.ndim
    }
    fn kind(&self) -> ShapeKind {
        ShapeKind::Pyramid
    }

    fn ln_volume(&self) -> Float {
        let d = self.ndim as Float;
        (d - 1.0) * self.base_edge.ln() + self.height.ln() - d.ln()
    }
    fn ln_surface_area(&self) -> Float {
        // The base has 2(d-1) facets, each supporting a lateral (d-1)-pyramid
        // of volume b^(d-2) · slant / (d-1). Together with the base:
        //
        //     S = b^(d-1) + 2 b^(d-2) slant = b^(d-2) (b + 2 slant)
        let d = self.ndim as Float;
        (d - 2.0) * self.base_edge.ln() + (self.base_edge + 2.0 * self.slant_height()).ln()
    }

    fn volume(&self) -> MathResult<Float> {
        let d = self.ndim as i32;
        let direct = self.base_edge.powi(d - 1) * self.height / d as Float;
        eval_positive(direct, self.ln_volume())
    }
    fn surface_area(&self) -> MathResult<Float> {
        let d = self.ndim as i32;
        let b = self.base_edge;
        let direct = b.powi(d - 1) + 2.0 * b.powi(d - 2) * self.slant_height();
        eval_positive(direct, self.ln_surface_area())
    }

    fn contains_point(&self, point: &[Float]) -> Result<bool, QueryError> {
        check_point(self.ndim, point)?;
        let Some((&y, base)) = point.split_last() else {
            return Ok(false);
        };
        if !(0.0..=self.height).contains(&y) {
            return Ok(false);
        }
        let half_width = 0.5 * self.base_edge * (1.0 - y / self.height);
        Ok(base.iter().all(|x| x.abs() <= half_width))
    }
    fn ln_cross_section(&self, axis: usize, offset: Float) -> Result<Float, QueryError> {
        check_last_axis_slice(ShapeKind::Pyramid, self.ndim, axis, offset)?;
        if !(0.0..=self.height).contains(&offset) {
            return Ok(Float::NEG_INFINITY);
        }
        // The slice is an (`ndim`-1)-cube with edge `b (1 - t/h)`.
        let ln_edge = self.base_edge.ln() + (1.0 - offset / self.height).ln();
        Ok((self.ndim as Float - 1.0) * ln_edge)
    }

    fn extra_properties(&self) -> Properties {
        let d = self.ndim as u32;
        let mut props = Properties::new();
        props.insert("slant_height", PropertyValue::Real(self.slant_height()));
        props.insert("lateral_edge", PropertyValue::Real(self.lateral_edge()));
        props.insert(
            "base_volume",
            PropertyValue::Real(self.base_edge.powi(d as i32 - 1)),
        );
        insert_count(&mut props, "lateral_faces", Some(2 * (d as u128 - 1)));
        insert_count(&mut props, "vertices", self.face_count(0));
        insert_count(&mut props, "edges", self.face_count(1));
        props
    }

    fn face_count(&self, k: u8) -> Option<u128> {
        // Each k-face is either a k-face of the base or the cone from the apex
        // over a (k-1)-face of the base. The apex itself is the cone over the
        // empty face.
        let base_ndim = self.ndim as u32 - 1;
        let k = k as u32;
        let in_base = cube_face_count(base_ndim, k)?;
        let cones = match k.checked_sub(1) {
            None => 1,
            Some(j) => cube_face_count(base_ndim, j)?,
        };
        in_base.checked_add(cones)
    }

    fn name(&self) -> String {
        match self.ndim {
            2 => "Triangle".to_owned(),
            3 => "Square Pyramid".to_owned(),
            d => format!("{d}D HyperPyramid"),
        }
    }
    fn volume_formula(&self) -> String {
        let d = self.ndim;
        format!("V = b^{} · h / {d}", d - 1)
    }
    fn surface_area_formula(&self) -> String {
        let d = self.ndim;
        format!("S = b^{} + 2 · b^{} · √(h² + (b/2)²)", d - 1, d - 2)
    }
}

use hypersolid_math::{Float, ln_unit_ball_volume, ln_unit_sphere_area};
use serde::Serialize;

use super::{
    Properties, PropertyValue, ShapeKind, Solid, check_point, check_slice, validate_ndim,
    validate_param,
};
use crate::{Limits, QueryError, ShapeValidationError};

/// Ball of radius `r` in `ndim` dimensions, centered at the origin.
///
/// In 1 dimension this is a line segment of length `2r`, whose boundary is
/// its 2 endpoints.
#[derive(Serialize, Debug, Copy, Clone, PartialEq)]
pub struct HyperSphere {
    ndim: u8,
    radius: Float,
}
impl HyperSphere {
    /// Constructs a hypersphere, checking against the default [`Limits`].
    pub fn new(ndim: u32, radius: Float) -> Result<Self, ShapeValidationError> {
        Self::with_limits(ndim, radius, &Limits::default())
    }
    /// Constructs a hypersphere, checking against `limits`.
    pub fn with_limits(
        ndim: u32,
        radius: Float,
        limits: &Limits,
    ) -> Result<Self, ShapeValidationError> {
        Ok(Self {
            ndim: validate_ndim(ShapeKind::Sphere, ndim, limits)?,
            radius: validate_param("radius", radius)?,
        })
    }

    /// Returns the radius.
    pub fn radius(&self) -> Float {
        self.radius
    }
}

impl Solid for HyperSphere {
    fn ndim(&self) -> u8 {
        self.ndim
    }
    fn kind(&self) -> ShapeKind {
        ShapeKind::Sphere
    }

    fn ln_volume(&self) -> Float {
        let d = self.ndim as u32;
        ln_unit_ball_volume(d) + d as Float * self.radius.ln()
    }
    fn ln_surface_area(&self) -> Float {
        // S = d V / r
        let d = self.ndim as u32;
        ln_unit_sphere_area(d) + (d as Float - 1.0) * self.radius.ln()
    }

    fn contains_point(&self, point: &[Float]) -> Result<bool, QueryError> {
        check_point(self.ndim, point)?;
        let r = self.radius;
        Ok(point.iter().map(|x| x * x).sum::<Float>() <= r * r)
    }
    fn ln_cross_section(&self, axis: usize, offset: Float) -> Result<Float, QueryError> {
        check_slice(self.ndim, axis, offset)?;
        let t = offset.abs();
        if t > self.radius {
            return Ok(Float::NEG_INFINITY);
        }
        let d = self.ndim as u32 - 1;
        if d == 0 {
            return Ok(0.0);
        }
        // The slice is a ball of radius √((r - t)(r + t)).
        let ln_radius = 0.5 * ((self.radius - t).ln() + (self.radius + t).ln());
        Ok(ln_unit_ball_volume(d) + d as Float * ln_radius)
    }

    fn extra_properties(&self) -> Properties {
        let d = self.ndim as u32;
        let mut props = Properties::new();
        props.insert("diameter", PropertyValue::Real(2.0 * self.radius));
        props.insert(
            "unit_ball_volume",
            PropertyValue::Real(ln_unit_ball_volume(d).exp()),
        );
        props.insert(
            "surface_to_volume",
            PropertyValue::Real(d as Float / self.radius),
        );
        props
    }

    fn name(&self) -> String {
        match self.ndim {
            2 => "Circle".to_owned(),
            3 => "Sphere".to_owned(),
            d => format!("{d}D HyperSphere"),
        }
    }
    fn volume_formula(&self) -> String {
        match self.ndim {
            1 => "V = 2r".to_owned(),
            2 => "V = πr²".to_owned(),
            3 => "V = (4/3)πr³".to_owned(),
            4 => "V = (π²/2)r⁴".to_owned(),
            d if d % 2 == 0 => format!("V = π^{} / {}! · r^{d}", d / 2, d / 2),
            d => format!("V = π^({d}/2) / Γ({d}/2 + 1) · r^{d}"),
        }
    }
    fn surface_area_formula(&self) -> String {
        match self.ndim {
            1 => "S = 2".to_owned(),
            2 => "S = 2πr".to_owned(),
            3 => "S = 4πr²".to_owned(),
            4 => "S = 2π²r³".to_owned(),
            d => format!("S = {d} · V / r"),
        }
    }
}

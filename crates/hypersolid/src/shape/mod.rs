//! Convex solids generalized to any number of dimensions.

use hypersolid_math::{Float, MathResult, exp_checked};
use serde::{Deserialize, Serialize};

mod cube;
mod ellipsoid;
mod properties;
mod pyramid;
mod simplex;
mod sphere;

pub use cube::HyperCube;
pub use ellipsoid::HyperEllipsoid;
pub use properties::{Properties, PropertyValue};
pub use pyramid::HyperPyramid;
pub use simplex::Simplex;
pub use sphere::HyperSphere;

use crate::{Limits, QueryError, ShapeValidationError};

/// Kind of shape, parsed case-insensitively from its name or a common alias.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// [`HyperSphere`]
    #[strum(
        to_string = "sphere",
        serialize = "hypersphere",
        serialize = "ball",
        serialize = "circle",
        serialize = "n-sphere"
    )]
    Sphere,
    /// [`HyperCube`]
    #[strum(
        to_string = "cube",
        serialize = "hypercube",
        serialize = "square",
        serialize = "tesseract",
        serialize = "n-cube"
    )]
    Cube,
    /// [`HyperEllipsoid`]
    #[strum(
        to_string = "ellipsoid",
        serialize = "hyperellipsoid",
        serialize = "ellipse"
    )]
    Ellipsoid,
    /// [`Simplex`]
    #[strum(
        to_string = "simplex",
        serialize = "triangle",
        serialize = "tetrahedron",
        serialize = "n-simplex"
    )]
    Simplex,
    /// [`HyperPyramid`]
    #[strum(to_string = "pyramid", serialize = "hyperpyramid")]
    Pyramid,
}
impl ShapeKind {
    /// Returns the smallest number of dimensions in which the shape exists.
    pub fn min_ndim(self) -> u32 {
        match self {
            ShapeKind::Sphere | ShapeKind::Cube | ShapeKind::Simplex => 1,
            ShapeKind::Ellipsoid | ShapeKind::Pyramid => 2,
        }
    }

    /// Returns the number of parameters the shape takes in `ndim` dimensions.
    pub fn parameter_count(self, ndim: u32) -> usize {
        match self {
            ShapeKind::Sphere | ShapeKind::Cube | ShapeKind::Simplex => 1,
            ShapeKind::Ellipsoid => ndim as usize,
            ShapeKind::Pyramid => 2,
        }
    }
}

/// Common interface for every solid.
///
/// Volume and surface area are available both directly and as natural
/// logarithms. The logarithm is always finite; the direct value may be
/// unrepresentable in high dimensions.
///
/// Point and slice queries use a fixed placement of each solid in space,
/// documented on each type. Boundaries are closed.
pub trait Solid {
    /// Returns the number of dimensions.
    fn ndim(&self) -> u8;
    /// Returns the kind of shape.
    fn kind(&self) -> ShapeKind;

    /// Returns the natural logarithm of the `ndim`-dimensional volume.
    fn ln_volume(&self) -> Float;
    /// Returns the natural logarithm of the (`ndim`-1)-dimensional measure of
    /// the boundary.
    fn ln_surface_area(&self) -> Float;

    /// Returns the `ndim`-dimensional volume.
    fn volume(&self) -> MathResult<Float> {
        exp_checked(self.ln_volume())
    }
    /// Returns the (`ndim`-1)-dimensional measure of the boundary.
    fn surface_area(&self) -> MathResult<Float> {
        exp_checked(self.ln_surface_area())
    }

    /// Returns shape-specific properties in a stable order.
    fn extra_properties(&self) -> Properties;

    /// Returns the number of `k`-dimensional faces, or `None` if the shape is
    /// not a polytope or the count does not fit in a `u128`.
    fn face_count(&self, _k: u8) -> Option<u128> {
        None
    }

    /// Returns whether `point` lies inside the solid or on its boundary.
    fn contains_point(&self, point: &[Float]) -> Result<bool, QueryError>;

    /// Returns the natural logarithm of the (`ndim`-1)-dimensional measure of
    /// the slice where coordinate `axis` equals `offset`, or negative
    /// infinity if the slice is empty.
    ///
    /// In 1 dimension a nonempty slice is a single point, with measure 1.
    fn ln_cross_section(&self, axis: usize, offset: Float) -> Result<Float, QueryError>;
    /// Returns the (`ndim`-1)-dimensional measure of the slice where
    /// coordinate `axis` equals `offset`.
    fn cross_section(&self, axis: usize, offset: Float) -> Result<Float, QueryError> {
        Ok(exp_checked(self.ln_cross_section(axis, offset)?)?)
    }

    /// Returns a human-readable name such as "Circle" or "5D HyperCube".
    fn name(&self) -> String;
    /// Returns the volume formula.
    fn volume_formula(&self) -> String;
    /// Returns the surface area formula.
    fn surface_area_formula(&self) -> String;
}

/// Any supported solid.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    /// Ball of radius `r`.
    Sphere(HyperSphere),
    /// Measure polytope with side length `s`.
    Cube(HyperCube),
    /// Axis-aligned ellipsoid with the given semi-axes.
    Ellipsoid(HyperEllipsoid),
    /// Regular simplex with edge length `e`.
    Simplex(Simplex),
    /// Right pyramid over a cube base.
    Pyramid(HyperPyramid),
}

macro_rules! delegate {
    ($self:ident, $s:ident => $e:expr) => {
        match $self {
            Shape::Sphere($s) => $e,
            Shape::Cube($s) => $e,
            Shape::Ellipsoid($s) => $e,
            Shape::Simplex($s) => $e,
            Shape::Pyramid($s) => $e,
        }
    };
}

impl Solid for Shape {
    fn ndim(&self) -> u8 {
        delegate!(self, s => s.ndim())
    }
    fn kind(&self) -> ShapeKind {
        delegate!(self, s => s.kind())
    }
    fn ln_volume(&self) -> Float {
        delegate!(self, s => s.ln_volume())
    }
    fn ln_surface_area(&self) -> Float {
        delegate!(self, s => s.ln_surface_area())
    }
    fn volume(&self) -> MathResult<Float> {
        delegate!(self, s => s.volume())
    }
    fn surface_area(&self) -> MathResult<Float> {
        delegate!(self, s => s.surface_area())
    }
    fn extra_properties(&self) -> Properties {
        delegate!(self, s => s.extra_properties())
    }
    fn face_count(&self, k: u8) -> Option<u128> {
        delegate!(self, s => s.face_count(k))
    }
    fn contains_point(&self, point: &[Float]) -> Result<bool, QueryError> {
        delegate!(self, s => s.contains_point(point))
    }
    fn ln_cross_section(&self, axis: usize, offset: Float) -> Result<Float, QueryError> {
        delegate!(self, s => s.ln_cross_section(axis, offset))
    }
    fn cross_section(&self, axis: usize, offset: Float) -> Result<Float, QueryError> {
        delegate!(self, s => s.cross_section(axis, offset))
    }
    fn name(&self) -> String {
        delegate!(self, s => s.name())
    }
    fn volume_formula(&self) -> String {
        delegate!(self, s => s.volume_formula())
    }
    fn surface_area_formula(&self) -> String {
        delegate!(self, s => s.surface_area_formula())
    }
}

impl Shape {
    /// Constructs a shape of kind `kind` in `ndim` dimensions.
    ///
    /// `params` is `[radius]`, `[side_length]`, the `ndim` semi-axes,
    /// `[edge_length]`, or `[base_edge, height]`.
    pub fn new(
        kind: ShapeKind,
        ndim: u32,
        params: &[Float],
        limits: &Limits,
    ) -> Result<Self, ShapeValidationError> {
        validate_ndim(kind, ndim, limits)?;

        let shape: Shape = match (kind, params) {
            (ShapeKind::Sphere, &[r]) => HyperSphere::with_limits(ndim, r, limits)?.into(),
            (ShapeKind::Cube, &[s]) => HyperCube::with_limits(ndim, s, limits)?.into(),
            (ShapeKind::Ellipsoid, axes) if axes.len() == ndim as usize => {
                HyperEllipsoid::with_limits(axes, limits)?.into()
            }
            (ShapeKind::Simplex, &[e]) => Simplex::with_limits(ndim, e, limits)?.into(),
            (ShapeKind::Pyramid, &[b, h]) => {
                HyperPyramid::with_limits(ndim, b, h, limits)?.into()
            }
            _ => {
                return Err(ShapeValidationError::WrongParameterCount {
                    kind,
                    expected: kind.parameter_count(ndim),
                    got: params.len(),
                });
            }
        };
        log::debug!("constructed {}", shape.name());
        Ok(shape)
    }

    /// Parses `kind` from a name such as `"sphere"` or `"Tesseract"` and then
    /// constructs the shape.
    pub fn from_name(
        kind: &str,
        ndim: u32,
        params: &[Float],
        limits: &Limits,
    ) -> Result<Self, ShapeValidationError> {
        let kind = kind
            .trim()
            .parse()
            .map_err(|_| ShapeValidationError::UnknownShapeType(kind.to_owned()))?;
        Self::new(kind, ndim, params, limits)
    }
}

/// Unvalidated description of a shape, as received from a caller.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ShapeRequest {
    /// Name or alias of the kind of shape.
    #[serde(rename = "type")]
    pub kind: String,
    /// Number of dimensions.
    pub ndim: u32,
    /// Shape parameters; see [`Shape::new()`].
    pub params: Vec<Float>,
}
impl ShapeRequest {
    /// Validates the request and constructs the shape.
    pub fn build(&self, limits: &Limits) -> Result<Shape, ShapeValidationError> {
        Shape::from_name(&self.kind, self.ndim, &self.params, limits)
    }
}

impl From<HyperSphere> for Shape {
    fn from(value: HyperSphere) -> Self {
        Self::Sphere(value)
    }
}
impl From<HyperCube> for Shape {
    fn from(value: HyperCube) -> Self {
        Self::Cube(value)
    }
}
impl From<HyperEllipsoid> for Shape {
    fn from(value: HyperEllipsoid) -> Self {
        Self::Ellipsoid(value)
    }
}
impl From<Simplex> for Shape {
    fn from(value: Simplex) -> Self {
        Self::Simplex(value)
    }
}
impl From<HyperPyramid> for Shape {
    fn from(value: HyperPyramid) -> Self {
        Self::Pyramid(value)
    }
}

/// Checks `ndim` against the minimum for `kind` and the configured maximum.
pub(crate) fn validate_ndim(
    kind: ShapeKind,
    ndim: u32,
    limits: &Limits,
) -> Result<u8, ShapeValidationError> {
    let min = kind.min_ndim();
    if ndim < min {
        return Err(ShapeValidationError::TooFewDimensions { kind, ndim, min });
    }
    let max = limits.max_ndim;
    match u8::try_from(ndim) {
        Ok(n) if n <= max => Ok(n),
        _ => Err(ShapeValidationError::TooManyDimensions { ndim, max }),
    }
}

/// Checks that a parameter is finite and positive.
pub(crate) fn validate_param(
    name: &'static str,
    value: Float,
) -> Result<Float, ShapeValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ShapeValidationError::NonPositiveParameter { name, value })
    }
}

/// Checks that `point` has `ndim` coordinates, none of them NaN.
pub(crate) fn check_point(ndim: u8, point: &[Float]) -> Result<(), QueryError> {
    if point.len() != ndim as usize {
        return Err(QueryError::DimensionMismatch {
            expected: ndim,
            got: point.len(),
        });
    }
    if point.iter().any(|x| x.is_nan()) {
        return Err(QueryError::NanCoordinate);
    }
    Ok(())
}

/// Checks that `axis` exists in `ndim` dimensions and that `offset` is not
/// NaN.
pub(crate) fn check_slice(ndim: u8, axis: usize, offset: Float) -> Result<(), QueryError> {
    if axis >= ndim as usize {
        return Err(QueryError::AxisOutOfRange { axis, ndim });
    }
    if offset.is_nan() {
        return Err(QueryError::NanCoordinate);
    }
    Ok(())
}

/// Checks a slice of a shape that can only be sliced perpendicular to its
/// last axis.
pub(crate) fn check_last_axis_slice(
    kind: ShapeKind,
    ndim: u8,
    axis: usize,
    offset: Float,
) -> Result<(), QueryError> {
    check_slice(ndim, axis, offset)?;
    let supported = ndim as usize - 1;
    if axis != supported {
        return Err(QueryError::UnsupportedCrossSection {
            kind,
            axis,
            supported,
        });
    }
    Ok(())
}

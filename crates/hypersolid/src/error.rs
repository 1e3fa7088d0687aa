use hypersolid_math::{Float, MathError};
use itertools::Itertools;
use strum::IntoEnumIterator;
use thiserror::Error;

use crate::shape::ShapeKind;

/// Error constructing a shape.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeValidationError {
    /// The shape needs more dimensions.
    #[error("{kind} requires at least {min} dimensions, got {ndim}")]
    TooFewDimensions {
        /// Kind of shape.
        kind: ShapeKind,
        /// Requested number of dimensions.
        ndim: u32,
        /// Minimum number of dimensions for `kind`.
        min: u32,
    },
    /// The number of dimensions exceeds the configured ceiling.
    #[error("{ndim} dimensions exceeds the maximum of {max}")]
    TooManyDimensions {
        /// Requested number of dimensions.
        ndim: u32,
        /// Configured maximum.
        max: u8,
    },
    /// The wrong number of parameters was given.
    #[error("{kind} takes {expected} parameters, got {got}")]
    WrongParameterCount {
        /// Kind of shape.
        kind: ShapeKind,
        /// Expected number of parameters.
        expected: usize,
        /// Number of parameters given.
        got: usize,
    },
    /// A parameter is zero, negative, infinite, or NaN.
    #[error("{name} must be finite and positive, got {value}")]
    NonPositiveParameter {
        /// Name of the parameter.
        name: &'static str,
        /// Value that was given.
        value: Float,
    },
    /// The shape name is not recognized.
    #[error("unknown shape type {0:?}; expected one of: {kinds}", kinds = ShapeKind::iter().join(", "))]
    UnknownShapeType(String),
}

/// Error querying points or slices of a shape.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// The point has the wrong number of coordinates.
    #[error("point has {got} coordinates, but the shape has {expected} dimensions")]
    DimensionMismatch {
        /// Number of dimensions of the shape.
        expected: u8,
        /// Number of coordinates given.
        got: usize,
    },
    /// The axis does not exist.
    #[error("axis {axis} is out of range for a {ndim}-dimensional shape")]
    AxisOutOfRange {
        /// Requested axis.
        axis: usize,
        /// Number of dimensions of the shape.
        ndim: u8,
    },
    /// The shape only supports slicing along one axis.
    #[error("{kind} can only be sliced perpendicular to axis {supported}, got axis {axis}")]
    UnsupportedCrossSection {
        /// Kind of shape.
        kind: ShapeKind,
        /// Requested axis.
        axis: usize,
        /// Axis along which slices are supported.
        supported: usize,
    },
    /// A coordinate or offset is NaN.
    #[error("coordinate is NaN")]
    NanCoordinate,
    /// The result is not representable.
    #[error(transparent)]
    Math(#[from] MathError),
}

/// Error comparing shapes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompareError {
    /// Too many shapes were given.
    #[error("cannot compare {count} shapes; the maximum is {max}")]
    TooManyShapes {
        /// Number of shapes given.
        count: usize,
        /// Configured maximum.
        max: usize,
    },
}

/// Error generating a tiling.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TilingError {
    /// Tilings only exist in the plane.
    #[error("tilings are only supported in 2 dimensions, got {0}")]
    UnsupportedDimension(u32),
    /// The region is empty, inverted, or not finite.
    #[error("invalid region from {min:?} to {max:?}")]
    InvalidRegion {
        /// Minimum corner.
        min: [Float; 2],
        /// Maximum corner.
        max: [Float; 2],
    },
    /// The tile size is not finite and positive.
    #[error("tile size must be finite and positive, got {0}")]
    InvalidTileSize(Float),
    /// A Voronoi tiling was requested with no seeds.
    #[error("voronoi tiling requires at least one seed")]
    NoSeeds,
    /// A Voronoi seed lies outside the region.
    #[error("seed #{index} at ({x}, {y}) is outside the region")]
    SeedOutsideRegion {
        /// Index of the seed.
        index: usize,
        /// X coordinate of the seed.
        x: Float,
        /// Y coordinate of the seed.
        y: Float,
    },
    /// The tiling would contain too many tiles.
    #[error("tiling would contain about {estimated} tiles; the maximum is {max}")]
    TooManyTiles {
        /// Estimated number of tiles.
        estimated: Float,
        /// Configured maximum.
        max: usize,
    },
    /// Tiles could not be constructed.
    #[error(transparent)]
    Construction(#[from] TilingConstructionError),
}

/// Internal failure while constructing tiles.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TilingConstructionError {
    /// Two Voronoi seeds coincide.
    #[error("seeds #{first} and #{second} coincide")]
    DuplicateSeed {
        /// Index of the first seed.
        first: usize,
        /// Index of the second seed.
        second: usize,
    },
    /// A Voronoi cell was clipped away entirely.
    #[error("cell for seed #{0} is empty")]
    DegenerateCell(usize),
    /// A computed coordinate was infinite or NaN.
    #[error("non-finite coordinate while constructing tile #{0}")]
    NonFiniteCoordinate(usize),
}

/// Any error produced by this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// Error in the numeric kernel.
    #[error(transparent)]
    Math(#[from] MathError),
    /// Error constructing a shape.
    #[error(transparent)]
    Shape(#[from] ShapeValidationError),
    /// Error querying a shape.
    #[error(transparent)]
    Query(#[from] QueryError),
    /// Error comparing shapes.
    #[error(transparent)]
    Compare(#[from] CompareError),
    /// Error generating a tiling.
    #[error(transparent)]
    Tiling(#[from] TilingError),
    /// Error loading limits.
    #[error("error loading limits: {0}")]
    Limits(#[from] config::ConfigError),
}

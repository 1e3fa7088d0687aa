//! Geometric properties of convex solids in any number of dimensions, and
//! tilings of rectangular regions of the plane.
//!
//! Volumes and surface areas are computed in log space, so they stay
//! meaningful in 100 dimensions even when the values themselves do not fit in
//! an `f64`.
//!
//! # Example
//!
//! ```rust
//! use hypersolid::prelude::*;
//!
//! let limits = Limits::default();
//! let sphere = hypersolid::create_shape(ShapeKind::Sphere, 3, &[2.0], &limits).unwrap();
//! let cube = hypersolid::create_shape(ShapeKind::Cube, 3, &[2.0], &limits).unwrap();
//!
//! let table = hypersolid::compare(&[sphere, cube], &["volume"], &limits).unwrap();
//! let ratio = table.row("volume").unwrap().ratio(0, 1).unwrap();
//! assert!((ratio - 4.18879).abs() < 1e-4);
//!
//! let spec = TilingSpec::Square { tile_size: 1.0 };
//! let request = TilingRequest::new(Region::new(10.0, 10.0), spec);
//! let pattern = hypersolid::generate_tiling(&request, &limits).unwrap();
//! assert_eq!(pattern.tiles().len(), 100);
//! assert_eq!(hypersolid::analyze(&pattern).symmetry_group, "p4m");
//! ```

pub mod compare;
mod error;
mod limits;
pub mod shape;
pub mod tiling;

#[cfg(test)]
mod tests;

pub use compare::{ComparisonTable, compare};
pub use error::*;
pub use hypersolid_math::{BallProfile, BallProfileEntry, Float, ball_profile};
pub use limits::Limits;
pub use prelude::*;
pub use tiling::{analyze, generate_tiling};

/// Prelude of common imports.
pub mod prelude {
    pub use crate::compare::{ComparisonTable, PropertyCell};
    pub use crate::limits::Limits;
    pub use crate::shape::{
        HyperCube, HyperEllipsoid, HyperPyramid, HyperSphere, PropertyValue, Shape, ShapeKind,
        ShapeRequest, Simplex, Solid,
    };
    pub use crate::tiling::{
        HexMode, Region, SeedSource, Tile, TilingAnalysis, TilingPattern, TilingRequest,
        TilingSpec,
    };
}

/// Constructs a shape of kind `kind` in `ndim` dimensions, checking it
/// against `limits`. See [`Shape::new()`] for the meaning of `params`.
pub fn create_shape(
    kind: ShapeKind,
    ndim: u32,
    params: &[Float],
    limits: &Limits,
) -> Result<Shape, ShapeValidationError> {
    Shape::new(kind, ndim, params, limits)
}

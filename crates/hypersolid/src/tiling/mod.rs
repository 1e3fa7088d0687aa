//! Tilings of a rectangular region of the plane.
//!
//! [`generate_tiling()`] validates a [`TilingRequest`], checks the estimated
//! tile count against [`Limits::max_tiles`], and constructs every tile along
//! with its neighbors in one pass. The resulting [`TilingPattern`] is never
//! mutated afterwards. [`analyze()`] computes coverage, coordination, and
//! symmetry information for a pattern.

use cgmath::Point2;
use hypersolid_math::Float;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

mod analysis;
mod euclidean_2d;
mod lattice;
mod polygon;
mod schlafli;
mod voronoi;

pub use analysis::{TilingAnalysis, analyze};
pub use euclidean_2d::{HalfPlane, disk_rect_area};
pub use polygon::Polygon;
pub use schlafli::{Geometry, Schlafli};

use crate::{Limits, TilingError};

/// Relative tolerance for lengths, as a fraction of the shorter side of the
/// region.
const RELATIVE_LENGTH_TOLERANCE: Float = 1e-9;
/// Smallest length tolerance, as a fraction of the largest coordinate of the
/// region.
const COORDINATE_ROUNDING: Float = 64.0 * Float::EPSILON;

/// Axis-aligned rectangle in the plane.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Region {
    /// Minimum corner.
    pub min: [Float; 2],
    /// Maximum corner.
    pub max: [Float; 2],
}
impl Region {
    /// Constructs a region with its minimum corner at the origin.
    pub fn new(width: Float, height: Float) -> Self {
        Self {
            min: [0.0, 0.0],
            max: [width, height],
        }
    }
    /// Constructs a region from its minimum and maximum corners.
    pub fn from_corners(min: [Float; 2], max: [Float; 2]) -> Self {
        Self { min, max }
    }

    /// Returns the minimum corner.
    pub fn min_point(&self) -> Point2<Float> {
        Point2::from(self.min)
    }
    /// Returns the maximum corner.
    pub fn max_point(&self) -> Point2<Float> {
        Point2::from(self.max)
    }
    /// Returns the size along the X axis.
    pub fn width(&self) -> Float {
        self.max[0] - self.min[0]
    }
    /// Returns the size along the Y axis.
    pub fn height(&self) -> Float {
        self.max[1] - self.min[1]
    }
    /// Returns the area.
    pub fn area(&self) -> Float {
        self.width() * self.height()
    }

    /// Returns an error if the region is not finite or has no area.
    pub fn validate(&self) -> Result<(), TilingError> {
        let (w, h) = (self.width(), self.height());
        if w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0 && self.area().is_finite() {
            Ok(())
        } else {
            Err(TilingError::InvalidRegion {
                min: self.min,
                max: self.max,
            })
        }
    }

    /// Returns the region as a counterclockwise polygon.
    pub fn to_polygon(&self) -> Polygon {
        let [x0, y0] = self.min;
        let [x1, y1] = self.max;
        Polygon::from_points(vec![
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ])
    }

    /// Returns the four half-planes whose intersection is the region.
    pub fn half_planes(&self) -> [HalfPlane; 4] {
        let min = self.min_point();
        let max = self.max_point();
        [
            HalfPlane {
                point: min,
                normal: cgmath::vec2(-1.0, 0.0),
            },
            HalfPlane {
                point: min,
                normal: cgmath::vec2(0.0, -1.0),
            },
            HalfPlane {
                point: max,
                normal: cgmath::vec2(1.0, 0.0),
            },
            HalfPlane {
                point: max,
                normal: cgmath::vec2(0.0, 1.0),
            },
        ]
    }

    /// Returns whether `p` is at least `margin` inside the region. A negative
    /// margin allows points slightly outside.
    pub fn contains_with_margin(&self, p: Point2<Float>, margin: Float) -> bool {
        self.min[0] + margin <= p.x
            && p.x <= self.max[0] - margin
            && self.min[1] + margin <= p.y
            && p.y <= self.max[1] - margin
    }
    /// Returns whether `p` is inside the region or on its boundary.
    pub fn contains(&self, p: Point2<Float>) -> bool {
        self.contains_with_margin(p, 0.0)
    }

    /// Returns the distance below which two points are considered the same.
    ///
    /// This is a small fraction of the shorter side, but never less than the
    /// rounding error of coordinates as large as the corners of the region.
    pub fn length_tolerance(&self) -> Float {
        let magnitude = self
            .min
            .iter()
            .chain(&self.max)
            .fold(0.0, |m: Float, x| m.max(x.abs()));
        let relative = RELATIVE_LENGTH_TOLERANCE * self.width().min(self.height());
        relative.max(COORDINATE_ROUNDING * magnitude)
    }
}

/// Interpretation of the tile size for hexagonal tilings.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HexMode {
    /// Pointy-top regular hexagons that cover the whole region. The tile
    /// size is the side length of each hexagon.
    FullCoverage,
    /// Disks in the densest packing. The tile size is the radius of each
    /// disk.
    CirclePacking,
}

/// Where the seeds of a Voronoi tiling come from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SeedSource {
    /// Explicit list of seed points, each of which must be in the region.
    Points(Vec<[Float; 2]>),
    /// Seeds drawn uniformly from the region. The same `seed` always gives the
    /// same points.
    Random {
        /// Number of seeds.
        count: usize,
        /// Seed for the random number generator.
        seed: u64,
    },
}

/// Kind of tiling and its parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "pattern", rename_all = "snake_case")]
pub enum TilingSpec {
    /// Squares with 4 neighbors each. `{4,4}`
    Square {
        /// Edge length of each square.
        tile_size: Float,
    },
    /// Alternating up and down triangles with 3 neighbors each. `{3,6}`
    Triangular {
        /// Edge length of each triangle.
        tile_size: Float,
    },
    /// Hexagons or disks on a hexagonal lattice with 6 neighbors each.
    Hexagonal {
        /// Side length of each hexagon or radius of each disk.
        tile_size: Float,
        /// Whether to generate hexagons or disks.
        mode: HexMode,
    },
    /// Voronoi cells of a set of seed points.
    Voronoi {
        /// Seed points.
        seeds: SeedSource,
    },
}
impl TilingSpec {
    /// Returns the kind of pattern.
    pub fn kind(&self) -> PatternKind {
        match self {
            TilingSpec::Square { .. } => PatternKind::Square,
            TilingSpec::Triangular { .. } => PatternKind::Triangular,
            TilingSpec::Hexagonal { .. } => PatternKind::Hexagonal,
            TilingSpec::Voronoi { .. } => PatternKind::Voronoi,
        }
    }
}

/// Kind of tiling pattern.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PatternKind {
    /// [`TilingSpec::Square`]
    Square,
    /// [`TilingSpec::Triangular`]
    Triangular,
    /// [`TilingSpec::Hexagonal`]
    Hexagonal,
    /// [`TilingSpec::Voronoi`]
    Voronoi,
}

/// Request to tile a region.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TilingRequest {
    /// Number of dimensions. Only 2 is supported.
    #[serde(default = "default_ndim")]
    pub ndim: u32,
    /// Region to tile.
    pub region: Region,
    /// Kind of tiling and its parameters.
    #[serde(flatten)]
    pub spec: TilingSpec,
}
impl TilingRequest {
    /// Constructs a request for a 2D tiling.
    pub fn new(region: Region, spec: TilingSpec) -> Self {
        Self {
            ndim: default_ndim(),
            region,
            spec,
        }
    }
}
fn default_ndim() -> u32 {
    2
}

/// Shape of a tile.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Outline {
    /// Convex polygon.
    Polygon(Polygon),
    /// Disk centered on the tile center.
    Disk {
        /// Radius of the disk.
        radius: Float,
    },
}

/// Single tile in a [`TilingPattern`].
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Tile {
    /// Index of the tile in [`TilingPattern::tiles()`].
    pub id: usize,
    /// Center of the tile. For Voronoi cells, this is the seed.
    pub center: Point2<Float>,
    /// Shape of the tile.
    pub outline: Outline,
    /// IDs of adjacent tiles, sorted.
    pub neighbors: SmallVec<[usize; 6]>,
}
impl Tile {
    /// Returns the area of the tile.
    pub fn area(&self) -> Float {
        match &self.outline {
            Outline::Polygon(polygon) => polygon.area(),
            Outline::Disk { radius } => std::f64::consts::PI * radius * radius,
        }
    }

    /// Returns the area of the part of the tile inside `region`.
    pub fn area_within(&self, region: &Region) -> Float {
        match &self.outline {
            Outline::Polygon(polygon) => polygon.clip_to_region(region).area(),
            Outline::Disk { radius } => disk_rect_area(
                self.center,
                *radius,
                region.min_point(),
                region.max_point(),
            ),
        }
    }

    /// Returns whether the whole tile is at least `margin` inside `region`.
    pub fn is_inside(&self, region: &Region, margin: Float) -> bool {
        match &self.outline {
            Outline::Polygon(polygon) => polygon.is_inside(region, margin),
            Outline::Disk { radius } => region.contains_with_margin(self.center, margin + radius),
        }
    }

    /// Returns whether every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        let outline_is_finite = match &self.outline {
            Outline::Polygon(polygon) => polygon.is_finite(),
            Outline::Disk { radius } => radius.is_finite(),
        };
        self.center.x.is_finite() && self.center.y.is_finite() && outline_is_finite
    }
}

/// Immutable tiling of a region, produced by [`generate_tiling()`].
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TilingPattern {
    ndim: u32,
    region: Region,
    #[serde(flatten)]
    spec: TilingSpec,
    tiles: Vec<Tile>,
}
impl TilingPattern {
    /// Returns the kind of pattern.
    pub fn kind(&self) -> PatternKind {
        self.spec.kind()
    }
    /// Returns the tiled region.
    pub fn region(&self) -> &Region {
        &self.region
    }
    /// Returns the parameters the pattern was generated from.
    pub fn spec(&self) -> &TilingSpec {
        &self.spec
    }
    /// Returns the tiles, indexed by ID.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
    /// Returns the tile with the given ID.
    pub fn tile(&self, id: usize) -> Option<&Tile> {
        self.tiles.get(id)
    }

    /// Returns the Schlafli symbol if the pattern is a regular edge-to-edge
    /// tiling.
    pub fn schlafli(&self) -> Option<Schlafli> {
        match &self.spec {
            TilingSpec::Square { .. } => Some(Schlafli::SQUARE),
            TilingSpec::Triangular { .. } => Some(Schlafli::TRIANGULAR),
            TilingSpec::Hexagonal {
                mode: HexMode::FullCoverage,
                ..
            } => Some(Schlafli::HEXAGONAL),
            TilingSpec::Hexagonal {
                mode: HexMode::CirclePacking,
                ..
            }
            | TilingSpec::Voronoi { .. } => None,
        }
    }
}

/// Generates a tiling of a region.
///
/// Lattice tilings include every tile that overlaps the region with positive
/// area, so tiles along the edge may extend outside it. Voronoi cells are
/// clipped to the region.
pub fn generate_tiling(
    request: &TilingRequest,
    limits: &Limits,
) -> Result<TilingPattern, TilingError> {
    if request.ndim != 2 {
        return Err(TilingError::UnsupportedDimension(request.ndim));
    }
    let region = &request.region;
    region.validate()?;

    let tiles = match request.spec {
        TilingSpec::Square { tile_size } => {
            lattice::generate(lattice::Lattice::Square, tile_size, region, limits)?
        }
        TilingSpec::Triangular { tile_size } => {
            lattice::generate(lattice::Lattice::Triangular, tile_size, region, limits)?
        }
        TilingSpec::Hexagonal { tile_size, mode } => {
            let lattice = match mode {
                HexMode::FullCoverage => lattice::Lattice::Hexagonal,
                HexMode::CirclePacking => lattice::Lattice::CirclePacking,
            };
            lattice::generate(lattice, tile_size, region, limits)?
        }
        TilingSpec::Voronoi { ref seeds } => voronoi::generate(seeds, region, limits)?,
    };

    log::debug!(
        "generated {} tiling with {} tiles",
        request.spec.kind(),
        tiles.len(),
    );

    Ok(TilingPattern {
        ndim: request.ndim,
        region: *region,
        spec: request.spec.clone(),
        tiles,
    })
}

/// Returns an error if `estimated` tiles is more than the limit.
fn check_tile_count(estimated: Float, limits: &Limits) -> Result<(), TilingError> {
    if estimated > limits.max_tiles as Float || estimated.is_nan() {
        log::warn!(
            "rejecting tiling with about {estimated} tiles (max {})",
            limits.max_tiles,
        );
        return Err(TilingError::TooManyTiles {
            estimated,
            max: limits.max_tiles,
        });
    }
    Ok(())
}

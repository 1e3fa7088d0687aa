//! Periodic tilings built from rows of congruent cells.

use std::collections::HashMap;

use cgmath::{Deg, Point2};
use hypersolid_math::{EPSILON, Float};
use smallvec::SmallVec;

use super::{Outline, Polygon, Region, Tile, check_tile_count};
use crate::{Limits, TilingConstructionError, TilingError};

const SQRT_3: Float = 1.732_050_807_568_877_2;

/// Fraction of the smaller of its own area and the region's area by which a
/// tile must overlap the region to be included.
const MIN_OVERLAP_FRACTION: Float = 1e-12;

/// Lattice of congruent tiles.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) enum Lattice {
    Square,
    /// Cells are indexed by half-steps along each row. Cell `(i, j)` points
    /// up if `i + j` is even and down otherwise.
    Triangular,
    /// Pointy-top hexagons in rows, with odd rows shifted right by half a
    /// hexagon.
    Hexagonal,
    /// Disks on the same lattice as [`Lattice::Hexagonal`].
    CirclePacking,
}

/// Placement of cells in rows, relative to the minimum corner of the region.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Layout {
    /// Distance between cells in a row.
    dx: Float,
    /// Distance between rows.
    dy: Float,
    /// Shift of odd rows along the X axis.
    odd_row_offset: Float,
    /// Center of the bounding box of cell `(0, 0)`.
    origin: [Float; 2],
    /// Half of the size of the bounding box of a cell.
    half_extent: [Float; 2],
}
impl Layout {
    fn row_offset(&self, j: i64) -> Float {
        if j.rem_euclid(2) == 1 {
            self.odd_row_offset
        } else {
            0.0
        }
    }

    /// Returns the inclusive range of rows whose bounding boxes overlap the
    /// region.
    fn rows(&self, region: &Region) -> [Float; 2] {
        index_range(self.dy, self.origin[1], self.half_extent[1], region.height())
    }
    /// Returns the inclusive range of cells in row `j` whose bounding boxes
    /// overlap the region.
    fn columns(&self, region: &Region, j: i64) -> [Float; 2] {
        let start = self.origin[0] + self.row_offset(j);
        index_range(self.dx, start, self.half_extent[0], region.width())
    }

    /// Returns an upper bound on the number of tiles, without constructing
    /// any.
    fn estimate(&self, region: &Region) -> Float {
        let count = |[lo, hi]: [Float; 2]| (hi - lo + 1.0).max(0.0);
        let rows = count(self.rows(region));
        let columns = count(self.columns(region, 0)).max(count(self.columns(region, 1)));
        rows * columns
    }

    fn cell_center(&self, region: &Region, [i, j]: [i64; 2]) -> Point2<Float> {
        Point2::new(
            region.min[0] + i as Float * self.dx + self.row_offset(j) + self.origin[0],
            region.min[1] + j as Float * self.dy + self.origin[1],
        )
    }
}

/// Returns the inclusive range of integers `k` for which the interval of
/// radius `half_extent` around `start + k * step` overlaps `(0, length)`.
///
/// The tolerance shrinks with `length` so that a region much smaller than one
/// step still overlaps the cell it lies in.
fn index_range(step: Float, start: Float, half_extent: Float, length: Float) -> [Float; 2] {
    let eps = EPSILON * (length / step).min(1.0);
    let lo = ((-half_extent - start) / step + eps).floor() + 1.0;
    let hi = ((length + half_extent - start) / step - eps).ceil() - 1.0;
    [lo, hi]
}

impl Lattice {
    fn layout(self, s: Float) -> Layout {
        match self {
            Lattice::Square => Layout {
                dx: s,
                dy: s,
                odd_row_offset: 0.0,
                origin: [s / 2.0, s / 2.0],
                half_extent: [s / 2.0, s / 2.0],
            },
            Lattice::Triangular => {
                let h = s * SQRT_3 / 2.0;
                Layout {
                    dx: s / 2.0,
                    dy: h,
                    odd_row_offset: 0.0,
                    origin: [s / 2.0, h / 2.0],
                    half_extent: [s / 2.0, h / 2.0],
                }
            }
            Lattice::Hexagonal => {
                let w = s * SQRT_3;
                Layout {
                    dx: w,
                    dy: 1.5 * s,
                    odd_row_offset: w / 2.0,
                    origin: [w / 2.0, s],
                    half_extent: [w / 2.0, s],
                }
            }
            Lattice::CirclePacking => Layout {
                dx: 2.0 * s,
                dy: s * SQRT_3,
                odd_row_offset: s,
                origin: [s, s],
                half_extent: [s, s],
            },
        }
    }

    /// Returns the center and outline of cell `(i, j)` with tile size `s`.
    fn cell(
        self,
        layout: &Layout,
        s: Float,
        region: &Region,
        [i, j]: [i64; 2],
    ) -> (Point2<Float>, Outline) {
        let c = layout.cell_center(region, [i, j]);
        match self {
            Lattice::Square => {
                let r = s / 2.0;
                let polygon = Polygon::from_points(vec![
                    Point2::new(c.x - r, c.y - r),
                    Point2::new(c.x + r, c.y - r),
                    Point2::new(c.x + r, c.y + r),
                    Point2::new(c.x - r, c.y + r),
                ]);
                (c, Outline::Polygon(polygon))
            }
            Lattice::Triangular => {
                let h = layout.dy;
                let x0 = c.x - s / 2.0;
                let y0 = c.y - h / 2.0;
                let y1 = y0 + h;
                let (vertices, center_y) = if (i + j).rem_euclid(2) == 0 {
                    let up = vec![
                        Point2::new(x0, y0),
                        Point2::new(x0 + s, y0),
                        Point2::new(c.x, y1),
                    ];
                    (up, y0 + h / 3.0)
                } else {
                    let down = vec![
                        Point2::new(c.x, y0),
                        Point2::new(x0 + s, y1),
                        Point2::new(x0, y1),
                    ];
                    (down, y1 - h / 3.0)
                };
                let center = Point2::new(c.x, center_y);
                (center, Outline::Polygon(Polygon::from_points(vertices)))
            }
            Lattice::Hexagonal => {
                let polygon = Polygon::new_regular(c, s, 6, Deg(30.0).into());
                (c, Outline::Polygon(polygon))
            }
            Lattice::CirclePacking => (c, Outline::Disk { radius: s }),
        }
    }

    /// Returns the offsets from cell `(i, j)` to each of its neighbors.
    fn neighbor_offsets(self, [i, j]: [i64; 2]) -> &'static [[i64; 2]] {
        match self {
            Lattice::Square => &[[-1, 0], [1, 0], [0, -1], [0, 1]],
            Lattice::Triangular if (i + j).rem_euclid(2) == 0 => &[[-1, 0], [1, 0], [0, -1]],
            Lattice::Triangular => &[[-1, 0], [1, 0], [0, 1]],
            Lattice::Hexagonal | Lattice::CirclePacking if j.rem_euclid(2) == 0 => {
                &[[-1, 0], [1, 0], [-1, -1], [0, -1], [-1, 1], [0, 1]]
            }
            Lattice::Hexagonal | Lattice::CirclePacking => {
                &[[-1, 0], [1, 0], [0, -1], [1, -1], [0, 1], [1, 1]]
            }
        }
    }
}

/// Generates every tile of `lattice` with size `tile_size` that overlaps
/// `region`, ordered by row and then by position within the row.
pub(super) fn generate(
    lattice: Lattice,
    tile_size: Float,
    region: &Region,
    limits: &Limits,
) -> Result<Vec<Tile>, TilingError> {
    if !(tile_size.is_finite() && tile_size > 0.0) {
        return Err(TilingError::InvalidTileSize(tile_size));
    }

    let layout = lattice.layout(tile_size);
    check_tile_count(layout.estimate(region), limits)?;

    let mut tiles = vec![];
    let mut cells = vec![];
    let mut ids = HashMap::new();

    let [row_lo, row_hi] = layout.rows(region);
    for j in row_lo as i64..=row_hi as i64 {
        let [col_lo, col_hi] = layout.columns(region, j);
        for i in col_lo as i64..=col_hi as i64 {
            let (center, outline) = lattice.cell(&layout, tile_size, region, [i, j]);
            let tile = Tile {
                id: tiles.len(),
                center,
                outline,
                neighbors: SmallVec::new(),
            };
            if !tile.is_finite() {
                return Err(TilingConstructionError::NonFiniteCoordinate(tile.id).into());
            }
            let min_overlap = MIN_OVERLAP_FRACTION * tile.area().min(region.area());
            if tile.area_within(region) > min_overlap {
                ids.insert([i, j], tile.id);
                cells.push([i, j]);
                tiles.push(tile);
            }
        }
    }

    for (tile, &[i, j]) in tiles.iter_mut().zip(&cells) {
        tile.neighbors = lattice
            .neighbor_offsets([i, j])
            .iter()
            .filter_map(|&[di, dj]| ids.get(&[i + di, j + dj]).copied())
            .collect();
        tile.neighbors.sort_unstable();
    }

    Ok(tiles)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use cgmath::MetricSpace;
    use pretty_assertions::assert_eq;

    use super::*;

    fn generate_ok(lattice: Lattice, tile_size: Float, region: Region) -> Vec<Tile> {
        generate(lattice, tile_size, &region, &Limits::default()).unwrap()
    }

    fn assert_neighbors_symmetric(tiles: &[Tile]) {
        for tile in tiles {
            for &n in &tile.neighbors {
                assert!(tiles[n].neighbors.contains(&tile.id), "{} -> {n}", tile.id);
            }
        }
    }

    fn clipped_area(tiles: &[Tile], region: &Region) -> Float {
        tiles.iter().map(|t| t.area_within(region)).sum()
    }

    #[test]
    fn test_square() {
        let region = Region::new(10.0, 10.0);
        let tiles = generate_ok(Lattice::Square, 1.0, region);
        assert_eq!(tiles.len(), 100);
        assert_eq!(tiles[0].center, Point2::new(0.5, 0.5));
        assert_eq!(tiles[0].neighbors.as_slice(), [1, 10]);
        assert_eq!(tiles[11].neighbors.as_slice(), [1, 10, 12, 21]);
        assert_eq!(tiles[99].center, Point2::new(9.5, 9.5));
        assert_neighbors_symmetric(&tiles);
    }

    #[test]
    fn test_square_straddling_and_offset_region() {
        let region = Region::from_corners([-5.0, 2.0], [5.5, 3.0]);
        let tiles = generate_ok(Lattice::Square, 1.0, region);
        assert_eq!(tiles.len(), 11);
        assert_eq!(tiles[0].center, Point2::new(-4.5, 2.5));
        // The last tile is kept whole.
        assert_eq!(tiles[10].area(), 1.0);
        assert_eq!(tiles[10].area_within(&region), 0.5);
        assert_abs_diff_eq!(clipped_area(&tiles, &region), region.area(), epsilon = 1e-12);
    }

    #[test]
    fn test_triangular() {
        let h = SQRT_3 / 2.0;
        let region = Region::new(2.0, 2.0 * h);
        let tiles = generate_ok(Lattice::Triangular, 1.0, region);
        assert_eq!(tiles.len(), 10);
        for tile in &tiles {
            assert_abs_diff_eq!(tile.area(), SQRT_3 / 4.0, epsilon = 1e-12);
            assert!(tile.neighbors.len() <= 3);
        }
        assert_neighbors_symmetric(&tiles);
        assert_abs_diff_eq!(clipped_area(&tiles, &region), region.area(), epsilon = 1e-12);

        // The down triangle between the first two up triangles touches three
        // others.
        let expected_center = Point2::new(1.0, 2.0 * h / 3.0);
        let down = tiles
            .iter()
            .find(|t| t.center.distance(expected_center) < 1e-9)
            .unwrap();
        assert_eq!(down.neighbors.len(), 3);
    }

    #[test]
    fn test_hexagonal() {
        let region = Region::new(20.0, 20.0);
        let tiles = generate_ok(Lattice::Hexagonal, 1.0, region);
        assert_neighbors_symmetric(&tiles);
        assert_abs_diff_eq!(clipped_area(&tiles, &region), region.area(), epsilon = 1e-9);

        let margin = region.length_tolerance();
        let interior: Vec<_> = tiles.iter().filter(|t| t.is_inside(&region, margin)).collect();
        assert!(!interior.is_empty());
        for tile in interior {
            assert_eq!(tile.neighbors.len(), 6);
            for &n in &tile.neighbors {
                let d = tiles[n].center.distance(tile.center);
                assert_abs_diff_eq!(d, SQRT_3, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_circle_packing_neighbors_touch() {
        let region = Region::new(10.0, 10.0);
        let tiles = generate_ok(Lattice::CirclePacking, 0.5, region);
        assert_neighbors_symmetric(&tiles);
        for tile in &tiles {
            assert!(tile.neighbors.len() <= 6);
            for &n in &tile.neighbors {
                let d = tiles[n].center.distance(tile.center);
                assert_abs_diff_eq!(d, 1.0, epsilon = 1e-9);
            }
        }
        assert!(tiles.iter().any(|t| t.neighbors.len() == 6));
    }

    #[test]
    fn test_region_smaller_than_tile() {
        for region in [
            Region::new(1e-7, 1e-7),
            Region::from_corners([3.0, -4.0], [3.0 + 1e-6, -4.0 + 1e-5]),
        ] {
            for lattice in [
                Lattice::Square,
                Lattice::Triangular,
                Lattice::Hexagonal,
                Lattice::CirclePacking,
            ] {
                let tiles = generate_ok(lattice, 1.0, region);
                assert!(!tiles.is_empty(), "{lattice:?}");
                let covered = clipped_area(&tiles, &region);
                assert_abs_diff_eq!(covered / region.area(), 1.0, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_limits() {
        let region = Region::new(100.0, 100.0);
        let limits = Limits::default();
        assert_eq!(generate(Lattice::Square, 1.0, &region, &limits).unwrap().len(), 10_000);
        assert!(matches!(
            generate(Lattice::Square, 0.5, &region, &limits),
            Err(TilingError::TooManyTiles { max: 10_000, .. }),
        ));
    }

    #[test]
    fn test_invalid_tile_size() {
        let region = Region::new(1.0, 1.0);
        let limits = Limits::default();
        for s in [0.0, -1.0, Float::NAN, Float::INFINITY] {
            assert!(matches!(
                generate(Lattice::Hexagonal, s, &region, &limits),
                Err(TilingError::InvalidTileSize(_)),
            ));
        }
    }
}

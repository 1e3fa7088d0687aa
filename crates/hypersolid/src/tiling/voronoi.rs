//! Voronoi tilings clipped to a rectangular region.
//!
//! Each cell starts as the whole region and is clipped by the perpendicular
//! bisector between its seed and each nearby seed. Seeds are bucketed in a
//! uniform grid and visited in rings of buckets around the cell's own seed;
//! once the nearest unvisited ring is more than twice as far from the seed as
//! any vertex of the cell, no further seed can clip it.

use cgmath::{Point2, prelude::*};
use hypersolid_math::Float;
use itertools::iproduct;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use smallvec::SmallVec;

use super::polygon::{clip_labeled, remove_duplicate_vertices};
use super::{HalfPlane, Outline, Polygon, Region, SeedSource, Tile, check_tile_count};
use crate::{Limits, TilingConstructionError, TilingError};

/// What lies across an edge of a cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum EdgeLabel {
    Boundary,
    Seed(usize),
}

pub(super) fn generate(
    seeds: &SeedSource,
    region: &Region,
    limits: &Limits,
) -> Result<Vec<Tile>, TilingError> {
    let count = match seeds {
        SeedSource::Points(points) => points.len(),
        SeedSource::Random { count, .. } => *count,
    };
    check_tile_count(count as Float, limits)?;
    if count == 0 {
        return Err(TilingError::NoSeeds);
    }

    let points = resolve_seeds(seeds, region)?;
    let grid = BucketGrid::new(region, &points);
    let tolerance = region.length_tolerance();

    let cells = (0..points.len())
        .map(|i| clip_cell(i, &points, &grid, region, tolerance))
        .collect::<Result<Vec<_>, _>>()?;

    // Neighbors across edges of positive length, made symmetric in case
    // rounding removed an edge from only one side.
    let mut neighbors: Vec<SmallVec<[usize; 6]>> = vec![SmallVec::new(); cells.len()];
    for (i, cell) in cells.iter().enumerate() {
        for (k, &(a, label)) in cell.iter().enumerate() {
            let (b, _) = cell[(k + 1) % cell.len()];
            if let EdgeLabel::Seed(j) = label {
                if a.distance(b) > tolerance {
                    neighbors[i].push(j);
                    neighbors[j].push(i);
                }
            }
        }
    }

    let mut tiles = Vec::with_capacity(cells.len());
    for (id, (cell, mut neighbors)) in cells.into_iter().zip(neighbors).enumerate() {
        neighbors.sort_unstable();
        neighbors.dedup();
        let polygon = Polygon::from_points(cell.into_iter().map(|(v, _)| v).collect());
        let tile = Tile {
            id,
            center: points[id],
            outline: Outline::Polygon(polygon),
            neighbors,
        };
        if !tile.is_finite() {
            return Err(TilingConstructionError::NonFiniteCoordinate(id).into());
        }
        tiles.push(tile);
    }
    Ok(tiles)
}

/// Returns the seed points, checking that each one is inside the region.
fn resolve_seeds(seeds: &SeedSource, region: &Region) -> Result<Vec<Point2<Float>>, TilingError> {
    match seeds {
        SeedSource::Points(points) => points
            .iter()
            .enumerate()
            .map(|(index, &[x, y])| {
                let p = Point2::new(x, y);
                if region.contains(p) {
                    Ok(p)
                } else {
                    Err(TilingError::SeedOutsideRegion { index, x, y })
                }
            })
            .collect(),
        &SeedSource::Random { count, seed } => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let [x0, y0] = region.min;
            let [x1, y1] = region.max;
            Ok((0..count)
                .map(|_| Point2::new(rng.random_range(x0..x1), rng.random_range(y0..y1)))
                .collect())
        }
    }
}

/// Returns the Voronoi cell of seed `i` as vertices labeled by the edge that
/// starts at each one.
fn clip_cell(
    i: usize,
    points: &[Point2<Float>],
    grid: &BucketGrid,
    region: &Region,
    tolerance: Float,
) -> Result<Vec<(Point2<Float>, EdgeLabel)>, TilingConstructionError> {
    let seed = points[i];
    let mut cell: Vec<_> = region
        .to_polygon()
        .vertices
        .into_iter()
        .map(|v| (v, EdgeLabel::Boundary))
        .collect();

    let home = grid.bucket_of(seed);
    for ring in 0..=grid.max_ring() {
        if ring > 0 {
            let cell_radius = cell
                .iter()
                .map(|&(v, _)| v.distance(seed))
                .fold(0.0, Float::max);
            if (ring - 1) as Float * grid.min_bucket_size() > 2.0 * cell_radius {
                break;
            }
        }

        for j in grid.ring(home, ring) {
            if j == i {
                continue;
            }
            let other = points[j];
            if seed.distance(other) <= tolerance {
                return Err(TilingConstructionError::DuplicateSeed {
                    first: i.min(j),
                    second: i.max(j),
                });
            }
            cell = clip_labeled(&cell, &HalfPlane::bisector(seed, other), EdgeLabel::Seed(j));
            remove_duplicate_vertices(&mut cell, tolerance);
        }
    }

    if cell.len() < 3 {
        return Err(TilingConstructionError::DegenerateCell(i));
    }
    Ok(cell)
}

/// Uniform grid of buckets covering the region, each holding the indices of
/// the seeds inside it.
#[derive(Debug, Clone)]
struct BucketGrid {
    min: Point2<Float>,
    size: [usize; 2],
    bucket_size: [Float; 2],
    buckets: Vec<Vec<usize>>,
}
impl BucketGrid {
    /// Constructs a grid with about one seed per bucket.
    fn new(region: &Region, points: &[Point2<Float>]) -> Self {
        let n = points.len().max(1);
        let target = (region.area() / n as Float).sqrt();
        let buckets_along =
            |length: Float| ((length / target).ceil() as usize).clamp(1, n);
        let size = [buckets_along(region.width()), buckets_along(region.height())];
        let bucket_size = [
            region.width() / size[0] as Float,
            region.height() / size[1] as Float,
        ];

        let mut grid = Self {
            min: region.min_point(),
            size,
            bucket_size,
            buckets: vec![vec![]; size[0] * size[1]],
        };
        for (i, &p) in points.iter().enumerate() {
            let [x, y] = grid.bucket_of(p);
            grid.buckets[y * size[0] + x].push(i);
        }
        grid
    }

    fn bucket_of(&self, p: Point2<Float>) -> [usize; 2] {
        let x = ((p.x - self.min.x) / self.bucket_size[0]) as usize;
        let y = ((p.y - self.min.y) / self.bucket_size[1]) as usize;
        [x.min(self.size[0] - 1), y.min(self.size[1] - 1)]
    }

    fn min_bucket_size(&self) -> Float {
        self.bucket_size[0].min(self.bucket_size[1])
    }

    /// Returns the largest ring that contains any bucket.
    fn max_ring(&self) -> usize {
        self.size[0].max(self.size[1])
    }

    /// Returns the seeds in buckets whose Chebyshev distance from `home` is
    /// exactly `ring`.
    fn ring(&self, [hx, hy]: [usize; 2], ring: usize) -> impl Iterator<Item = usize> + '_ {
        let xs = hx.saturating_sub(ring)..=(hx + ring).min(self.size[0] - 1);
        let ys = hy.saturating_sub(ring)..=(hy + ring).min(self.size[1] - 1);
        iproduct!(ys, xs)
            .filter(move |&(y, x)| hx.abs_diff(x).max(hy.abs_diff(y)) == ring)
            .flat_map(move |(y, x)| self.buckets[y * self.size[0] + x].iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use pretty_assertions::assert_eq;

    use super::*;

    fn generate_ok(seeds: SeedSource, region: Region) -> Vec<Tile> {
        generate(&seeds, &region, &Limits::default()).unwrap()
    }

    fn polygon(tile: &Tile) -> &Polygon {
        match &tile.outline {
            Outline::Polygon(p) => p,
            Outline::Disk { .. } => panic!("expected polygon"),
        }
    }

    #[test]
    fn test_four_quadrants() {
        let seeds = SeedSource::Points(vec![[0.5, 0.5], [1.5, 0.5], [0.5, 1.5], [1.5, 1.5]]);
        let tiles = generate_ok(seeds, Region::new(2.0, 2.0));
        assert_eq!(tiles.len(), 4);
        for tile in &tiles {
            assert_abs_diff_eq!(tile.area(), 1.0, epsilon = 1e-12);
            assert!(polygon(tile).signed_area() > 0.0);
        }
        // Diagonal cells only share a corner.
        assert_eq!(tiles[0].neighbors.as_slice(), [1, 2]);
        assert_eq!(tiles[3].neighbors.as_slice(), [1, 2]);
    }

    #[test]
    fn test_single_seed_is_whole_region() {
        let region = Region::from_corners([-1.0, -2.0], [3.0, 5.0]);
        let tiles = generate_ok(SeedSource::Points(vec![[0.0, 0.0]]), region);
        assert_eq!(tiles.len(), 1);
        assert_abs_diff_eq!(tiles[0].area(), 28.0, epsilon = 1e-12);
        assert!(tiles[0].neighbors.is_empty());
    }

    #[test]
    fn test_thin_region() {
        let region = Region::from_corners([0.0, 0.0], [1000.0, 1e-6]);
        assert!(region.length_tolerance() < 1e-9);

        let seeds = SeedSource::Points(vec![[100.0, 5e-7], [600.0, 5e-7]]);
        let tiles = generate_ok(seeds, region);
        assert_eq!(tiles.len(), 2);
        assert_relative_eq!(tiles[0].area(), 350.0 * 1e-6, max_relative = 1e-9);
        assert_relative_eq!(tiles[1].area(), 650.0 * 1e-6, max_relative = 1e-9);
        assert_eq!(tiles[0].neighbors.as_slice(), [1]);
        assert_eq!(tiles[1].neighbors.as_slice(), [0]);
    }

    #[test]
    fn test_random_seeds_partition_region() {
        let region = Region::from_corners([10.0, -5.0], [40.0, 15.0]);
        let seeds = SeedSource::Random {
            count: 300,
            seed: 12345,
        };
        let tiles = generate_ok(seeds.clone(), region);
        assert_eq!(tiles.len(), 300);

        let total: Float = tiles.iter().map(Tile::area).sum();
        assert_abs_diff_eq!(total, region.area(), epsilon = 1e-6);

        for tile in &tiles {
            assert!(region.contains(tile.center));
            assert!(!tile.neighbors.is_empty());
            for &n in &tile.neighbors {
                assert!(tiles[n].neighbors.contains(&tile.id));
            }
            // Each seed is closer to its own cell than any other seed is.
            for &v in &polygon(tile).vertices {
                let own = v.distance(tile.center);
                for other in &tiles {
                    assert!(own <= v.distance(other.center) + 1e-9);
                }
            }
        }

        // reproducible
        assert_eq!(generate_ok(seeds, region), tiles);
    }

    #[test]
    fn test_seed_errors() {
        let region = Region::new(1.0, 1.0);
        let limits = Limits::default();

        let empty = SeedSource::Points(vec![]);
        assert_eq!(generate(&empty, &region, &limits), Err(TilingError::NoSeeds));
        let zero = SeedSource::Random { count: 0, seed: 1 };
        assert_eq!(generate(&zero, &region, &limits), Err(TilingError::NoSeeds));

        let outside = SeedSource::Points(vec![[0.5, 0.5], [1.5, 0.5]]);
        assert_eq!(
            generate(&outside, &region, &limits),
            Err(TilingError::SeedOutsideRegion {
                index: 1,
                x: 1.5,
                y: 0.5,
            }),
        );

        let duplicate = SeedSource::Points(vec![[0.1, 0.1], [0.5, 0.5], [0.5, 0.5]]);
        assert_eq!(
            generate(&duplicate, &region, &limits),
            Err(TilingConstructionError::DuplicateSeed {
                first: 1,
                second: 2,
            }
            .into()),
        );

        let too_many = SeedSource::Random {
            count: 10_001,
            seed: 1,
        };
        assert!(matches!(
            generate(&too_many, &region, &limits),
            Err(TilingError::TooManyTiles { .. }),
        ));
    }
}

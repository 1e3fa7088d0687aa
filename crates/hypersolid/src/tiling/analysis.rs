use hypersolid_math::Float;
use serde::Serialize;

use super::{PatternKind, Schlafli, TilingPattern};

/// Symmetry group reported for patterns without a lattice.
const IRREGULAR: &str = "irregular";

/// Result of [`analyze()`].
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TilingAnalysis {
    /// Kind of pattern.
    pub pattern: PatternKind,
    /// Number of tiles.
    pub tile_count: usize,
    /// Number of tiles that do not touch the boundary of the region.
    pub interior_tile_count: usize,
    /// Tiles per unit area of the region.
    pub tile_density: Float,
    /// Fraction of the region covered by tiles, in `[0, 1]`. Every generated
    /// tiling overlaps its region, so this is only zero for a pattern with
    /// no tiles.
    pub coverage_efficiency: Float,
    /// Mean number of neighbors of each interior tile, or of each tile if
    /// none are interior.
    pub coordination_number: Float,
    /// Wallpaper group, or `"irregular"`.
    pub symmetry_group: String,
    /// Schlafli symbol, for regular edge-to-edge tilings.
    pub schlafli: Option<Schlafli>,
    /// Vertex configuration such as `4.4.4.4`, for regular edge-to-edge
    /// tilings.
    pub vertex_configuration: Option<String>,
}

/// Computes coverage, coordination, and symmetry information for a tiling.
pub fn analyze(pattern: &TilingPattern) -> TilingAnalysis {
    let region = pattern.region();
    let tiles = pattern.tiles();

    let covered_area: Float = tiles.iter().map(|tile| tile.area_within(region)).sum();
    let coverage = covered_area / region.area();
    // An empty sum is -0.0.
    let coverage_efficiency = if coverage > 0.0 { coverage.min(1.0) } else { 0.0 };

    let margin = region.length_tolerance();
    let interior: Vec<_> = tiles
        .iter()
        .filter(|tile| tile.is_inside(region, margin))
        .collect();
    let coordination_sample = if interior.is_empty() {
        log::debug!("no interior tiles; averaging coordination over all tiles");
        tiles.iter().collect()
    } else {
        interior.clone()
    };
    let coordination_number = mean(coordination_sample.iter().map(|t| t.neighbors.len() as Float));

    let schlafli = pattern.schlafli();
    let symmetry_group = match pattern.kind() {
        PatternKind::Square | PatternKind::Triangular => {
            schlafli.and_then(Schlafli::wallpaper_group)
        }
        // Hexagons and disks on the hexagonal lattice have the same symmetry.
        PatternKind::Hexagonal => Schlafli::HEXAGONAL.wallpaper_group(),
        PatternKind::Voronoi => None,
    }
    .unwrap_or(IRREGULAR);

    TilingAnalysis {
        pattern: pattern.kind(),
        tile_count: tiles.len(),
        interior_tile_count: interior.len(),
        tile_density: tiles.len() as Float / region.area(),
        coverage_efficiency,
        coordination_number,
        symmetry_group: symmetry_group.to_owned(),
        schlafli,
        vertex_configuration: schlafli.and_then(Schlafli::vertex_configuration),
    }
}

fn mean(values: impl ExactSizeIterator<Item = Float>) -> Float {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    values.sum::<Float>() / n as Float
}

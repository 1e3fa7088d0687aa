use std::fmt;

use hypersolid_math::{Float, approx_cmp};
use serde::{Serialize, Serializer};

/// Schlafli symbol `{p,q}` for a regular tiling of the plane: regular
/// `p`-gons with `q` around each vertex.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Schlafli {
    /// Number of vertices in each tile.
    pub p: u8,
    /// Number of tiles around a vertex.
    pub q: u8,
}
impl fmt::Display for Schlafli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{},{}}}", self.p, self.q)
    }
}
impl Serialize for Schlafli {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
impl Schlafli {
    /// Square tiling.
    pub const SQUARE: Self = Self::new(4, 4);
    /// Triangular tiling.
    pub const TRIANGULAR: Self = Self::new(3, 6);
    /// Hexagonal tiling.
    pub const HEXAGONAL: Self = Self::new(6, 3);

    /// Constructs the Schlafli symbol `{p,q}`.
    pub const fn new(p: u8, q: u8) -> Self {
        Self { p, q }
    }

    /// Returns the geometry in which the tiling exists.
    pub fn geometry(self) -> Geometry {
        Geometry::from_schlafli(self.p, self.q)
    }

    /// Returns the vertex configuration, such as `4.4.4.4`, or `None` if the
    /// tiling does not fit in the Euclidean plane.
    pub fn vertex_configuration(self) -> Option<String> {
        (self.geometry() == Geometry::Euclidean)
            .then(|| vec![self.p.to_string(); self.q as usize].join("."))
    }

    /// Returns the wallpaper group of the tiling, or `None` if the tiling
    /// does not fit in the Euclidean plane.
    pub fn wallpaper_group(self) -> Option<&'static str> {
        match self.geometry() {
            Geometry::Euclidean if self.p == 4 => Some("p4m"),
            // {3,6} and {6,3} are dual and share their symmetry.
            Geometry::Euclidean => Some("p6m"),
            Geometry::Spherical | Geometry::Hyperbolic => None,
        }
    }
}

/// Type of 2D geometry.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Geometry {
    /// Positive curvature.
    Spherical,
    /// Zero curvature.
    Euclidean,
    /// Negative curvature.
    Hyperbolic,
}
impl Geometry {
    /// Returns the geometry induced by the Schlafli symbol `{p,q}`.
    pub fn from_schlafli(p: u8, q: u8) -> Self {
        use std::cmp::Ordering::*;

        // {3,6}, {4,4}, and {6,3} are the only Euclidean tilings.
        // 1/3+1/6 = 1/4+1/4 = 0.5
        let test = (p as Float).recip() + (q as Float).recip();

        match approx_cmp(&test, &0.5) {
            Less => Geometry::Hyperbolic,
            Equal => Geometry::Euclidean,
            Greater => Geometry::Spherical,
        }
    }
}

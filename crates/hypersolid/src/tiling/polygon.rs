use cgmath::{Basis2, Point2, Rad, Vector2, prelude::*};
use hypersolid_math::Float;
use itertools::Itertools;
use serde::Serialize;

use super::{HalfPlane, Region};

/// Convex polygon in the plane.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Vertices in counterclockwise order.
    pub vertices: Vec<Point2<Float>>,
}
impl Polygon {
    /// Constructs a polygon from a list of points.
    pub fn from_points(vertices: Vec<Point2<Float>>) -> Self {
        Self { vertices }
    }

    /// Constructs a regular polygon with `p` vertices, the first of which is
    /// at `start_angle` counterclockwise from the +X axis.
    pub fn new_regular(
        center: Point2<Float>,
        circumradius: Float,
        p: u8,
        start_angle: Rad<Float>,
    ) -> Self {
        let step = Rad::full_turn() / p as Float;
        let initial_vector = Vector2::new(circumradius, 0.0);

        let vertices = (0..p)
            .map(|i| {
                let rot = Basis2::from_angle(start_angle + step * i as Float);
                center + rot.rotate_vector(initial_vector)
            })
            .collect();

        Self { vertices }
    }

    /// Returns the edges as pairs of consecutive vertices, wrapping around.
    pub fn edges(&self) -> impl Iterator<Item = (Point2<Float>, Point2<Float>)> + '_ {
        self.vertices.iter().copied().circular_tuple_windows()
    }

    /// Returns the signed area, which is positive for counterclockwise
    /// polygons.
    pub fn signed_area(&self) -> Float {
        // Relative to the first vertex, so that small polygons far from the
        // origin keep their precision.
        let Some(&origin) = self.vertices.first() else {
            return 0.0;
        };
        self.edges()
            .map(|(a, b)| (a - origin).perp_dot(b - origin))
            .sum::<Float>()
            / 2.0
    }
    /// Returns the area.
    pub fn area(&self) -> Float {
        self.signed_area().abs()
    }

    /// Returns the centroid of the enclosed area, or `None` if the polygon
    /// has no area.
    pub fn centroid(&self) -> Option<Point2<Float>> {
        let signed_area = self.signed_area();
        if signed_area == 0.0 {
            return None;
        }
        let origin = *self.vertices.first()?;
        let weighted_sum = self
            .edges()
            .map(|(a, b)| {
                let (a, b) = (a - origin, b - origin);
                (a + b) * a.perp_dot(b)
            })
            .sum::<Vector2<Float>>();
        Some(origin + weighted_sum / (6.0 * signed_area))
    }

    /// Returns the part of the polygon inside `half_plane`.
    #[must_use]
    pub fn clip(&self, half_plane: &HalfPlane) -> Self {
        let labeled = self.vertices.iter().map(|&v| (v, ())).collect_vec();
        let mut clipped = clip_labeled(&labeled, half_plane, ());
        remove_duplicate_vertices(&mut clipped, 0.0);
        Self::from_points(clipped.into_iter().map(|(v, ())| v).collect())
    }
    /// Returns the part of the polygon inside `region`.
    #[must_use]
    pub fn clip_to_region(&self, region: &Region) -> Self {
        region
            .half_planes()
            .iter()
            .fold(self.clone(), |polygon, half_plane| polygon.clip(half_plane))
    }

    /// Returns whether every vertex is at least `margin` inside `region`.
    pub fn is_inside(&self, region: &Region, margin: Float) -> bool {
        self.vertices.iter().all(|&v| region.contains_with_margin(v, margin))
    }

    /// Returns whether every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.vertices.iter().all(|v| v.x.is_finite() && v.y.is_finite())
    }
}

/// Clips a convex polygon against a half-plane using one step of the
/// Sutherland–Hodgman algorithm.
///
/// Each vertex carries the label of the edge that starts at it. Edges created
/// along the boundary of `half_plane` get `boundary_label`.
pub(super) fn clip_labeled<L: Copy>(
    vertices: &[(Point2<Float>, L)],
    half_plane: &HalfPlane,
    boundary_label: L,
) -> Vec<(Point2<Float>, L)> {
    let mut ret = Vec::with_capacity(vertices.len() + 1);
    for (&(a, label), &(b, _)) in vertices.iter().circular_tuple_windows() {
        match (half_plane.contains(a), half_plane.contains(b)) {
            (true, true) => ret.push((a, label)),
            (true, false) => {
                ret.push((a, label));
                let exit = half_plane.intersect_line(a, b).unwrap_or(a);
                ret.push((exit, boundary_label));
            }
            (false, true) => {
                let entry = half_plane.intersect_line(a, b).unwrap_or(b);
                ret.push((entry, label));
            }
            (false, false) => (),
        }
    }
    ret
}

/// Removes vertices that are within `tolerance` of the next vertex, wrapping
/// around. The label of the later vertex is kept.
pub(super) fn remove_duplicate_vertices<L>(
    vertices: &mut Vec<(Point2<Float>, L)>,
    tolerance: Float,
) {
    let mut i = 0;
    while vertices.len() > 1 && i < vertices.len() {
        let next = (i + 1) % vertices.len();
        if vertices[i].0.distance2(vertices[next].0) <= tolerance * tolerance {
            vertices.remove(i);
        } else {
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use cgmath::Deg;
    use pretty_assertions::assert_eq;

    use super::*;

    fn unit_square() -> Polygon {
        Polygon::from_points(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ])
    }

    #[test]
    fn test_area_and_centroid() {
        let square = unit_square();
        assert_eq!(square.signed_area(), 1.0);
        let c = square.centroid().unwrap();
        assert_abs_diff_eq!(c.x, 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(c.y, 0.5, epsilon = 1e-15);

        let hexagon = Polygon::new_regular(Point2::new(3.0, -2.0), 2.0, 6, Deg(30.0).into());
        assert_abs_diff_eq!(hexagon.signed_area(), 6.0 * 3.0_f64.sqrt(), epsilon = 1e-12);
        let c = hexagon.centroid().unwrap();
        assert_abs_diff_eq!(c.x, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.y, -2.0, epsilon = 1e-12);
        // pointy-top
        assert_abs_diff_eq!(hexagon.vertices[1].x, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hexagon.vertices[1].y, 0.0, epsilon = 1e-12);

        let degenerate = Polygon::from_points(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)]);
        assert_eq!(degenerate.centroid(), None);
    }

    #[test]
    fn test_clip() {
        let half_plane = HalfPlane::bisector(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0));
        let clipped = unit_square().clip(&half_plane);
        assert_eq!(clipped.vertices.len(), 3);
        assert_abs_diff_eq!(clipped.area(), 0.5, epsilon = 1e-15);

        let everything = HalfPlane::bisector(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        assert_eq!(unit_square().clip(&everything), unit_square());
    }

    #[test]
    fn test_clip_to_region() {
        let region = Region::new(1.0, 1.0);
        let diamond = Polygon::from_points(vec![
            Point2::new(0.5, -0.5),
            Point2::new(1.5, 0.5),
            Point2::new(0.5, 1.5),
            Point2::new(-0.5, 0.5),
        ]);
        let clipped = diamond.clip_to_region(&region);
        assert_abs_diff_eq!(clipped.area(), 1.0, epsilon = 1e-12);
        assert!(!diamond.is_inside(&region, 0.0));
        assert!(clipped.is_inside(&region, -1e-12));
    }

    #[test]
    fn test_clip_labeled() {
        let labeled: Vec<_> = unit_square().vertices.into_iter().map(|v| (v, 'a')).collect();
        let half_plane = HalfPlane {
            point: Point2::new(0.5, 0.0),
            normal: Vector2::new(1.0, 0.0),
        };
        let clipped = clip_labeled(&labeled, &half_plane, 'b');
        let labels: String = clipped.iter().map(|&(_, l)| l).collect();
        assert_eq!(labels, "abaa");
        assert_eq!(clipped[1].0, Point2::new(0.5, 0.0));
        assert_eq!(clipped[2].0, Point2::new(0.5, 1.0));
    }

    #[test]
    fn test_remove_duplicate_vertices() {
        let mut v = vec![
            (Point2::new(0.0, 0.0), 1),
            (Point2::new(0.0, 0.0), 2),
            (Point2::new(1.0, 0.0), 3),
            (Point2::new(0.0, 1e-15), 4),
        ];
        remove_duplicate_vertices(&mut v, 1e-12);
        let labels: Vec<_> = v.iter().map(|&(_, l)| l).collect();
        assert_eq!(labels, [2, 3]);
    }
}

use cgmath::{Point2, Vector2, prelude::*};
use hypersolid_math::Float;

/// Closed half of the plane, `{ p : normal · (p - point) <= 0 }`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HalfPlane {
    /// Any point on the boundary line.
    pub point: Point2<Float>,
    /// Outward normal. Does not need to be normalized.
    pub normal: Vector2<Float>,
}
impl HalfPlane {
    /// Returns the half-plane of points at least as close to `a` as to `b`,
    /// bounded by their perpendicular bisector.
    pub fn bisector(a: Point2<Float>, b: Point2<Float>) -> Self {
        Self {
            point: Point2::midpoint(a, b),
            normal: b - a,
        }
    }

    /// Returns the signed height of `p` above the boundary, scaled by the
    /// length of the normal. Negative heights are inside.
    pub fn height(&self, p: Point2<Float>) -> Float {
        self.normal.dot(p - self.point)
    }

    /// Returns whether `p` is inside the half-plane or on its boundary.
    pub fn contains(&self, p: Point2<Float>) -> bool {
        self.height(p) <= 0.0
    }

    /// Returns the point where the line through `a` and `b` crosses the
    /// boundary, or `None` if it is parallel to the boundary.
    pub fn intersect_line(&self, a: Point2<Float>, b: Point2<Float>) -> Option<Point2<Float>> {
        let ah = self.height(a);
        let bh = self.height(b);

        // If `a` and `b` are on opposite sides, `ah - bh` is the sum of the
        // absolute values of their heights.
        let t = ah / (ah - bh);
        t.is_finite().then(|| lerp(a, b, t))
    }
}

/// Linearly interpolates from `a` to `b`.
pub fn lerp(a: Point2<Float>, b: Point2<Float>, t: Float) -> Point2<Float> {
    a + (b - a) * t
}

/// Returns the area of the intersection of a disk with the axis-aligned
/// rectangle from `min` to `max`.
pub fn disk_rect_area(
    center: Point2<Float>,
    radius: Float,
    min: Point2<Float>,
    max: Point2<Float>,
) -> Float {
    let nearest = Point2::new(
        center.x.max(min.x).min(max.x),
        center.y.max(min.y).min(max.y),
    );
    if nearest.distance(center) >= radius {
        return 0.0;
    }
    let farthest = Vector2::new(
        (min.x - center.x).abs().max((max.x - center.x).abs()),
        (min.y - center.y).abs().max((max.y - center.y).abs()),
    );
    if farthest.magnitude() <= radius {
        return (max.x - min.x) * (max.y - min.y);
    }

    // Inclusion-exclusion over the quadrants {X >= x, Y >= y} at each corner.
    let q = |x: Float, y: Float| disk_quadrant_area(x - center.x, y - center.y, radius);
    (q(min.x, min.y) - q(max.x, min.y) - q(min.x, max.y) + q(max.x, max.y)).max(0.0)
}

/// Returns the area of `{X >= x, Y >= y}` within the disk of radius `r`
/// centered at the origin.
fn disk_quadrant_area(x: Float, y: Float, r: Float) -> Float {
    if y < 0.0 {
        return disk_column_area(x, r) - disk_quadrant_area(x, -y, r);
    }
    if y >= r {
        return 0.0;
    }
    let half_chord = (r * r - y * y).sqrt();
    let lo = x.max(-half_chord);
    if lo >= half_chord {
        return 0.0;
    }
    semicircle_integral(half_chord, r) - semicircle_integral(lo, r) - y * (half_chord - lo)
}

/// Returns the area of `{X >= x}` within the disk of radius `r` centered at
/// the origin.
fn disk_column_area(x: Float, r: Float) -> Float {
    2.0 * (semicircle_integral(r, r) - semicircle_integral(x, r))
}

/// Antiderivative of `√(r² - t²)`, clamped to `[-r, r]`.
fn semicircle_integral(t: Float, r: Float) -> Float {
    let t = t.clamp(-r, r);
    0.5 * (t * (r * r - t * t).sqrt() + r * r * (t / r).asin())
}

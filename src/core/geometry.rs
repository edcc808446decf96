//! Geometry Primitives
//!
//! Pure, allocation-free intersection tests used by the collision code.
//! All inputs are in the arena frame (origin = level center), so the circle
//! of [`line_circle_intersection`] is always centered at the origin.

use super::vec2::Vec2;

/// Result of intersecting a line with a circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Intersection {
    /// No real intersection.
    None,
    /// Tangent: exactly one point.
    One(Vec2),
    /// Secant: two points, in `(-b + √Δ, -b - √Δ)` order.
    Two(Vec2, Vec2),
}

impl Intersection {
    /// Number of intersection points (0, 1 or 2).
    #[inline]
    pub fn count(&self) -> u8 {
        match self {
            Intersection::None => 0,
            Intersection::One(_) => 1,
            Intersection::Two(_, _) => 2,
        }
    }
}

/// Intersect the line through `p1` and `p2` with the origin-centered circle
/// of squared radius `radius_squared`.
///
/// Solves `|p1 + t (p2 - p1)|² = r²` for `t` without clamping `t`, so the
/// whole line is considered, not just the segment.
pub fn line_circle_intersection(p1: Vec2, p2: Vec2, radius_squared: f32) -> Intersection {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let a = dx * dx + dy * dy;
    let b = 2.0 * (dx * p1.x + dy * p1.y);
    let c = p1.x * p1.x + p1.y * p1.y - radius_squared;
    let delta = b * b - 4.0 * a * c;

    // Degenerate edge (p1 == p2) or a miss.
    if a == 0.0 || delta < 0.0 {
        return Intersection::None;
    }

    let two_a = a * 2.0;

    if delta == 0.0 {
        let t = -b / two_a;
        return Intersection::One(Vec2::new(p1.x + t * dx, p1.y + t * dy));
    }

    let sqrt_delta = delta.sqrt();
    let t1 = (-b + sqrt_delta) / two_a;
    let t2 = (-b - sqrt_delta) / two_a;
    Intersection::Two(
        Vec2::new(p1.x + t1 * dx, p1.y + t1 * dy),
        Vec2::new(p1.x + t2 * dx, p1.y + t2 * dy),
    )
}

/// Like [`line_circle_intersection`], collapsed to the solution closest to
/// `reference`. Ties keep the first solution.
pub fn line_circle_closest_intersection(
    reference: Vec2,
    p1: Vec2,
    p2: Vec2,
    radius_squared: f32,
) -> Option<Vec2> {
    match line_circle_intersection(p1, p2, radius_squared) {
        Intersection::None => None,
        Intersection::One(v) => Some(v),
        Intersection::Two(v1, v2) => {
            if (v1 - reference).length_squared() > (v2 - reference).length_squared() {
                Some(v2)
            } else {
                Some(v1)
            }
        }
    }
}

/// Even-odd crossing test of `(x, y)` against an arbitrary quad.
///
/// Works for non-convex and self-intersecting vertex orders.
pub fn point_in_polygon(vertices: &[Vec2; 4], x: f32, y: f32) -> bool {
    let mut result = false;
    let mut j = vertices.len() - 1;

    for (i, vi) in vertices.iter().enumerate() {
        let vj = vertices[j];
        if ((vi.y > y) != (vj.y > y)) && (x < (vj.x - vi.x) * (y - vi.y) / (vj.y - vi.y) + vi.x) {
            result = !result;
        }
        j = i;
    }

    result
}

// =============================================================================
// TESTS
// =============================================================================

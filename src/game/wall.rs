//! Walls
//!
//! The two wall representations and the capability set the collision code
//! runs against:
//!
//! - [`CurveWall`]: a quad spawned on one side of the level polygon that
//!   closes in on the center and rotates with its curve speed.
//! - [`CustomWall`]: a free-form quad that remembers last tick's vertices.
//!
//! ```text
//!        3 ─────── 2        edge (i, j) joins vertex i and j = i - 1 mod 4
//!        │         │        (0,3) and (2,1): radial sides
//!        │         │        (1,0): inner edge, the killing side
//!        0 ─────── 1        (3,2): outer edge
//!             ▼ center
//! ```

use serde::{Serialize, Deserialize};
use std::f32::consts::TAU;

use crate::core::geometry::point_in_polygon;
use crate::core::vec2::Vec2;
use crate::game::speed::SpeedData;

pub use crate::game::custom_wall::{CustomWall, CustomWallMotion};

/// Capabilities shared by both wall variants.
///
/// The escape search is generic over this trait.
pub trait WallGeometry {
    /// Current tick's vertices.
    fn vertex_positions(&self) -> &[Vec2; 4];

    /// Index `j` of the edge `(j + 1, j)` that must never serve as an escape.
    fn killing_side(&self) -> usize;

    /// Selects the edge stride of the escape search.
    fn is_custom_wall(&self) -> bool;

    /// Point-in-quad test against the current vertices.
    fn is_overlapping(&self, point: Vec2) -> bool {
        point_in_polygon(self.vertex_positions(), point.x, point.y)
    }

    /// Edge increment used by the escape search: every side for custom
    /// walls, only the two radial sides for curve walls.
    fn edge_stride(&self) -> usize {
        if self.is_custom_wall() {
            1
        } else {
            2
        }
    }
}

/// A wall moving along a deterministic radial + angular curve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveWall {
    vertices: [Vec2; 4],
    speed: SpeedData,
    curve: SpeedData,
    collapsed: bool,
}

impl CurveWall {
    /// Curve walls never escape through their inner edge; at stride 2 it is
    /// not visited anyway.
    pub const KILLING_SIDE: usize = 0;

    /// Spawn a wall on `side` of a `sides`-gon around `center`.
    ///
    /// # Panics
    ///
    /// Panics if the polygon has fewer than 3 sides or `side` is out of range.
    pub fn new(
        center: Vec2,
        sides: u32,
        side: u32,
        thickness: f32,
        distance: f32,
        speed: SpeedData,
        curve: SpeedData,
    ) -> Self {
        assert!(sides >= 3, "level polygon needs at least 3 sides, got {}", sides);
        assert!(side < sides, "side {} out of range for {} sides", side, sides);

        let div = TAU / sides as f32 * 0.5;
        let angle = div * 2.0 * side as f32;

        let vertices = [
            center.moved_towards(distance, angle - div),
            center.moved_towards(distance, angle + div),
            center.moved_towards(distance + thickness, angle + div),
            center.moved_towards(distance + thickness, angle - div),
        ];

        Self::from_vertices(vertices, speed, curve)
    }

    /// Build a curve wall from explicit vertices.
    pub fn from_vertices(vertices: [Vec2; 4], speed: SpeedData, curve: SpeedData) -> Self {
        Self {
            vertices,
            speed,
            curve,
            collapsed: false,
        }
    }

    /// Radial speed profile.
    pub fn speed(&self) -> &SpeedData {
        &self.speed
    }

    /// Angular speed profile.
    pub fn curve(&self) -> &SpeedData {
        &self.curve
    }

    /// Advance one tick.
    ///
    /// Vertices inside the `collapse_radius` box around `center` stop; the
    /// rest move toward the center and then along the curve. Once all four
    /// vertices have stopped the wall is collapsed.
    pub fn update(&mut self, center: Vec2, ft: f32, collapse_radius: f32) {
        self.speed.update(ft);
        self.curve.update(ft);

        let step = self.speed.speed * 5.0 * ft;
        let mut points_on_center = 0;

        for i in 0..self.vertices.len() {
            let vp = self.vertices[i];
            if (vp.x - center.x).abs() < collapse_radius && (vp.y - center.y).abs() < collapse_radius {
                points_on_center += 1;
            } else {
                let moved = vp.moved_toward_point(center, step);
                self.vertices[i] = self.move_vertex_along_curve(moved, center, ft);
            }
        }

        if points_on_center > 3 {
            self.collapsed = true;
        }
    }

    /// Where `point` would be after one tick if it were rigidly attached to
    /// this wall's rotation.
    #[inline]
    pub fn move_vertex_along_curve(&self, point: Vec2, center: Vec2, ft: f32) -> Vec2 {
        let curve_speed = self.curve.speed;
        if curve_speed == 0.0 {
            return point;
        }
        point.rotated_around(center, curve_speed / 60.0 * ft)
    }

    /// Has the wall collapsed onto the center?
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Collapsed, or every vertex beyond `despawn_distance` from `center`.
    pub fn is_dead(&self, center: Vec2, despawn_distance: f32) -> bool {
        let limit = despawn_distance * despawn_distance;
        self.collapsed
            || self
                .vertices
                .iter()
                .all(|v| v.distance_squared(center) > limit)
    }
}

impl WallGeometry for CurveWall {
    fn vertex_positions(&self) -> &[Vec2; 4] {
        &self.vertices
    }

    fn killing_side(&self) -> usize {
        Self::KILLING_SIDE
    }

    fn is_custom_wall(&self) -> bool {
        false
    }
}

/// The closed set of walls a level holds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Wall {
    /// Rotating/closing polygon segment
    Curve(CurveWall),
    /// Script-posed quad
    Custom(CustomWall),
}

impl Wall {
    /// Curve variant, if any.
    pub fn as_curve(&self) -> Option<&CurveWall> {
        match self {
            Wall::Curve(w) => Some(w),
            Wall::Custom(_) => None,
        }
    }

    /// Custom variant, if any.
    pub fn as_custom(&self) -> Option<&CustomWall> {
        match self {
            Wall::Curve(_) => None,
            Wall::Custom(w) => Some(w),
        }
    }
}

impl WallGeometry for Wall {
    fn vertex_positions(&self) -> &[Vec2; 4] {
        match self {
            Wall::Curve(w) => w.vertex_positions(),
            Wall::Custom(w) => w.vertex_positions(),
        }
    }

    fn killing_side(&self) -> usize {
        match self {
            Wall::Curve(w) => w.killing_side(),
            Wall::Custom(w) => w.killing_side(),
        }
    }

    fn is_custom_wall(&self) -> bool {
        matches!(self, Wall::Custom(_))
    }
}

impl From<CurveWall> for Wall {
    fn from(wall: CurveWall) -> Self {
        Wall::Curve(wall)
    }
}

impl From<CustomWall> for Wall {
    fn from(wall: CustomWall) -> Self {
        Wall::Custom(wall)
    }
}

// =============================================================================
// TESTS
// =============================================================================

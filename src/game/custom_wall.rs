//! Custom Walls
//!
//! Free-form quads posed by level scripts or pattern generators. Each custom
//! wall keeps last tick's vertices so the player push can measure how far an
//! edge swept across the orbit in one tick.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::wall::WallGeometry;

/// Per-tick motion applied by [`CustomWall::update`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomWallMotion {
    /// Rotation around the level center, same units as a curve speed
    pub angular_speed: f32,
    /// Movement toward the level center, same units as a wall speed
    pub radial_speed: f32,
}

/// A script-posed quad.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomWall {
    vertices: [Vec2; 4],
    old_vertices: [Vec2; 4],
    killing_side: usize,
    can_collide: bool,
    deadly: bool,
    motion: Option<CustomWallMotion>,
    remaining_ticks: Option<u32>,
}

impl CustomWall {
    /// A collidable, non-deadly wall at `vertices`, killing side 0.
    pub fn new(vertices: [Vec2; 4]) -> Self {
        Self {
            vertices,
            old_vertices: vertices,
            killing_side: 0,
            can_collide: true,
            deadly: false,
            motion: None,
            remaining_ticks: None,
        }
    }

    /// Attach a per-tick motion.
    pub fn with_motion(mut self, motion: CustomWallMotion) -> Self {
        self.motion = Some(motion);
        self
    }

    /// Expire the wall after `ticks` updates.
    pub fn with_lifetime(mut self, ticks: u32) -> Self {
        self.remaining_ticks = Some(ticks);
        self
    }

    /// Last tick's vertices.
    pub fn old_vertex_positions(&self) -> &[Vec2; 4] {
        &self.old_vertices
    }

    /// Set one vertex.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 4`.
    pub fn set_vertex_pos(&mut self, index: usize, pos: Vec2) {
        assert!(index < 4, "vertex index {} out of range", index);
        self.vertices[index] = pos;
    }

    /// Offset one vertex.
    pub fn move_vertex_pos(&mut self, index: usize, offset: Vec2) {
        assert!(index < 4, "vertex index {} out of range", index);
        self.vertices[index] += offset;
    }

    /// Replace all four vertices.
    pub fn set_vertex_positions(&mut self, vertices: [Vec2; 4]) {
        self.vertices = vertices;
    }

    /// Commit the current vertices as last tick's.
    pub fn update_old_vertex_positions(&mut self) {
        self.old_vertices = self.vertices;
    }

    /// # Panics
    ///
    /// Panics if `side >= 4`.
    pub fn set_killing_side(&mut self, side: usize) {
        assert!(side < 4, "killing side {} out of range", side);
        self.killing_side = side;
    }

    /// Does the wall take part in collisions?
    pub fn can_collide(&self) -> bool {
        self.can_collide
    }

    /// Enable or disable collisions.
    pub fn set_can_collide(&mut self, can_collide: bool) {
        self.can_collide = can_collide;
    }

    /// Does touching the wall kill without a push?
    pub fn is_deadly(&self) -> bool {
        self.deadly
    }

    /// Mark the wall deadly.
    pub fn set_deadly(&mut self, deadly: bool) {
        self.deadly = deadly;
    }

    /// Per-tick motion, if any.
    pub fn motion(&self) -> Option<&CustomWallMotion> {
        self.motion.as_ref()
    }

    /// Has the lifetime run out?
    pub fn is_expired(&self) -> bool {
        self.remaining_ticks == Some(0)
    }

    /// Advance one tick: commit old vertices, then apply the motion.
    pub fn update(&mut self, center: Vec2, ft: f32) {
        self.update_old_vertex_positions();

        if let Some(ticks) = self.remaining_ticks.as_mut() {
            *ticks = ticks.saturating_sub(1);
        }

        let Some(motion) = self.motion else {
            return;
        };

        let rotation = motion.angular_speed / 60.0 * ft;
        let step = motion.radial_speed * 5.0 * ft;

        for v in self.vertices.iter_mut() {
            let mut p = *v;
            if step != 0.0 {
                p = p.moved_toward_point(center, step);
            }
            if rotation != 0.0 {
                p = p.rotated_around(center, rotation);
            }
            *v = p;
        }
    }
}

impl WallGeometry for CustomWall {
    fn vertex_positions(&self) -> &[Vec2; 4] {
        &self.vertices
    }

    fn killing_side(&self) -> usize {
        self.killing_side
    }

    fn is_custom_wall(&self) -> bool {
        true
    }
}

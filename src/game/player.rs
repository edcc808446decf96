//! Player Entity
//!
//! The orbiting player: input-driven kinematics plus the collision/escape
//! resolution against curve and custom walls.
//!
//! Per tick the driver calls, in order:
//! 1. [`Player::update`]
//! 2. [`Player::update_input_movement`]
//! 3. [`Player::update_position`]
//! 4. [`Player::push_curve`] / [`Player::push_custom`] for every wall the
//!    player overlaps, stopping at the first death.
//!
//! Everything here runs on `f32` with `+ - * /` and `sqrt`, plus the
//! polynomial trig in [`crate::core::math`], so identical inputs produce
//! bit-identical positions on every platform.

use serde::{Serialize, Deserialize};
use std::f32::consts::PI;

use crate::core::geometry::{line_circle_closest_intersection, point_in_polygon};
use crate::core::math::{move_towards, move_towards_zero, sign, smooth_step, to_rad};
use crate::core::vec2::Vec2;
use crate::game::custom_wall::CustomWall;
use crate::game::ticker::Ticker;
use crate::game::wall::{CurveWall, Wall, WallGeometry};

/// Distance the player is nudged clear of a wall after a push.
pub const COLLISION_PADDING: f32 = 0.5;

/// Custom-wall push vectors more radial than this are discarded.
pub const PUSH_DOT_THRESHOLD: f32 = 0.15;

/// Added to the squared one-tick travel to get the escape search cutoff.
pub const SAFE_DISTANCE_SLACK: f32 = 32.0;

/// A fatal hit only snaps the player back onto the wall when it moved less
/// than this in the killing tick.
pub const KILL_SNAP_LIMIT: f32 = 24.0;

const UNFOCUSED_TRIANGLE_WIDTH: f32 = 3.0;
const FOCUSED_TRIANGLE_WIDTH: f32 = -1.5;
const TRIANGLE_WIDTH_RANGE: f32 = UNFOCUSED_TRIANGLE_WIDTH - FOCUSED_TRIANGLE_WIDTH;

/// The player's full simulation state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    start_pos: Vec2,
    pos: Vec2,
    pre_push_pos: Vec2,
    last_pos: Vec2,

    angle: f32,
    last_angle: f32,
    radius: f32,
    max_safe_distance: f32,
    current_speed: f32,

    size: f32,
    speed: f32,
    focus_speed: f32,

    dead: bool,
    just_swapped: bool,
    forced_move: bool,

    swap_cooldown: f32,
    swap_timer: Ticker,

    tilt: f32,
    triangle_width: f32,
    triangle_width_transition: f32,
}

impl Player {
    /// Create a player orbiting `anchor` at angle 0.
    ///
    /// The position stays at the anchor until the first
    /// [`update_position`](Self::update_position).
    pub fn new(anchor: Vec2, swap_cooldown: f32, size: f32, speed: f32, focus_speed: f32) -> Self {
        Self {
            start_pos: anchor,
            pos: anchor,
            pre_push_pos: anchor,
            last_pos: anchor,
            angle: 0.0,
            last_angle: 0.0,
            radius: 0.0,
            max_safe_distance: 0.0,
            current_speed: 0.0,
            size,
            speed,
            focus_speed,
            dead: false,
            just_swapped: false,
            forced_move: false,
            swap_cooldown,
            swap_timer: Ticker::new(swap_cooldown, true),
            tilt: 0.0,
            triangle_width: UNFOCUSED_TRIANGLE_WIDTH,
            triangle_width_transition: 0.0,
        }
    }

    // =========================================================================
    // Per-tick kinematics
    // =========================================================================

    /// Start-of-tick bookkeeping.
    pub fn update(&mut self, focused: bool, swap_enabled: bool, ft: f32) {
        self.update_triangle_width(focused, ft);

        if self.dead {
            return;
        }

        if swap_enabled && self.swap_timer.update(ft) {
            self.swap_timer.stop();
        }

        self.last_angle = self.angle;
        self.forced_move = false;
        self.just_swapped = false;
    }

    fn update_triangle_width(&mut self, focused: bool, ft: f32) {
        let target = if focused { 1.0 } else { 0.0 };
        self.triangle_width_transition = move_towards(self.triangle_width_transition, target, ft * 0.1);
        self.triangle_width =
            TRIANGLE_WIDTH_RANGE * (1.0 - smooth_step(0.0, 1.0, self.triangle_width_transition));
    }

    /// Integrate the input direction into the angle.
    pub fn update_input_movement(&mut self, movement_dir: f32, speed_mult: f32, focused: bool, ft: f32) {
        let base = if focused { self.focus_speed } else { self.speed };
        self.current_speed = speed_mult * base * ft;
        self.angle += to_rad(self.current_speed * movement_dir);

        let inc = ft / 10.0;
        self.tilt = if movement_dir == 0.0 {
            move_towards_zero(self.tilt, inc)
        } else {
            move_towards(self.tilt, movement_dir, inc * 2.0)
        };
    }

    /// Recompute the committed position from the angle and the escape cutoff
    /// from the one-tick travel.
    ///
    /// # Panics
    ///
    /// Panics if `radius` is not positive.
    pub fn update_position(&mut self, radius: f32) {
        assert!(radius > 0.0, "orbit radius must be positive, got {}", radius);

        self.radius = radius;
        self.pos = self.start_pos.moved_towards(radius, self.angle);
        self.pre_push_pos = self.pos;
        self.last_pos = self.start_pos.moved_towards(radius, self.last_angle);

        let predicted = self
            .start_pos
            .moved_towards(radius, self.last_angle + to_rad(self.current_speed));
        self.max_safe_distance = (self.last_pos - predicted).length_squared() + SAFE_DISTANCE_SLACK;
    }

    /// Turn around. The cooldown restarts.
    pub fn swap(&mut self) {
        self.angle += PI;
        self.swap_timer.restart(self.swap_cooldown);
        self.just_swapped = true;
    }

    /// Is the swap cooldown over?
    pub fn is_ready_to_swap(&self) -> bool {
        !self.swap_timer.is_running()
    }

    /// Teleport to `angle` this tick (scripted move).
    pub fn force_angle(&mut self, angle: f32) {
        self.angle = angle;
        self.forced_move = true;
    }

    /// Register a hit. Non-fatal hits have no simulation effect.
    pub fn kill(&mut self, fatal: bool) {
        if !fatal {
            return;
        }

        self.dead = true;

        if !self.just_swapped && (self.last_pos - self.pos).length() < KILL_SNAP_LIMIT {
            self.pos = self.last_pos.moved_towards(-self.size, self.angle);
        }
    }

    // =========================================================================
    // Collision
    // =========================================================================

    /// Find the nearest point where one of `wall`'s non-killing edges crosses
    /// the orbit circle, within the escape cutoff of `trial`.
    ///
    /// Returns `None` when no edge offers such a point; the player is
    /// then crushed by this wall.
    pub fn check_wall_collision_escape<W: WallGeometry + ?Sized>(
        &self,
        wall: &W,
        trial: Vec2,
        radius_squared: f32,
    ) -> Option<Vec2> {
        let vertices = wall.vertex_positions();
        let killing_side = wall.killing_side();
        let stride = wall.edge_stride();

        let mut safe_distance = self.max_safe_distance;
        let mut best = None;

        for i in (0..4).step_by(stride) {
            let j = (i + 3) % 4;
            if j == killing_side {
                continue;
            }

            let Some(candidate) =
                line_circle_closest_intersection(trial, vertices[i], vertices[j], radius_squared)
            else {
                continue;
            };

            let distance = (candidate - trial).length_squared();
            if distance < safe_distance {
                safe_distance = distance;
                best = Some(candidate);
            }
        }

        best
    }

    /// Resolve contact with a curve wall. Returns true if the player died.
    ///
    /// # Panics
    ///
    /// Panics on a live player if `radius` or `radius_squared` is not positive.
    pub fn push_curve(
        &mut self,
        movement_dir: i32,
        radius: f32,
        wall: &CurveWall,
        center: Vec2,
        radius_squared: f32,
        ft: f32,
    ) -> bool {
        if self.dead {
            return false;
        }
        assert_push_radius(radius, radius_squared);

        let mut test_pos = self.pos;
        let mut push_vel = Vec2::ZERO;

        let curve_speed = wall.curve().speed;
        if curve_speed != 0.0 && sign(curve_speed) != movement_dir {
            test_pos = wall.move_vertex_along_curve(test_pos, center, ft);
            push_vel = test_pos - self.pos;
        }

        if movement_dir == 0 && !self.forced_move {
            let nudge = (test_pos - self.pre_push_pos).normalize();
            self.commit(test_pos + nudge * (2.0 * COLLISION_PADDING), radius);
            return wall.is_overlapping(self.pos);
        }

        self.escape_or_die(wall, self.last_pos + push_vel, radius, radius_squared)
    }

    /// Resolve contact with a custom wall. Returns true if the player died.
    ///
    /// Custom walls carry no curve, so the drag is inferred from how the
    /// edge enclosing the last position moved since the previous tick.
    /// `_ft` is unused; it keeps the signature in line with [`push_curve`](Self::push_curve).
    ///
    /// # Panics
    ///
    /// Panics on a live player if `radius` or `radius_squared` is not positive.
    pub fn push_custom(
        &mut self,
        movement_dir: i32,
        radius: f32,
        wall: &CustomWall,
        radius_squared: f32,
        _ft: f32,
    ) -> bool {
        if self.dead {
            return false;
        }
        assert_push_radius(radius, radius_squared);

        let push_vel = self.custom_wall_push_velocity(wall, radius_squared);

        if movement_dir == 0 && !self.forced_move {
            let pushed = self.pos + push_vel;
            let nudge = (pushed - self.pre_push_pos).normalize();
            self.commit(pushed + nudge * (2.0 * COLLISION_PADDING), radius);
            return wall.is_overlapping(self.pos);
        }

        self.escape_or_die(wall, self.last_pos + push_vel, radius, radius_squared)
    }

    /// Dispatch on the wall variant.
    pub fn push(
        &mut self,
        movement_dir: i32,
        radius: f32,
        wall: &Wall,
        center: Vec2,
        radius_squared: f32,
        ft: f32,
    ) -> bool {
        match wall {
            Wall::Curve(w) => self.push_curve(movement_dir, radius, w, center, radius_squared, ft),
            Wall::Custom(w) => self.push_custom(movement_dir, radius, w, radius_squared, ft),
        }
    }

    /// Drag imparted by a custom wall this tick.
    ///
    /// The first non-killing edge whose swept area (current and previous
    /// tick) contains the last position decides. The drag is the shift of
    /// that edge's orbit crossing; nearly radial drags are zeroed.
    pub fn custom_wall_push_velocity(&self, wall: &CustomWall, radius_squared: f32) -> Vec2 {
        let current = wall.vertex_positions();
        let old = wall.old_vertex_positions();
        let killing_side = wall.killing_side();
        let last = self.last_pos;

        for i in 0..4 {
            let j = (i + 3) % 4;
            if j == killing_side {
                continue;
            }

            let swept = [current[i], old[i], old[j], current[j]];
            if !point_in_polygon(&swept, last.x, last.y) {
                continue;
            }

            let before = line_circle_closest_intersection(last, old[i], old[j], radius_squared);
            let after = line_circle_closest_intersection(last, current[i], current[j], radius_squared);

            if let (Some(i1), Some(i2)) = (before, after) {
                let push_vel = i2 - i1;
                if push_vel.normalize().dot(last.normalize()).abs() > PUSH_DOT_THRESHOLD {
                    return Vec2::ZERO;
                }
                return push_vel;
            }

            return Vec2::ZERO;
        }

        Vec2::ZERO
    }

    fn escape_or_die<W: WallGeometry + ?Sized>(
        &mut self,
        wall: &W,
        test_pos: Vec2,
        radius: f32,
        radius_squared: f32,
    ) -> bool {
        if wall.is_overlapping(test_pos) {
            return true;
        }

        let Some(escape) = self.check_wall_collision_escape(wall, test_pos, radius_squared) else {
            return true;
        };

        #[cfg(feature = "debug-tracing")]
        tracing::trace!(?test_pos, ?escape, "player escaped wall");

        let nudge = (escape - self.pre_push_pos).normalize();
        self.commit(escape + nudge * COLLISION_PADDING, radius);
        false
    }

    /// Take the angle of `pos` around the anchor and snap back onto the orbit.
    fn commit(&mut self, pos: Vec2, radius: f32) {
        self.pos = pos;
        self.angle = (pos - self.start_pos).angle();
        self.update_position(radius);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Orbit anchor.
    pub fn start_pos(&self) -> Vec2 {
        self.start_pos
    }

    /// Committed position.
    pub fn position(&self) -> Vec2 {
        self.pos
    }

    /// Position at last tick's angle.
    pub fn last_position(&self) -> Vec2 {
        self.last_pos
    }

    /// Position before any push this tick.
    pub fn pre_push_position(&self) -> Vec2 {
        self.pre_push_pos
    }

    /// Facing angle in radians.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Last tick's angle.
    pub fn last_angle(&self) -> f32 {
        self.last_angle
    }

    /// Orbit radius of the last position update.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Squared escape search cutoff.
    pub fn max_safe_distance_squared(&self) -> f32 {
        self.max_safe_distance
    }

    /// Degrees travelled this tick.
    pub fn current_speed(&self) -> f32 {
        self.current_speed
    }

    /// Has a fatal hit been registered?
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Did the player swap this tick?
    pub fn just_swapped(&self) -> bool {
        self.just_swapped
    }

    /// Visual lean in [-1, 1].
    pub fn tilt(&self) -> f32 {
        self.tilt
    }

    /// Visual triangle width, narrower when focused.
    pub fn triangle_width(&self) -> f32 {
        self.triangle_width
    }

    /// Triangle size, used to place a dead player on the wall.
    pub fn size(&self) -> f32 {
        self.size
    }
}

fn assert_push_radius(radius: f32, radius_squared: f32) {
    assert!(
        radius > 0.0 && radius_squared > 0.0,
        "push needs a positive orbit, got radius {} and radius squared {}",
        radius,
        radius_squared
    );
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::speed::SpeedData;
    use proptest::prelude::*;

    const FT: f32 = 0.25;
    const RADIUS: f32 = 72.0;

    fn player() -> Player {
        Player::new(Vec2::ZERO, 6.0, 7.3, 9.45, 4.625)
    }

    /// A player that moved one tick counter-clockwise from angle 0.
    fn moving_player() -> Player {
        let mut p = player();
        p.update(false, true, FT);
        p.update_input_movement(1.0, 1.0, false, FT);
        p.update_position(RADIUS);
        p
    }

    fn polar(distance: f32, degrees: f32) -> Vec2 {
        Vec2::ZERO.moved_towards(distance, to_rad(degrees))
    }

    /// Quad between two angles, laid out like a curve wall.
    fn sector(from: f32, to: f32) -> [Vec2; 4] {
        [polar(50.0, from), polar(50.0, to), polar(100.0, to), polar(100.0, from)]
    }

    #[test]
    fn test_update_position_invariant() {
        let mut p = moving_player();
        assert_eq!(p.position(), Vec2::ZERO.moved_towards(RADIUS, p.angle()));
        assert_eq!(p.pre_push_position(), p.position());
        assert_eq!(p.last_position(), Vec2::new(RADIUS, 0.0));

        // One tick of travel at 2.3625 degrees, plus slack
        let chord = (p.position() - p.last_position()).length_squared();
        assert!((p.max_safe_distance_squared() - chord - SAFE_DISTANCE_SLACK).abs() < 1e-3);

        p.update(false, true, FT);
        assert_eq!(p.last_angle(), p.angle());
    }

    #[test]
    fn test_focus_slows_movement() {
        let mut fast = player();
        fast.update_input_movement(1.0, 1.0, false, FT);
        let mut slow = player();
        slow.update_input_movement(1.0, 1.0, true, FT);
        assert!(slow.angle() < fast.angle());
        assert!((fast.angle() - to_rad(9.45 * FT)).abs() < 1e-6);
    }

    #[test]
    fn test_tilt_and_triangle_width() {
        let mut p = player();
        for _ in 0..100 {
            p.update(true, true, FT);
            p.update_input_movement(-1.0, 1.0, true, FT);
        }
        assert_eq!(p.tilt(), -1.0);
        assert_eq!(p.triangle_width(), 0.0);

        for _ in 0..100 {
            p.update(false, true, FT);
            p.update_input_movement(0.0, 1.0, false, FT);
        }
        assert_eq!(p.tilt(), 0.0);
        assert_eq!(p.triangle_width(), TRIANGLE_WIDTH_RANGE);
    }

    #[test]
    fn test_triangle_width_starts_unfocused() {
        let mut p = player();
        assert_eq!(p.triangle_width(), UNFOCUSED_TRIANGLE_WIDTH);

        // First update snaps onto the transition curve
        p.update(false, true, FT);
        assert_eq!(p.triangle_width(), TRIANGLE_WIDTH_RANGE);

        p.update(true, true, FT);
        assert!(p.triangle_width() > 0.0 && p.triangle_width() < TRIANGLE_WIDTH_RANGE);
    }

    #[test]
    fn test_swap_cooldown() {
        let mut p = player();
        assert!(!p.is_ready_to_swap());

        // Cooldown of 6 frames = 24 ticks
        for _ in 0..24 {
            p.update(false, true, FT);
        }
        assert!(p.is_ready_to_swap());

        p.swap();
        assert!(p.just_swapped());
        assert!(!p.is_ready_to_swap());
        assert!((p.angle() - PI).abs() < 1e-6);

        p.update(false, true, FT);
        assert!(!p.just_swapped());
    }

    #[test]
    fn test_kill_snaps_back_onto_wall() {
        let mut p = moving_player();
        p.kill(false);
        assert!(!p.is_dead());

        p.kill(true);
        assert!(p.is_dead());
        let expected = p.last_position().moved_towards(-p.size(), p.angle());
        assert_eq!(p.position(), expected);
    }

    #[test]
    fn test_push_dead_player_is_noop() {
        let mut p = moving_player();
        p.kill(true);
        let before = p.clone();

        let curve = CurveWall::from_vertices(
            sector(-10.0, 10.0),
            SpeedData::constant(1.0),
            SpeedData::constant(5.0),
        );
        let custom = CustomWall::new(sector(-10.0, 10.0));

        assert!(!p.push_curve(1, RADIUS, &curve, Vec2::ZERO, RADIUS * RADIUS, FT));
        assert!(!p.push_custom(0, RADIUS, &custom, RADIUS * RADIUS, FT));
        assert_eq!(p, before);
    }

    /// Rectangle x in [71.8, 100], y in [-20, 20]. Only the outer edge (3,2)
    /// at x = 71.8 crosses the orbit close to (72, 0).
    fn outer_edge_rect() -> [Vec2; 4] {
        [
            Vec2::new(100.0, -20.0),
            Vec2::new(100.0, 20.0),
            Vec2::new(71.8, 20.0),
            Vec2::new(71.8, -20.0),
        ]
    }

    #[test]
    fn test_edge_stride_policy() {
        let p = moving_player();
        let trial = Vec2::new(RADIUS, 0.0);
        let radius_sq = RADIUS * RADIUS;

        let curve = CurveWall::from_vertices(outer_edge_rect(), SpeedData::default(), SpeedData::default());
        let custom = CustomWall::new(outer_edge_rect());

        assert!(p.check_wall_collision_escape(&curve, trial, radius_sq).is_none());

        let escape = p
            .check_wall_collision_escape(&custom, trial, radius_sq)
            .expect("custom wall escapes through its outer edge");
        assert!((escape.x - 71.8).abs() < 1e-4);
        assert!((escape.length_squared() - radius_sq).abs() < 0.1);
    }

    #[test]
    fn test_escape_excludes_killing_side() {
        let p = moving_player();
        let trial = Vec2::new(RADIUS, 0.0);
        let mut custom = CustomWall::new(outer_edge_rect());

        // Edge (3,2) is j = 2
        custom.set_killing_side(2);
        assert!(p.check_wall_collision_escape(&custom, trial, RADIUS * RADIUS).is_none());
    }

    #[test]
    fn test_push_curve_escape_or_crush() {
        let radius_sq = RADIUS * RADIUS + 8.0;

        // Wall covering both the last and the current position: crushed
        let mut p = moving_player();
        let covering = CurveWall::from_vertices(
            sector(-1.0, 20.0),
            SpeedData::constant(1.0),
            SpeedData::default(),
        );
        assert!(p.push_curve(1, RADIUS, &covering, Vec2::ZERO, radius_sq, FT));
        assert!(!p.is_dead());

        // Wall the player ran into this tick: pushed back behind its edge
        let mut p = moving_player();
        let ahead = CurveWall::from_vertices(
            sector(1.0, 20.0),
            SpeedData::constant(1.0),
            SpeedData::default(),
        );
        assert!(ahead.is_overlapping(p.position()));
        assert!(!p.push_curve(1, RADIUS, &ahead, Vec2::ZERO, radius_sq, FT));
        assert!(p.angle() > 0.0 && p.angle() < to_rad(1.0));
        assert!(!ahead.is_overlapping(p.position()));
    }

    #[test]
    fn test_still_player_is_nudged_by_spinning_wall() {
        let mut p = player();
        p.update(false, true, FT);
        p.update_input_movement(0.0, 1.0, false, FT);
        p.update_position(RADIUS);

        // Wall rotating counter-clockwise with its leading edge just past 0
        let wall = CurveWall::from_vertices(
            sector(-10.0, 0.1),
            SpeedData::constant(1.0),
            SpeedData::constant(6.0),
        );
        let died = p.push_curve(0, RADIUS, &wall, Vec2::ZERO, RADIUS * RADIUS + 8.0, FT);
        assert!(!died);
        assert!(p.angle() > 0.0);
        assert_eq!(p.position(), Vec2::ZERO.moved_towards(RADIUS, p.angle()));
    }

    #[test]
    fn test_custom_push_accepts_tangential_sweep() {
        let mut p = player();
        p.update_position(RADIUS);

        let mut wall = CustomWall::new(sector(5.0, 15.0));
        wall.update_old_vertex_positions();
        wall.set_vertex_positions(sector(-15.0, -5.0));

        let push = p.custom_wall_push_velocity(&wall, RADIUS * RADIUS + 8.0);
        assert!(push != Vec2::ZERO);
        assert!(push.y < -20.0);
    }

    #[test]
    fn test_custom_push_rejects_radial_sweep() {
        let mut p = player();
        p.update_position(RADIUS);

        // Crossing shift from 50 to -30 degrees: dot with (1, 0) is sin(10°) > 0.15
        let mut wall = CustomWall::new(sector(50.0, 60.0));
        wall.update_old_vertex_positions();
        wall.set_vertex_positions(sector(-30.0, -20.0));

        assert_eq!(p.custom_wall_push_velocity(&wall, RADIUS * RADIUS + 8.0), Vec2::ZERO);
    }

    #[test]
    #[should_panic]
    fn test_zero_radius_fails_fast() {
        player().update_position(0.0);
    }

    #[test]
    #[should_panic(expected = "positive orbit")]
    fn test_push_curve_zero_radius_fails_fast() {
        let mut p = moving_player();
        let wall = CurveWall::from_vertices(sector(1.0, 20.0), SpeedData::default(), SpeedData::default());
        p.push_curve(1, 0.0, &wall, Vec2::ZERO, 0.0, FT);
    }

    #[test]
    #[should_panic(expected = "positive orbit")]
    fn test_push_custom_zero_radius_fails_fast() {
        let mut p = moving_player();
        let wall = CustomWall::new(sector(1.0, 20.0));
        p.push_custom(1, RADIUS, &wall, 0.0, FT);
    }

    #[test]
    fn test_counter_rotating_wall_drags_moving_player() {
        let radius_sq = RADIUS * RADIUS + 8.0;

        // Same sweep direction as the player: no drag, the last position is
        // still inside and the player is crushed
        let mut p = moving_player();
        let with_player = CurveWall::from_vertices(
            sector(-1.0, 20.0),
            SpeedData::default(),
            SpeedData::constant(6.0),
        );
        assert!(p.push_curve(1, RADIUS, &with_player, Vec2::ZERO, radius_sq, FT));

        // Opposite sweep: the trial is dragged 1.43 degrees clockwise, out
        // past the trailing edge at -1 degree
        let mut p = moving_player();
        let against = CurveWall::from_vertices(
            sector(-1.0, 20.0),
            SpeedData::default(),
            SpeedData::constant(-6.0),
        );
        assert!(against.is_overlapping(p.position()));
        assert!(!p.push_curve(1, RADIUS, &against, Vec2::ZERO, radius_sq, FT));
        assert!(p.angle() < to_rad(-1.0) && p.angle() > to_rad(-2.0));
        assert!(!against.is_overlapping(p.position()));
        assert_eq!(p.position(), Vec2::ZERO.moved_towards(RADIUS, p.angle()));
    }

    #[test]
    fn test_forced_move_escapes_instead_of_nudging() {
        let wall = CurveWall::from_vertices(sector(1.0, 20.0), SpeedData::default(), SpeedData::default());
        let radius_sq = RADIUS * RADIUS + 8.0;

        // Teleported into the wall this tick: resolved from the last position
        let mut forced = player();
        forced.update(false, true, FT);
        forced.force_angle(to_rad(2.0));
        forced.update_input_movement(0.0, 1.0, false, FT);
        forced.update_position(RADIUS);
        assert!(wall.is_overlapping(forced.position()));

        assert!(!forced.push_curve(0, RADIUS, &wall, Vec2::ZERO, radius_sq, FT));
        assert!(forced.angle() > 0.0 && forced.angle() < to_rad(1.0));
        assert!(!wall.is_overlapping(forced.position()));

        // Standing at the same angle since last tick: only nudged, still inside
        let mut still = player();
        still.force_angle(to_rad(2.0));
        still.update(false, true, FT);
        still.update_input_movement(0.0, 1.0, false, FT);
        still.update_position(RADIUS);

        assert!(still.push_curve(0, RADIUS, &wall, Vec2::ZERO, radius_sq, FT));
    }

    #[test]
    fn test_custom_push_moving_player_escapes() {
        let mut p = moving_player();
        let wall = CustomWall::new(sector(1.0, 20.0));
        assert!(wall.is_overlapping(p.position()));

        assert!(!p.push_custom(1, RADIUS, &wall, RADIUS * RADIUS + 8.0, FT));
        assert!(p.angle() > 0.0 && p.angle() < to_rad(1.0));
        assert!(!wall.is_overlapping(p.position()));
    }

    #[test]
    fn test_custom_push_still_player_is_swept_along() {
        let mut p = player();
        p.update(false, true, FT);
        p.update_input_movement(0.0, 1.0, false, FT);
        p.update_position(RADIUS);

        // Leading edge swept from 2 to -3 degrees across the player
        let mut wall = CustomWall::new(sector(2.0, 12.0));
        wall.update_old_vertex_positions();
        wall.set_vertex_positions(sector(-3.0, 7.0));
        assert!(wall.is_overlapping(p.position()));

        assert!(!p.push_custom(0, RADIUS, &wall, RADIUS * RADIUS + 8.0, FT));
        assert!(p.angle() < to_rad(-3.0));
        assert!(!wall.is_overlapping(p.position()));
        assert_eq!(p.position(), Vec2::ZERO.moved_towards(RADIUS, p.angle()));
    }

    fn quad() -> impl Strategy<Value = [Vec2; 4]> {
        prop::array::uniform4((-120.0f32..120.0, -120.0f32..120.0))
            .prop_map(|pts| pts.map(|(x, y)| Vec2::new(x, y)))
    }

    /// Every accepted candidate per non-killing edge, in visiting order.
    fn candidates(wall: &CustomWall, trial: Vec2, radius_sq: f32) -> Vec<(usize, Vec2)> {
        let v = wall.vertex_positions();
        (0..4)
            .filter(|&i| (i + 3) % 4 != wall.killing_side())
            .filter_map(|i| {
                line_circle_closest_intersection(trial, v[i], v[(i + 3) % 4], radius_sq).map(|c| (i, c))
            })
            .collect()
    }

    proptest! {
        #[test]
        fn test_escape_is_nearest_candidate(
            vertices in quad(),
            killing_side in 0usize..4,
            angle in -3.0f32..3.0,
        ) {
            let mut p = player();
            p.force_angle(angle);
            p.update_input_movement(1.0, 4.0, false, FT);
            p.update_position(RADIUS);

            let mut wall = CustomWall::new(vertices);
            wall.set_killing_side(killing_side);

            let trial = p.last_position();
            let radius_sq = RADIUS * RADIUS;
            let all = candidates(&wall, trial, radius_sq);

            match p.check_wall_collision_escape(&wall, trial, radius_sq) {
                Some(escape) => {
                    let d = (escape - trial).length_squared();
                    prop_assert!(d < p.max_safe_distance_squared());
                    for (_, c) in &all {
                        prop_assert!(d <= (*c - trial).length_squared());
                    }
                    prop_assert!(all.iter().any(|(_, c)| *c == escape));
                }
                None => {
                    for (_, c) in &all {
                        prop_assert!((*c - trial).length_squared() >= p.max_safe_distance_squared());
                    }
                }
            }
        }

        #[test]
        fn test_killing_side_never_escapes(
            vertices in quad(),
            killing_side in 0usize..4,
        ) {
            let mut p = player();
            p.update_input_movement(1.0, 4.0, false, FT);
            p.update_position(RADIUS);

            let mut wall = CustomWall::new(vertices);
            wall.set_killing_side(killing_side);

            let trial = p.last_position();
            let radius_sq = RADIUS * RADIUS;
            let killing_edge = line_circle_closest_intersection(
                trial,
                vertices[(killing_side + 1) % 4],
                vertices[killing_side],
                radius_sq,
            );

            if let Some(escape) = p.check_wall_collision_escape(&wall, trial, radius_sq) {
                let others = candidates(&wall, trial, radius_sq);
                // Either not on the killing edge, or shared with a legal edge
                prop_assert!(Some(escape) != killing_edge || others.iter().any(|(_, c)| *c == escape));
            }
        }
    }
}

//! Wall Patterns
//!
//! Seeded wall spawning standing in for level scripts. Every
//! `interval_ticks` one pattern is drawn from the RNG by weight:
//!
//! - Barrage: a wall on every side but one random gap
//! - AltBarrage: a wall on every other side, random parity
//! - SpinningBarrage: a barrage whose walls rotate around the center,
//!   random direction, accelerating and swinging back at the speed bound
//! - Sweeper: a rotating radial bar (custom wall) that expires

use serde::{Serialize, Deserialize};
use std::f32::consts::PI;

use crate::core::math::to_rad;
use crate::core::rng::DeterministicRng;
use crate::core::vec2::Vec2;
use crate::game::custom_wall::{CustomWall, CustomWallMotion};
use crate::game::speed::SpeedData;
use crate::game::tick::LevelConfig;
use crate::game::wall::{CurveWall, Wall};

/// Half angular width of a sweeper bar.
const SWEEPER_HALF_WIDTH_DEG: f32 = 2.0;

/// Which pattern was spawned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternKind {
    /// All sides but one
    Barrage,
    /// Every other side
    AltBarrage,
    /// All sides but one, rotating
    SpinningBarrage,
    /// Rotating bar
    Sweeper,
}

/// Pattern spawner configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Spawn patterns at all
    pub enabled: bool,
    /// Ticks between patterns
    pub interval_ticks: u32,
    /// Relative weight of Barrage
    pub barrage_weight: u32,
    /// Relative weight of AltBarrage
    pub alt_barrage_weight: u32,
    /// Relative weight of SpinningBarrage
    pub spinning_barrage_weight: u32,
    /// Relative weight of Sweeper
    pub sweeper_weight: u32,
    /// Initial curve speed of spinning walls
    pub spin_curve_speed: f32,
    /// Curve acceleration per frame of spinning walls
    pub spin_curve_accel: f32,
    /// Curve speed bound of spinning walls; they ping-pong between ± this
    pub spin_curve_max: f32,
    /// Sweeper rotation, curve speed units
    pub sweeper_angular_speed: f32,
    /// Sweeper lifetime in ticks
    pub sweeper_lifetime_ticks: u32,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ticks: 240,
            barrage_weight: 5,
            alt_barrage_weight: 3,
            spinning_barrage_weight: 2,
            sweeper_weight: 2,
            spin_curve_speed: 1.0,
            spin_curve_accel: 0.01,
            spin_curve_max: 2.5,
            sweeper_angular_speed: 3.0,
            sweeper_lifetime_ticks: 1200,
        }
    }
}

impl PatternConfig {
    /// Spawner that never spawns.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    fn total_weight(&self) -> u32 {
        self.barrage_weight + self.alt_barrage_weight + self.spinning_barrage_weight + self.sweeper_weight
    }
}

/// Countdown to the next pattern.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternSpawner {
    ticks_until_next: u32,
    spawned: u32,
}

impl PatternSpawner {
    /// First pattern spawns on the first tick.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of patterns spawned so far.
    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    /// Advance one tick, spawning into `walls` when due.
    ///
    /// `player_angle` keeps sweepers from appearing on top of the player.
    pub fn update(
        &mut self,
        rng: &mut DeterministicRng,
        config: &LevelConfig,
        player_angle: f32,
        walls: &mut Vec<Wall>,
    ) -> Option<(PatternKind, usize)> {
        let pattern = &config.pattern;
        if !pattern.enabled || pattern.total_weight() == 0 {
            return None;
        }

        if self.ticks_until_next > 0 {
            self.ticks_until_next -= 1;
            return None;
        }
        self.ticks_until_next = pattern.interval_ticks.saturating_sub(1);

        let kind = Self::pick(rng, pattern);
        let before = walls.len();
        match kind {
            PatternKind::Barrage => spawn_barrage(rng, config, walls),
            PatternKind::AltBarrage => spawn_alt_barrage(rng, config, walls),
            PatternKind::SpinningBarrage => spawn_spinning_barrage(rng, config, walls),
            PatternKind::Sweeper => spawn_sweeper(rng, config, player_angle, walls),
        }

        self.spawned += 1;
        Some((kind, walls.len() - before))
    }

    fn pick(rng: &mut DeterministicRng, pattern: &PatternConfig) -> PatternKind {
        let mut roll = rng.next_int(pattern.total_weight());
        let weighted = [
            (PatternKind::Barrage, pattern.barrage_weight),
            (PatternKind::AltBarrage, pattern.alt_barrage_weight),
            (PatternKind::SpinningBarrage, pattern.spinning_barrage_weight),
        ];

        for (kind, weight) in weighted {
            if roll < weight {
                return kind;
            }
            roll -= weight;
        }
        PatternKind::Sweeper
    }
}

fn side_wall(config: &LevelConfig, side: u32, curve: SpeedData) -> Wall {
    CurveWall::new(
        Vec2::ZERO,
        config.sides,
        side,
        config.wall_thickness,
        config.wall_spawn_distance,
        SpeedData::constant(config.wall_speed),
        curve,
    )
    .into()
}

fn spawn_barrage(rng: &mut DeterministicRng, config: &LevelConfig, walls: &mut Vec<Wall>) {
    let gap = rng.next_int(config.sides);
    walls.extend(
        (0..config.sides)
            .filter(|&side| side != gap)
            .map(|side| side_wall(config, side, SpeedData::default())),
    );
}

fn spawn_alt_barrage(rng: &mut DeterministicRng, config: &LevelConfig, walls: &mut Vec<Wall>) {
    let parity = rng.next_int(2);
    walls.extend(
        (0..config.sides)
            .filter(|&side| side % 2 == parity)
            .map(|side| side_wall(config, side, SpeedData::default())),
    );
}

fn spawn_spinning_barrage(rng: &mut DeterministicRng, config: &LevelConfig, walls: &mut Vec<Wall>) {
    let pattern = &config.pattern;
    let gap = rng.next_int(config.sides);
    let direction = if rng.next_bool(0.5) { 1.0 } else { -1.0 };

    // All walls share one curve so the barrage turns as a block
    let curve = SpeedData::accelerating(
        pattern.spin_curve_speed * direction,
        pattern.spin_curve_accel * direction,
        -pattern.spin_curve_max,
        pattern.spin_curve_max,
        true,
    );
    walls.extend(
        (0..config.sides)
            .filter(|&side| side != gap)
            .map(|side| side_wall(config, side, curve)),
    );
}

fn spawn_sweeper(
    rng: &mut DeterministicRng,
    config: &LevelConfig,
    player_angle: f32,
    walls: &mut Vec<Wall>,
) {
    let pattern = &config.pattern;
    let angle = player_angle + PI + rng.next_f32_range(-1.0, 1.0);
    let direction = if rng.next_bool(0.5) { 1.0 } else { -1.0 };
    let half_width = to_rad(SWEEPER_HALF_WIDTH_DEG);

    let inner = config.radius * 0.5;
    let outer = config.radius * 2.5;
    let at = |distance: f32, a: f32| Vec2::ZERO.moved_towards(distance, a);

    let bar = CustomWall::new([
        at(inner, angle - half_width),
        at(inner, angle + half_width),
        at(outer, angle + half_width),
        at(outer, angle - half_width),
    ])
    .with_motion(CustomWallMotion {
        angular_speed: pattern.sweeper_angular_speed * direction,
        radial_speed: 0.0,
    })
    .with_lifetime(pattern.sweeper_lifetime_ticks);

    walls.push(bar.into());
}

// =============================================================================
// TESTS
// =============================================================================

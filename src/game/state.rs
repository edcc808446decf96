//! Level State
//!
//! Everything one run of a level mutates: the player, the live walls, the
//! pattern spawner and its RNG. Hashable for replay checkpoints.

use serde::{Serialize, Deserialize};

use crate::core::hash::{StateHash, StateHasher, compute_state_hash};
use crate::core::rng::DeterministicRng;
use crate::core::vec2::Vec2;
use crate::game::events::GameEvent;
use crate::game::pattern::PatternSpawner;
use crate::game::player::Player;
use crate::game::tick::LevelConfig;
use crate::game::wall::{CurveWall, CustomWall, Wall, WallGeometry};

/// Whether the run is still going.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Default)]
pub enum RunStatus {
    /// Player alive, ticks advance
    #[default]
    Running,
    /// Player crushed, ticks are no-ops
    Dead,
}

/// Complete state of a level run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LevelState {
    /// Ticks executed so far
    pub tick: u32,

    /// RNG seed (for verification)
    pub seed: u64,

    /// Run status
    pub status: RunStatus,

    /// Tick on which the player died
    pub death_tick: Option<u32>,

    /// Deterministic RNG state
    pub rng: DeterministicRng,

    /// The player
    pub player: Player,

    /// Live walls in spawn order
    pub walls: Vec<Wall>,

    /// Seeded wall spawner
    pub spawner: PatternSpawner,

    /// Events generated this tick (cleared each tick)
    #[serde(skip)]
    pending_events: Vec<GameEvent>,
}

impl LevelState {
    /// Fresh run of `config` with `seed`. The player sits at angle 0.
    pub fn new(config: &LevelConfig, seed: u64) -> Self {
        let mut player = Player::new(
            Vec2::ZERO,
            config.swap_cooldown,
            config.player_size,
            config.player_speed,
            config.player_focus_speed,
        );
        player.update_position(config.radius);

        Self {
            tick: 0,
            seed,
            status: RunStatus::Running,
            death_tick: None,
            rng: DeterministicRng::new(seed),
            player,
            walls: Vec::new(),
            spawner: PatternSpawner::new(),
            pending_events: Vec::new(),
        }
    }

    /// Level center; walls close in on it.
    pub fn center(&self) -> Vec2 {
        Vec2::ZERO
    }

    /// Add a curve wall.
    pub fn add_curve_wall(&mut self, wall: CurveWall) {
        self.walls.push(Wall::Curve(wall));
    }

    /// Add a custom wall.
    pub fn add_custom_wall(&mut self, wall: CustomWall) {
        self.walls.push(Wall::Custom(wall));
    }

    /// Has the run ended?
    pub fn is_dead(&self) -> bool {
        self.status == RunStatus::Dead
    }

    /// Mark the run dead at the current tick.
    pub fn end_run(&mut self) {
        self.status = RunStatus::Dead;
        self.death_tick = Some(self.tick);
    }

    /// Compute hash of current state for verification.
    ///
    /// Covers every float by bit pattern, so two states hash equal only if
    /// they are bit-identical.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, self.seed, |hasher| {
            hasher.update_u8(self.status as u8);
            hasher.update_u32(self.death_tick.unwrap_or(u32::MAX));

            let [s0, s1] = self.rng.state();
            hasher.update_u64(s0);
            hasher.update_u64(s1);

            hash_player(&self.player, hasher);

            hasher.update_u32(self.walls.len() as u32);
            for wall in &self.walls {
                hasher.update_bool(wall.is_custom_wall());
                for v in wall.vertex_positions() {
                    hasher.update_vec2(*v);
                }
            }
        })
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a game event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }
}

fn hash_player(player: &Player, hasher: &mut StateHasher) {
    hasher.update_vec2(player.position());
    hasher.update_vec2(player.last_position());
    hasher.update_f32(player.angle());
    hasher.update_f32(player.last_angle());
    hasher.update_bool(player.is_dead());
}

// =============================================================================
// TESTS
// =============================================================================

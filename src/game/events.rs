//! Game Events
//!
//! Events generated during simulation for logging and replay inspection.

use serde::{Serialize, Deserialize};

use crate::game::pattern::PatternKind;

/// Priority for event processing order.
///
/// Lower value = processed first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventPriority {
    /// Death ends the run, so it comes first
    PlayerDeath = 0,
    /// Then player actions
    PlayerAction = 1,
    /// Then spawns
    WallSpawn = 2,
    /// Lowest priority
    Other = 255,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Player was crushed
    PlayerDied {
        /// Facing angle at death
        angle: f32,
        /// Index of the wall that killed the player
        wall_index: u32,
        /// Deadly custom wall, no push was attempted
        deadly: bool,
    },

    /// Player turned around
    PlayerSwapped {
        /// Facing angle after the swap
        angle: f32,
    },

    /// A pattern added walls
    PatternSpawned {
        /// Which pattern
        kind: PatternKind,
        /// Number of walls added
        walls: u32,
    },
}

/// A game event with timing and priority.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Processing priority
    pub priority: EventPriority,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u32, priority: EventPriority, data: GameEventData) -> Self {
        Self { tick, priority, data }
    }

    /// Create player died event.
    pub fn player_died(tick: u32, angle: f32, wall_index: usize, deadly: bool) -> Self {
        Self::new(
            tick,
            EventPriority::PlayerDeath,
            GameEventData::PlayerDied {
                angle,
                wall_index: wall_index as u32,
                deadly,
            },
        )
    }

    /// Create player swapped event.
    pub fn player_swapped(tick: u32, angle: f32) -> Self {
        Self::new(tick, EventPriority::PlayerAction, GameEventData::PlayerSwapped { angle })
    }

    /// Create pattern spawned event.
    pub fn pattern_spawned(tick: u32, kind: PatternKind, walls: usize) -> Self {
        Self::new(
            tick,
            EventPriority::WallSpawn,
            GameEventData::PatternSpawned {
                kind,
                walls: walls as u32,
            },
        )
    }

    /// Is this a death?
    pub fn is_death(&self) -> bool {
        matches!(self.data, GameEventData::PlayerDied { .. })
    }
}

impl PartialEq for GameEvent {
    fn eq(&self, other: &Self) -> bool {
        self.tick == other.tick && self.priority == other.priority
    }
}

impl Eq for GameEvent {}

impl PartialOrd for GameEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GameEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: tick, then priority
        self.tick
            .cmp(&other.tick)
            .then(self.priority.cmp(&other.priority))
    }
}

//! Game Logic Module
//!
//! All level simulation code. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `speed`, `ticker`: Per-frame speed and timer primitives
//! - `wall`: Curve walls and the shared wall geometry trait
//! - `custom_wall`: Free-form quad walls
//! - `player`: Orbit movement, swap, and the push/escape solver
//! - `pattern`: Seeded wall spawning
//! - `input`: Input frames and delta-compressed recording
//! - `state`: Level state and hashing
//! - `tick`: Authoritative simulation loop
//! - `events`: Game events for replay/verification

pub mod speed;
pub mod ticker;
pub mod wall;
pub mod custom_wall;
pub mod player;
pub mod pattern;
pub mod input;
pub mod state;
pub mod tick;
pub mod events;

// Re-export key types
pub use wall::{CurveWall, CustomWall, CustomWallMotion, Wall, WallGeometry};
pub use player::Player;
pub use pattern::{PatternConfig, PatternKind, PatternSpawner};
pub use input::{InputFrame, InputDelta, InputRecord};
pub use state::{LevelState, RunStatus};
pub use tick::{LevelConfig, TickResult};
pub use events::GameEvent;

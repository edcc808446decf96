//! # Hexagon Core
//!
//! Deterministic collision and replay core for a polygon-orbit avoidance
//! game: a player triangle orbits the center while walls close in.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      HEXAGON CORE                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── math.rs     - Polynomial trig, angle helpers            │
//! │  ├── vec2.rs     - 2D f32 vector                             │
//! │  ├── geometry.rs - Line/circle and point/polygon tests       │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Level logic (deterministic)               │
//! │  ├── wall.rs     - Curve walls, wall geometry trait          │
//! │  ├── player.rs   - Movement, swap, push/escape solver        │
//! │  ├── pattern.rs  - Seeded wall spawning                      │
//! │  ├── state.rs    - Level state                               │
//! │  └── tick.rs     - Authoritative simulation loop             │
//! │                                                              │
//! │  replay/         - Recording and verification                │
//! │  ├── transcript.rs - Replay files                            │
//! │  └── verify.rs   - Verification by re-execution              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are **100% deterministic**:
//! - Floats only see IEEE-exact operations and `sqrt`; trig is polynomial
//! - Walls are iterated in spawn order
//! - No system time dependencies
//! - All randomness from seeded Xorshift128+
//!
//! Given identical inputs and RNG seed, a run produces identical state
//! hashes on every run of the same build.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod replay;

// Re-export commonly used types
pub use core::vec2::Vec2;
pub use core::rng::DeterministicRng;
pub use game::input::{InputFrame, InputRecord};
pub use game::state::LevelState;
pub use game::tick::LevelConfig;
pub use replay::{ReplayFile, verify_replay};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 240;

/// Time per tick in 60 Hz frames (60 / [`TICK_RATE`])
pub const FRAME_TIME: f32 = 0.25;

//! Replay System
//!
//! Records level attempts and verifies them by deterministic re-execution.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    REPLAY SYSTEM                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  transcript.rs   - Replay file, checkpoints, recording      │
//! │  verify.rs       - Verification by re-execution             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod transcript;
pub mod verify;

// Re-export key types
pub use transcript::{
    record_run, ReplayError, ReplayFile, RunResult, StateCheckpoint,
    CHECKPOINT_INTERVAL, REPLAY_VERSION,
};
pub use verify::{verify_replay, verify_replay_bytes, VerificationError, VerificationReport};

//! Replay Files
//!
//! Everything needed to re-run a level attempt bit-exactly: seed, level
//! configuration, the delta-compressed input stream, periodic state hashes
//! and the outcome.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::hash::StateHash;
use crate::game::input::{InputFrame, InputRecord};
use crate::game::state::LevelState;
use crate::game::tick::{tick, LevelConfig};
use crate::replay::verify::VerificationError;
use crate::TICK_RATE;

/// Current replay format version.
pub const REPLAY_VERSION: u8 = 1;

/// Checkpoint interval in ticks (every second).
pub const CHECKPOINT_INTERVAL: u32 = TICK_RATE;

/// A recorded level attempt.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReplayFile {
    /// Version for forward compatibility.
    pub version: u8,

    /// RNG seed of the run.
    pub seed: u64,

    /// Level the run was played on.
    pub config: LevelConfig,

    /// Per-tick input, only changes stored.
    pub inputs: InputRecord,

    /// State hash checkpoints (every [`CHECKPOINT_INTERVAL`] ticks).
    pub checkpoints: Vec<StateCheckpoint>,

    /// Outcome, set once the run ends.
    pub result: Option<RunResult>,
}

/// State checkpoint for partial verification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCheckpoint {
    /// Ticks executed when the hash was taken.
    pub tick: u32,

    /// State hash at this tick.
    pub state_hash: StateHash,

    /// RNG state at this tick.
    pub rng_state: [u64; 2],
}

/// Final outcome of a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    /// Ticks executed.
    pub ticks: u32,

    /// Tick the player died on, if it did.
    pub death_tick: Option<u32>,

    /// Hash of the final state.
    pub final_state_hash: StateHash,

    /// Hash of the input record.
    pub input_hash: StateHash,
}

/// Errors reading or checking a replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Encoding or decoding failed.
    #[error("replay serialization failed: {0}")]
    Serialization(#[from] bincode::Error),

    /// Written by an incompatible version.
    #[error("replay version mismatch: expected {expected}, got {got}")]
    VersionMismatch {
        /// Supported version.
        expected: u8,
        /// Version in the file.
        got: u8,
    },

    /// The run never finished.
    #[error("replay has no result")]
    Incomplete,

    /// Re-execution disagreed with the recording.
    #[error("replay verification failed: {0}")]
    Verification(#[from] VerificationError),
}

impl ReplayFile {
    /// Empty replay for a run of `config` with `seed`.
    pub fn new(seed: u64, config: LevelConfig) -> Self {
        Self {
            version: REPLAY_VERSION,
            seed,
            config,
            inputs: InputRecord::new(),
            checkpoints: Vec::new(),
            result: None,
        }
    }

    /// Add a checkpoint.
    pub fn add_checkpoint(&mut self, tick: u32, state_hash: StateHash, rng_state: [u64; 2]) {
        self.checkpoints.push(StateCheckpoint {
            tick,
            state_hash,
            rng_state,
        });
    }

    /// Record the outcome.
    pub fn finalize(&mut self, result: RunResult) {
        self.result = Some(result);
    }

    /// Has the outcome been recorded?
    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    /// Serialize to bytes using bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ReplayError> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize from bytes, rejecting other format versions.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ReplayError> {
        let replay: Self = bincode::deserialize(data)?;
        if replay.version != REPLAY_VERSION {
            return Err(ReplayError::VersionMismatch {
                expected: REPLAY_VERSION,
                got: replay.version,
            });
        }
        Ok(replay)
    }

    /// Run length in seconds.
    pub fn duration_seconds(&self) -> f32 {
        self.result
            .as_ref()
            .map(|r| r.ticks as f32 / TICK_RATE as f32)
            .unwrap_or(0.0)
    }
}

/// Play a level from scratch, recording every input.
///
/// Stops when the player dies or after `max_ticks` ticks.
pub fn record_run<F>(config: &LevelConfig, seed: u64, mut input_fn: F, max_ticks: u32) -> ReplayFile
where
    F: FnMut(u32, &LevelState) -> InputFrame,
{
    let mut state = LevelState::new(config, seed);
    let mut replay = ReplayFile::new(seed, config.clone());

    while state.tick < max_ticks && !state.is_dead() {
        let input = input_fn(state.tick, &state);
        replay.inputs.record(state.tick, input);
        tick(&mut state, &input, config);

        if state.tick % CHECKPOINT_INTERVAL == 0 {
            replay.add_checkpoint(state.tick, state.compute_hash(), state.rng.state());
        }
    }

    replay.inputs.finalize(state.tick.saturating_sub(1));

    let result = RunResult {
        ticks: state.tick,
        death_tick: state.death_tick,
        final_state_hash: state.compute_hash(),
        input_hash: replay.inputs.hash(),
    };
    replay.finalize(result);
    replay
}

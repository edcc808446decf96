//! Verification API
//!
//! Verify a replay by re-executing its inputs and comparing every recorded
//! hash. A replay is valid only if the re-run is bit-identical.

use thiserror::Error;
use tracing::debug;

use crate::core::hash::StateHash;
use crate::game::state::LevelState;
use crate::game::tick::tick;
use crate::replay::transcript::{ReplayError, ReplayFile, REPLAY_VERSION};

/// Summary of a successful verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationReport {
    /// Ticks re-executed.
    pub ticks: u32,
    /// Death tick reproduced by the re-run.
    pub death_tick: Option<u32>,
    /// Final state hash of the re-run.
    pub final_hash: StateHash,
    /// Number of checkpoints that matched.
    pub checkpoints_verified: usize,
}

/// Ways a re-run can disagree with its recording.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// The input record does not match its recorded hash.
    #[error("input record hash mismatch")]
    InputHashMismatch,

    /// Checkpoint hash mismatch.
    #[error("checkpoint mismatch at tick {tick}: expected {}, computed {}", hex::encode(.expected), hex::encode(.computed))]
    CheckpointMismatch {
        /// Tick of the checkpoint.
        tick: u32,
        /// Recorded hash.
        expected: StateHash,
        /// Re-run hash.
        computed: StateHash,
    },

    /// The re-run ended before a recorded checkpoint.
    #[error("checkpoint at tick {tick} was never reached")]
    MissingCheckpoint {
        /// Tick of the checkpoint.
        tick: u32,
    },

    /// Different run length.
    #[error("tick count mismatch: expected {expected}, computed {computed}")]
    TickCountMismatch {
        /// Recorded length.
        expected: u32,
        /// Re-run length.
        computed: u32,
    },

    /// The player died on a different tick, or not at all.
    #[error("death tick mismatch: expected {expected:?}, computed {computed:?}")]
    DeathTickMismatch {
        /// Recorded death tick.
        expected: Option<u32>,
        /// Re-run death tick.
        computed: Option<u32>,
    },

    /// Final state hash mismatch.
    #[error("final state hash mismatch: expected {}, computed {}", hex::encode(.expected), hex::encode(.computed))]
    FinalStateMismatch {
        /// Recorded hash.
        expected: StateHash,
        /// Re-run hash.
        computed: StateHash,
    },
}

/// Verify a replay by full re-execution.
pub fn verify_replay(replay: &ReplayFile) -> Result<VerificationReport, ReplayError> {
    if replay.version != REPLAY_VERSION {
        return Err(ReplayError::VersionMismatch {
            expected: REPLAY_VERSION,
            got: replay.version,
        });
    }

    let result = replay.result.as_ref().ok_or(ReplayError::Incomplete)?;

    if replay.inputs.hash() != result.input_hash {
        return Err(VerificationError::InputHashMismatch.into());
    }

    let config = &replay.config;
    let mut state = LevelState::new(config, replay.seed);
    let mut checkpoints = replay.checkpoints.iter().peekable();
    let mut checkpoints_verified = 0;

    for (_, frame) in replay.inputs.replay_iter().take(result.ticks as usize) {
        if state.is_dead() {
            break;
        }

        tick(&mut state, &frame, config);

        if let Some(checkpoint) = checkpoints.next_if(|cp| cp.tick == state.tick) {
            let computed = state.compute_hash();
            if computed != checkpoint.state_hash {
                debug!(tick = checkpoint.tick, "checkpoint mismatch");
                return Err(VerificationError::CheckpointMismatch {
                    tick: checkpoint.tick,
                    expected: checkpoint.state_hash,
                    computed,
                }
                .into());
            }
            checkpoints_verified += 1;
        }
    }

    if let Some(missing) = checkpoints.next() {
        debug!(tick = missing.tick, reached = state.tick, "checkpoint never reached");
        return Err(VerificationError::MissingCheckpoint { tick: missing.tick }.into());
    }

    if state.tick != result.ticks {
        return Err(VerificationError::TickCountMismatch {
            expected: result.ticks,
            computed: state.tick,
        }
        .into());
    }

    if state.death_tick != result.death_tick {
        debug!(expected = ?result.death_tick, computed = ?state.death_tick, "death tick mismatch");
        return Err(VerificationError::DeathTickMismatch {
            expected: result.death_tick,
            computed: state.death_tick,
        }
        .into());
    }

    let final_hash = state.compute_hash();
    if final_hash != result.final_state_hash {
        return Err(VerificationError::FinalStateMismatch {
            expected: result.final_state_hash,
            computed: final_hash,
        }
        .into());
    }

    Ok(VerificationReport {
        ticks: state.tick,
        death_tick: state.death_tick,
        final_hash,
        checkpoints_verified,
    })
}

/// Decode and verify a serialized replay.
pub fn verify_replay_bytes(data: &[u8]) -> Result<VerificationReport, ReplayError> {
    let replay = ReplayFile::from_bytes(data)?;
    verify_replay(&replay)
}

// =============================================================================
// TESTS
// =============================================================================

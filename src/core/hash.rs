//! State Hashing
//!
//! SHA-256 commitments over simulation values, used for replay checkpoints
//! and input records. Floats go in by bit pattern: two states hash equal only
//! if every coordinate is bit-identical, with no epsilon.

use sha2::{Sha256, Digest};
use super::vec2::Vec2;

/// 256-bit digest.
pub type StateHash = [u8; 32];

const LEVEL_STATE_DOMAIN: &[u8] = b"HEXAGON_CORE_STATE_V1";
const INPUT_RECORD_DOMAIN: &[u8] = b"HEXAGON_CORE_INPUTS_V1";

/// Incremental hasher. Values are fed little-endian; the order of calls is
/// part of the commitment.
pub struct StateHasher {
    inner: Sha256,
}

impl StateHasher {
    /// Hasher prefixed with a domain tag, so digests of different record
    /// kinds never collide.
    pub fn new(domain: &[u8]) -> Self {
        Self {
            inner: Sha256::new_with_prefix(domain),
        }
    }

    /// Domain for [`LevelState`](crate::game::state::LevelState) hashes.
    pub fn for_level_state() -> Self {
        Self::new(LEVEL_STATE_DOMAIN)
    }

    /// Domain for [`InputRecord`](crate::game::input::InputRecord) hashes.
    pub fn for_input_record() -> Self {
        Self::new(INPUT_RECORD_DOMAIN)
    }

    /// Feed one byte.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.inner.update([value]);
    }

    /// Feed a `u32`.
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.inner.update(value.to_le_bytes());
    }

    /// Feed a `u64`.
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.inner.update(value.to_le_bytes());
    }

    /// Feed the bit pattern of an `f32`. `0.0` and `-0.0` differ.
    #[inline]
    pub fn update_f32(&mut self, value: f32) {
        self.update_u32(value.to_bits());
    }

    /// Feed both components of a vector, x first.
    #[inline]
    pub fn update_vec2(&mut self, value: Vec2) {
        let (x, y) = value.to_bits();
        self.update_u32(x);
        self.update_u32(y);
    }

    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(u8::from(value));
    }

    /// Consume the hasher.
    pub fn finalize(self) -> StateHash {
        self.inner.finalize().into()
    }
}

/// Level state digest: tick and seed first, then whatever `add_state` feeds.
pub fn compute_state_hash<F>(tick: u32, seed: u64, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_level_state();
    hasher.update_u32(tick);
    hasher.update_u64(seed);
    add_state(&mut hasher);
    hasher.finalize()
}

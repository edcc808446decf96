//! Seeded Random Numbers
//!
//! Xorshift128+ seeded through SplitMix64. The wall spawner is the only
//! consumer inside the tick; the collision code never draws.
//!
//! Every draw is integer arithmetic, and float draws are built from 24
//! random bits so the conversion to `f32` is exact. A seed therefore maps to
//! the same wall sequence on every platform.

use serde::{Serialize, Deserialize};

/// Xorshift128+ generator.
///
/// # Example
///
/// ```
/// use hexagon_core::core::rng::DeterministicRng;
///
/// let mut a = DeterministicRng::new(12345);
/// let mut b = DeterministicRng::new(12345);
/// assert_eq!(a.next_u64(), b.next_u64());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeterministicRng {
    state: [u64; 2],
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl DeterministicRng {
    /// Seed the generator. Any seed, including 0, is valid.
    pub fn new(seed: u64) -> Self {
        let mut s = seed;
        let state = [splitmix64(&mut s), splitmix64(&mut s)];

        // All-zero state is a fixed point of xorshift
        if state == [0, 0] {
            return Self { state: [1, 1] };
        }
        Self { state }
    }

    /// Next raw 64-bit draw.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let [s0, mut s1] = self.state;
        let out = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state = [s0.rotate_left(24) ^ s1 ^ (s1 << 16), s1.rotate_left(37)];

        out
    }

    /// Uniform integer in `[0, bound)`. A zero bound yields 0.
    #[inline]
    pub fn next_int(&mut self, bound: u32) -> u32 {
        match bound {
            0 => 0,
            _ => (self.next_u64() % u64::from(bound)) as u32,
        }
    }

    /// Uniform `f32` in `[0, 1)` from the top 24 bits.
    #[inline]
    pub fn next_unit_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 * (1.0 / 16_777_216.0)
    }

    /// Uniform `f32` in `[min, max)`. An empty range yields `min`.
    #[inline]
    pub fn next_f32_range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        min + (max - min) * self.next_unit_f32()
    }

    /// True with the given probability.
    #[inline]
    pub fn next_bool(&mut self, probability: f32) -> bool {
        self.next_unit_f32() < probability
    }

    /// Internal state, stored in replay checkpoints.
    pub fn state(&self) -> [u64; 2] {
        self.state
    }

    /// Resume from a checkpointed state.
    pub fn set_state(&mut self, state: [u64; 2]) {
        self.state = state;
    }
}

#[inline]
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

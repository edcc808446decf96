//! Per-Tick Input
//!
//! The input stream that drives the simulation: a rotation direction plus
//! focus and swap buttons, recorded only when it changes.

use serde::{Serialize, Deserialize};

use crate::core::hash::{StateHash, StateHasher};

// =============================================================================
// INPUT FRAME
// =============================================================================

/// Input state for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputFrame {
    /// Rotation direction: -1 clockwise, 0 still, 1 counter-clockwise.
    /// Other values are clamped.
    pub movement: i8,

    /// Button flags (packed bits):
    /// - Bit 0: focus held
    /// - Bit 1: swap pressed
    /// - Bit 2-7: Reserved
    pub flags: u8,
}

impl InputFrame {
    /// Focus flag bit
    pub const FLAG_FOCUS: u8 = 0x01;

    /// Swap flag bit
    pub const FLAG_SWAP: u8 = 0x02;

    /// Idle frame.
    pub const fn new() -> Self {
        Self { movement: 0, flags: 0 }
    }

    /// Frame rotating in `movement` direction.
    pub const fn with_movement(movement: i8) -> Self {
        Self { movement, flags: 0 }
    }

    /// Builder: hold focus.
    pub const fn focused(mut self) -> Self {
        self.flags |= Self::FLAG_FOCUS;
        self
    }

    /// Builder: press swap.
    pub const fn swapping(mut self) -> Self {
        self.flags |= Self::FLAG_SWAP;
        self
    }

    /// Direction clamped to {-1, 0, 1}.
    #[inline]
    pub fn direction(&self) -> i32 {
        self.movement.signum() as i32
    }

    /// Direction as a multiplier for the angle integration.
    #[inline]
    pub fn movement(&self) -> f32 {
        self.direction() as f32
    }

    /// Check if focus is held.
    #[inline]
    pub fn focus_held(&self) -> bool {
        self.flags & Self::FLAG_FOCUS != 0
    }

    /// Check if swap is pressed.
    #[inline]
    pub fn swap_pressed(&self) -> bool {
        self.flags & Self::FLAG_SWAP != 0
    }

    /// Set focus flag.
    #[inline]
    pub fn set_focus(&mut self, held: bool) {
        if held {
            self.flags |= Self::FLAG_FOCUS;
        } else {
            self.flags &= !Self::FLAG_FOCUS;
        }
    }

    /// Set swap flag.
    #[inline]
    pub fn set_swap(&mut self, pressed: bool) {
        if pressed {
            self.flags |= Self::FLAG_SWAP;
        } else {
            self.flags &= !Self::FLAG_SWAP;
        }
    }

    /// No movement and no buttons.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.movement == 0 && self.flags == 0
    }
}

/// A change in the input stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDelta {
    /// Tick when this input state began
    pub tick: u32,
    /// The new input state
    pub frame: InputFrame,
}

impl InputDelta {
    /// Create new delta entry.
    pub fn new(tick: u32, frame: InputFrame) -> Self {
        Self { tick, frame }
    }
}

// =============================================================================
// INPUT RECORD
// =============================================================================

/// Delta-compressed input stream of one run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    /// Last tick covered by the record
    pub end_tick: u32,

    /// Only ticks where the input changed.
    deltas: Vec<InputDelta>,

    /// Last recorded input (for delta comparison)
    #[serde(skip)]
    last_frame: InputFrame,
}

impl InputRecord {
    /// Empty record.
    pub fn new() -> Self {
        Self {
            end_tick: 0,
            deltas: Vec::with_capacity(256),
            last_frame: InputFrame::new(),
        }
    }

    /// Record input for a tick. Only stored if it changed.
    ///
    /// # Panics
    ///
    /// Panics if `tick` goes backwards.
    pub fn record(&mut self, tick: u32, frame: InputFrame) {
        if let Some(last) = self.deltas.last() {
            assert!(tick >= last.tick, "input recorded out of order: {} after {}", tick, last.tick);
        }

        self.end_tick = tick;

        if frame != self.last_frame {
            self.deltas.push(InputDelta::new(tick, frame));
            self.last_frame = frame;
        }
    }

    /// Input in effect at `tick`.
    pub fn get_input_at(&self, tick: u32) -> InputFrame {
        let idx = self.deltas.partition_point(|d| d.tick <= tick);

        if idx == 0 {
            InputFrame::new()
        } else {
            self.deltas[idx - 1].frame
        }
    }

    /// Stored changes.
    pub fn deltas(&self) -> &[InputDelta] {
        &self.deltas
    }

    /// Number of stored changes.
    pub fn delta_count(&self) -> usize {
        self.deltas.len()
    }

    /// Extend the covered range without new input.
    pub fn finalize(&mut self, end_tick: u32) {
        self.end_tick = end_tick;
    }

    /// Commitment over every stored change.
    pub fn hash(&self) -> StateHash {
        let mut hasher = StateHasher::for_input_record();
        hasher.update_u32(self.end_tick);
        hasher.update_u32(self.deltas.len() as u32);
        for delta in &self.deltas {
            hasher.update_u32(delta.tick);
            hasher.update_u8(delta.frame.movement as u8);
            hasher.update_u8(delta.frame.flags);
        }
        hasher.finalize()
    }

    /// Tick-by-tick iterator from 0 to `end_tick`.
    pub fn replay_iter(&self) -> ReplayIterator<'_> {
        ReplayIterator {
            record: self,
            current_tick: 0,
            delta_idx: 0,
            current_frame: InputFrame::new(),
        }
    }
}

/// Iterator for replaying inputs tick-by-tick.
pub struct ReplayIterator<'a> {
    record: &'a InputRecord,
    current_tick: u32,
    delta_idx: usize,
    current_frame: InputFrame,
}

impl<'a> Iterator for ReplayIterator<'a> {
    type Item = (u32, InputFrame);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_tick > self.record.end_tick {
            return None;
        }

        while let Some(delta) = self.record.deltas.get(self.delta_idx) {
            if delta.tick > self.current_tick {
                break;
            }
            self.current_frame = delta.frame;
            self.delta_idx += 1;
        }

        let result = (self.current_tick, self.current_frame);
        self.current_tick += 1;
        Some(result)
    }
}

// =============================================================================
// TESTS
// =============================================================================

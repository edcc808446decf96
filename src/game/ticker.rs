//! Frame-Time Ticker
//!
//! Accumulates frame time toward a target and fires when it is reached.
//! Drives the player's swap cooldown.

use serde::{Serialize, Deserialize};

/// Accumulating countdown timer measured in frames.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    target: f32,
    current: f32,
    total: f32,
    running: bool,
    looping: bool,
    ticks: u32,
}

impl Ticker {
    /// Create a ticker that fires after `target` frames.
    pub fn new(target: f32, running: bool) -> Self {
        Self {
            target,
            current: 0.0,
            total: 0.0,
            running,
            looping: true,
            ticks: 0,
        }
    }

    /// Advance by `ft` frames. Returns true when the target is reached.
    ///
    /// A paused ticker accumulates nothing.
    pub fn update(&mut self, ft: f32) -> bool {
        let increment = if self.running { ft } else { 0.0 };

        self.current += increment;
        self.total += increment;

        if self.current < self.target {
            return false;
        }

        self.ticks += 1;
        self.current = 0.0;
        self.running = self.looping;
        true
    }

    /// Pause and clear the current accumulation.
    pub fn stop(&mut self) {
        self.current = 0.0;
        self.running = false;
    }

    /// Restart with a new target.
    pub fn restart(&mut self, target: f32) {
        self.target = target;
        self.current = 0.0;
        self.running = true;
    }

    /// Set whether the ticker keeps running after it fires.
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Is the ticker accumulating?
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames accumulated toward the current target.
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Frames accumulated since creation.
    pub fn total(&self) -> f32 {
        self.total
    }

    /// Number of times the ticker fired.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_fires_at_target() {
        let mut t = Ticker::new(1.0, true);
        assert!(!t.update(0.25));
        assert!(!t.update(0.25));
        assert!(!t.update(0.25));
        assert!(t.update(0.25));
        assert_eq!(t.ticks(), 1);
        assert_eq!(t.current(), 0.0);
        assert_eq!(t.total(), 1.0);
    }

    #[test]
    fn test_stopped_ticker_does_not_accumulate() {
        let mut t = Ticker::new(1.0, true);
        t.update(0.5);
        t.stop();
        assert!(!t.is_running());
        for _ in 0..10 {
            assert!(!t.update(0.5));
        }
        t.restart(0.5);
        assert!(t.update(0.5));
    }

    #[test]
    fn test_non_looping_ticker_stops_after_firing() {
        let mut t = Ticker::new(0.5, true);
        t.set_looping(false);
        assert!(t.update(0.5));
        assert!(!t.is_running());
    }
}

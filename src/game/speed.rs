//! Wall Speed Profiles
//!
//! A speed value that can accelerate, clamp and bounce between bounds.
//! Used for both the radial speed and the angular (curve) speed of walls.

use serde::{Serialize, Deserialize};

/// Speed with optional acceleration and ping-pong bounds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedData {
    /// Current speed
    pub speed: f32,
    /// Change of speed per frame
    pub accel: f32,
    /// Lower clamp
    pub min: f32,
    /// Upper clamp
    pub max: f32,
    /// Reverse acceleration when a bound is hit
    pub ping_pong: bool,
}

impl Default for SpeedData {
    fn default() -> Self {
        Self::constant(0.0)
    }
}

impl SpeedData {
    /// Constant speed with no acceleration.
    pub const fn constant(speed: f32) -> Self {
        Self {
            speed,
            accel: 0.0,
            min: 0.0,
            max: 0.0,
            ping_pong: false,
        }
    }

    /// Accelerating speed clamped to `[min, max]`.
    pub const fn accelerating(speed: f32, accel: f32, min: f32, max: f32, ping_pong: bool) -> Self {
        Self {
            speed,
            accel,
            min,
            max,
            ping_pong,
        }
    }

    /// Advance by one tick of `ft` frames.
    pub fn update(&mut self, ft: f32) {
        if self.accel == 0.0 {
            return;
        }

        self.speed += self.accel * ft;

        if self.speed > self.max {
            self.speed = self.max;
            if self.ping_pong {
                self.accel = -self.accel;
            }
        } else if self.speed < self.min {
            self.speed = self.min;
            if self.ping_pong {
                self.accel = -self.accel;
            }
        }
    }
}

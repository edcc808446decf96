//! Core deterministic primitives.
//!
//! All types in this module are designed for bit-exact cross-platform
//! reproducibility. They form the foundation for replay verification.

pub mod math;
pub mod vec2;
pub mod geometry;
pub mod rng;
pub mod hash;

// Re-export core types
pub use vec2::Vec2;
pub use geometry::{
    Intersection, line_circle_intersection, line_circle_closest_intersection, point_in_polygon,
};
pub use rng::DeterministicRng;
pub use hash::{StateHash, compute_state_hash};

//! Core deterministic primitives.
//!
//! Geometry and randomness shared by every simulation module.

pub mod rect;
pub mod rng;
pub mod vec2;

// Re-export core types
pub use rect::Rect;
pub use rng::DeterministicRng;
pub use vec2::Vec2;

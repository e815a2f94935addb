//! # Maze Sim
//!
//! Deterministic simulation engine for a tile-based action maze game.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        MAZE SIM                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── vec2.rs     - 2D vector                                 │
//! │  ├── rect.rs     - Axis-aligned bounding boxes               │
//! │  └── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │                                                              │
//! │  game/           - Simulation (deterministic)                │
//! │  ├── entity.rs   - Shared entity record, directions, actions │
//! │  ├── tile.rs     - Terrain                                   │
//! │  ├── item.rs     - Static objects: pickups and traps         │
//! │  ├── trap.rs     - Trap state machines                       │
//! │  ├── character.rs- Mover state                               │
//! │  ├── player.rs   - Player, attack/dash, collision interpreter│
//! │  ├── enemy.rs    - Ghost AI                                  │
//! │  ├── grid.rs     - The maze: collision protocol, movement    │
//! │  ├── input.rs    - Per-tick input frames                     │
//! │  ├── events.rs   - Observable outputs                        │
//! │  ├── tick.rs     - Frame pipeline and replay                 │
//! │  └── visual.rs   - Animation frame selection                 │
//! │                                                              │
//! │  level.rs        - Level-file parsing                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The simulation never reads system time or ambient randomness: all
//! randomness comes from the seeded Xorshift128+ generator, container
//! iteration uses BTreeMap, and the tick pipeline runs in a fixed phase
//! order. Given the same level, seed, delta and input frames, a replay
//! produces the identical state and event stream.

#![warn(clippy::all)]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod level;

pub use crate::core::rect::Rect;
pub use crate::core::rng::DeterministicRng;
pub use crate::core::vec2::Vec2;
pub use crate::game::entity::{CollisionAction, Direction, Entity, EntityId, SoundCue};
pub use crate::game::events::GameEvent;
pub use crate::game::grid::{ConfigError, Grid};
pub use crate::game::input::InputFrame;
pub use crate::game::tick::{run_level, tick, LevelOutcome, TickResult};
pub use crate::level::{LevelData, LevelError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Seconds of damage immunity an entity gets after every hit.
pub const DAMAGE_IMMUNITY_WINDOW: f32 = 0.25;

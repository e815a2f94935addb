//! Character Movement State
//!
//! Shared by the player and enemies: current speed, facing, and the
//! animation-facing "moving" flag. Actual movement goes through the grid,
//! which owns collision resolution; this record only tracks the
//! movement-related state a mover carries around.

use serde::{Deserialize, Serialize};

use crate::game::entity::Direction;

/// The moving flag stays up this long after the last move attempt, so
/// walk animations don't stutter at tile boundaries.
const MOVING_FLAG_PERSIST: f32 = 0.3;

/// Movement state carried by every mover.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Character {
    /// Tiles per second
    pub speed: f32,
    /// Current facing, updated on every move attempt even when blocked
    pub direction: Direction,
    /// Seconds since the last move attempt
    last_move_delta: f32,
    moving: bool,
}

impl Character {
    /// A stationary mover with the given speed and initial facing.
    pub fn new(speed: f32, direction: Direction) -> Self {
        Self {
            speed,
            direction,
            last_move_delta: MOVING_FLAG_PERSIST + 1.0,
            moving: false,
        }
    }

    /// Advance the movement clock, dropping the moving flag once stale.
    pub fn update(&mut self, delta: f32) {
        self.last_move_delta += delta;
        if self.last_move_delta > MOVING_FLAG_PERSIST {
            self.moving = false;
        }
    }

    /// Record a move attempt: face the direction and refresh the moving flag.
    pub fn record_move(&mut self, direction: Direction) {
        self.direction = direction;
        self.moving = true;
        self.last_move_delta = 0.0;
    }

    /// Whether a move attempt happened recently (drives walk animation).
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.moving
    }
}

//! Player Input
//!
//! One [`InputFrame`] per tick: the movement intent held this frame plus the
//! one-shot dash and attack intents. Frames are plain data, so input
//! sequences can be recorded, serialized and replayed byte for byte.

use serde::{Deserialize, Serialize};

use crate::game::entity::Direction;

/// The input intents held for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Held movement direction, if any
    pub direction: Option<Direction>,
    /// Dash was pressed this frame
    pub dash: bool,
    /// Attack was pressed this frame
    pub attack: bool,
}

impl InputFrame {
    /// A frame with nothing pressed.
    pub const fn idle() -> Self {
        Self {
            direction: None,
            dash: false,
            attack: false,
        }
    }

    /// A frame holding only a movement direction.
    pub const fn walk(direction: Direction) -> Self {
        Self {
            direction: Some(direction),
            dash: false,
            attack: false,
        }
    }

    /// Add a dash press to this frame.
    pub const fn with_dash(mut self) -> Self {
        self.dash = true;
        self
    }

    /// Add an attack press to this frame.
    pub const fn with_attack(mut self) -> Self {
        self.attack = true;
        self
    }
}

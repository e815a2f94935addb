//! Game Events
//!
//! Everything observable that happens during a tick is reported as a
//! [`GameEvent`]. The simulation itself never renders or plays audio; a
//! front end drains the event list from each [`TickResult`](crate::game::tick::TickResult)
//! and reacts. Events are emitted in the order they occur within the tick,
//! which is deterministic.

use serde::{Deserialize, Serialize};

use crate::game::entity::{EntityId, SoundCue};

/// One observable thing that happened during a tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A sound effect should play
    Sound(SoundCue),
    /// An entity was damaged
    DamageTaken {
        entity: EntityId,
        amount: f32,
        remaining: f32,
    },
    /// An entity was destroyed and pruned from the grid
    EntityDestroyed { entity: EntityId },
    /// The player picked up the key
    KeyCollected,
    /// The player collected a heart
    HeartCollected { health: f32 },
    /// The player collected the light
    LightCollected,
    /// The player touched the exit while holding the key
    VictoryReached,
    /// The player was pinned in place
    PlayerStuck { duration: f32 },
    /// Timed spikes extended at the given cell
    SpikesExtended { cell: (i32, i32) },
    /// Trigger spikes were armed by a touch
    TrapTriggered { cell: (i32, i32) },
    /// A ghost noticed the player and started chasing
    GhostEngaged { entity: EntityId },
    /// The player dashed, covering the given distance
    PlayerDashed { distance: f32 },
    /// The player started an attack swing
    PlayerAttacked,
    /// The player's health reached zero
    GameOver,
}

impl GameEvent {
    /// The sound cue carried by this event, if it is one.
    pub fn sound(&self) -> Option<SoundCue> {
        match self {
            GameEvent::Sound(cue) => Some(*cue),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sound_accessor() {
        assert_eq!(
            GameEvent::Sound(SoundCue::Dash).sound(),
            Some(SoundCue::Dash)
        );
        assert_eq!(GameEvent::KeyCollected.sound(), None);
    }

    #[test]
    fn test_events_serialize_round_trip() {
        let events = vec![
            GameEvent::DamageTaken {
                entity: EntityId(7),
                amount: 1.0,
                remaining: 4.0,
            },
            GameEvent::SpikesExtended { cell: (3, 2) },
            GameEvent::VictoryReached,
        ];
        let json = serde_json::to_string(&events).unwrap();
        let back: Vec<GameEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(events, back);
    }
}

//! Trap State Machines
//!
//! Traps are static objects with time-driven behavior. Each variant here
//! holds only its own clocks and flags; the shared [`Entity`] record is owned
//! by the static-object wrapper and passed in where a trap needs to flip its
//! walkability.
//!
//! All clocks advance by the frame delta, so trap cadence is identical for
//! any tick rate.

use serde::{Deserialize, Serialize};

use tracing::debug;

use crate::game::entity::{CollisionAction, Entity, SoundCue};
use crate::game::events::GameEvent;

/// Spike sounds only play when the player is close enough to hear them.
const EARSHOT_RADIUS: f32 = 4.0;

const SPIKE_ACTIONS: &[CollisionAction] = &[CollisionAction::Stuck, CollisionAction::TakeDamage];

// ---------------------------------------------------------------------------
// Fire
// ---------------------------------------------------------------------------

/// Always-walkable flame that burns anyone standing in it, once per second.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FireTrap {
    time_since_last_damage: f32,
    animation_time: f32,
}

impl FireTrap {
    /// Damage per burn.
    pub const DAMAGE: f32 = 1.0;
    /// Seconds between burns of the same victim.
    pub const DAMAGE_COOLDOWN: f32 = 1.0;

    /// A flame ready to burn on first contact.
    pub fn new() -> Self {
        Self {
            // Ready to burn on first contact
            time_since_last_damage: Self::DAMAGE_COOLDOWN + 1.0,
            animation_time: 0.0,
        }
    }

    /// Advance the burn cooldown and animation.
    pub fn update(&mut self, delta: f32) {
        self.time_since_last_damage += delta;
        self.animation_time += delta;
    }

    /// Touch effects. The burn cooldown is consumed when damage is handed out.
    pub fn collision_actions(&mut self) -> Option<&'static [CollisionAction]> {
        if self.time_since_last_damage > Self::DAMAGE_COOLDOWN {
            self.time_since_last_damage = 0.0;
            Some(&[CollisionAction::TakeDamage])
        } else {
            None
        }
    }

    /// Animation clock.
    #[inline]
    pub fn animation_time(&self) -> f32 {
        self.animation_time
    }
}

impl Default for FireTrap {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Timed spikes
// ---------------------------------------------------------------------------

/// Spikes on a fixed loop: retracted for 4 seconds, extended for 2.
///
/// Walkability always matches the retracted flag; the extension transition
/// happens inside `update`, so between ticks the pair cannot disagree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimedSpikes {
    retracted: bool,
    animation_time: f32,
    time_since_last_damage: f32,
}

impl TimedSpikes {
    /// Damage per hit.
    pub const DAMAGE: f32 = 1.0;
    /// Seconds spent retracted each cycle.
    pub const RETRACTED_TIME: f32 = 4.0;
    /// Seconds spent extended each cycle.
    pub const OUT_TIME: f32 = 2.0;
    /// Four retract-animation frames at 0.075s each
    pub const SPIKE_IN_ANIM: f32 = 0.3;
    /// One hit per extension: out time plus the retract animation
    pub const DAMAGE_COOLDOWN: f32 = Self::OUT_TIME + Self::SPIKE_IN_ANIM;

    /// Spikes placed retracted start mid-phase so that banks of them placed
    /// together don't all fire in lockstep with the extended ones.
    pub fn new(retracted: bool) -> Self {
        let animation_time = if retracted {
            (Self::RETRACTED_TIME - Self::OUT_TIME) / 2.0
        } else {
            0.0
        };
        Self {
            retracted,
            animation_time,
            time_since_last_damage: Self::DAMAGE_COOLDOWN + 1.0,
        }
    }

    /// Whether the spikes are currently retracted (and the cell walkable).
    #[inline]
    pub fn is_retracted(&self) -> bool {
        self.retracted
    }

    /// Advance the cycle, flipping the entity's walkability on transitions.
    pub fn update(
        &mut self,
        entity: &mut Entity,
        delta: f32,
        player_distance: f32,
        events: &mut Vec<GameEvent>,
    ) {
        self.animation_time += delta;
        self.time_since_last_damage += delta;

        if self.retracted {
            if self.animation_time > Self::RETRACTED_TIME {
                self.retracted = false;
                entity.set_walkable(false);
                self.animation_time = 0.0;
                if player_distance < EARSHOT_RADIUS {
                    events.push(GameEvent::Sound(SoundCue::SpikesTrigger));
                }
                events.push(GameEvent::SpikesExtended {
                    cell: cell_of(entity),
                });
            }
        } else if self.animation_time > Self::OUT_TIME {
            self.retracted = true;
            entity.set_walkable(true);
            self.animation_time = 0.0;
        }
    }

    /// Touch effects: pin and hurt, once per extension, only while out.
    pub fn collision_actions(&mut self) -> Option<&'static [CollisionAction]> {
        if !self.retracted && self.time_since_last_damage > Self::DAMAGE_COOLDOWN {
            self.time_since_last_damage = 0.0;
            Some(SPIKE_ACTIONS)
        } else {
            None
        }
    }

    /// How long a victim stays pinned: the rest of the extension phase plus a
    /// short tail, never less than 0.3s.
    pub fn stuck_duration(&self) -> f32 {
        if self.retracted {
            0.0
        } else {
            (Self::OUT_TIME - self.animation_time + 0.2).max(0.3)
        }
    }

    /// Animation clock (resets on every extend/retract transition).
    #[inline]
    pub fn animation_time(&self) -> f32 {
        self.animation_time
    }
}

// ---------------------------------------------------------------------------
// Trigger spikes
// ---------------------------------------------------------------------------

/// Pressure-plate spikes. A touch while retracted arms them; they extend
/// 0.4 seconds later, punishing whoever lingers, and retract on their own.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TriggerSpikes {
    retracted: bool,
    triggered: bool,
    /// Seconds since the trap was last armed
    trigger_time: f32,
    animation_time: f32,
    time_since_last_damage: f32,
}

impl TriggerSpikes {
    /// Damage per hit.
    pub const DAMAGE: f32 = 1.0;
    /// Delay between arming and the spikes coming out
    pub const TRIGGER_DELAY: f32 = 0.4;
    /// Minimum time armed before retracting again (plus retract animation)
    pub const RETRACT_TIME: f32 = 2.0;
    /// Minimum time between consecutive armings
    pub const TRIGGER_COOLDOWN: f32 = 3.0;
    /// Four retract-animation frames at 0.1s each
    pub const SPIKE_IN_ANIM: f32 = 0.4;
    /// One hit per extension: the armed time plus the retract animation.
    pub const DAMAGE_COOLDOWN: f32 = Self::RETRACT_TIME + Self::SPIKE_IN_ANIM;
    const RETRACT_THRESHOLD: f32 = Self::RETRACT_TIME + 0.3;

    /// A plate in its resting state, ready to arm on first touch.
    pub fn new() -> Self {
        Self {
            retracted: true,
            triggered: false,
            // Allow arming on first contact
            trigger_time: Self::TRIGGER_COOLDOWN + 1.0,
            animation_time: 0.0,
            time_since_last_damage: Self::DAMAGE_COOLDOWN + 1.0,
        }
    }

    /// Whether the spikes are currently retracted (and the cell walkable).
    #[inline]
    pub fn is_retracted(&self) -> bool {
        self.retracted
    }

    /// Whether the plate is armed and counting down to extension.
    #[inline]
    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Advance the trigger countdown, extending and retracting on schedule.
    pub fn update(
        &mut self,
        entity: &mut Entity,
        delta: f32,
        player_distance: f32,
        events: &mut Vec<GameEvent>,
    ) {
        self.trigger_time += delta;
        self.animation_time += delta;
        self.time_since_last_damage += delta;

        if self.retracted && self.triggered && self.trigger_time > Self::TRIGGER_DELAY {
            self.retracted = false;
            entity.set_walkable(false);
            self.animation_time = 0.0;
            if player_distance < EARSHOT_RADIUS {
                events.push(GameEvent::Sound(SoundCue::SpikesTrigger));
            }
            events.push(GameEvent::SpikesExtended {
                cell: cell_of(entity),
            });
        } else if !self.retracted && self.trigger_time > Self::RETRACT_THRESHOLD {
            self.retracted = true;
            self.triggered = false;
            entity.set_walkable(true);
            self.animation_time = 0.0;
        }
    }

    /// Touch effects. A touch while retracted arms the plate (no damage yet);
    /// a touch while out pins and hurts, once per extension.
    pub fn collision_actions(
        &mut self,
        entity: &Entity,
        events: &mut Vec<GameEvent>,
    ) -> Option<&'static [CollisionAction]> {
        if self.retracted {
            if self.trigger_time > Self::TRIGGER_COOLDOWN {
                self.triggered = true;
                self.trigger_time = 0.0;
                debug!(entity = %entity.id, "trigger spikes armed");
                events.push(GameEvent::TrapTriggered {
                    cell: cell_of(entity),
                });
            }
            None
        } else if self.time_since_last_damage > Self::DAMAGE_COOLDOWN
            && self.trigger_time > Self::TRIGGER_DELAY
        {
            self.time_since_last_damage = 0.0;
            Some(SPIKE_ACTIONS)
        } else {
            None
        }
    }

    /// How long a victim stays pinned: the rest of the armed window plus a
    /// short tail, never less than half a second.
    pub fn stuck_duration(&self) -> f32 {
        (Self::RETRACT_TIME - self.trigger_time + 0.2).max(0.5)
    }

    /// Animation clock (resets on every extend/retract transition).
    #[inline]
    pub fn animation_time(&self) -> f32 {
        self.animation_time
    }
}

impl Default for TriggerSpikes {
    fn default() -> Self {
        Self::new()
    }
}

fn cell_of(entity: &Entity) -> (i32, i32) {
    let p = entity.position();
    (p.x.floor() as i32, p.y.floor() as i32)
}

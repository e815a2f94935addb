//! Static Objects
//!
//! Everything that occupies a single cell without moving: pickups (key,
//! heart, light) and traps. [`StaticObject`] pairs the shared entity record
//! with a per-kind payload and dispatches behavior over it; the trap state
//! machines themselves live in [`crate::game::trap`].

use serde::{Deserialize, Serialize};

use crate::core::rect::Rect;
use crate::core::vec2::Vec2;
use crate::game::entity::{BoxSpec, CollisionAction, Entity, EntityId, SoundCue};
use crate::game::events::GameEvent;
use crate::game::trap::{FireTrap, TimedSpikes, TriggerSpikes};

/// Static objects leave margin around their sprite so characters can brush
/// past without touching.
const STATIC_BOX_W_FACTOR: f32 = 0.7;
const STATIC_BOX_H_FACTOR: f32 = 0.8;
const STATIC_BOX_H_OFFSET: f32 = 0.1;

/// Per-kind payload of a static object.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum StaticKind {
    /// Opens the exit door
    Key,
    /// Restores one health when collected
    Health { collected: bool },
    /// Collectible light source
    Lighting,
    /// Always-walkable flame
    Fire(FireTrap),
    /// Spikes on a fixed cycle
    TimedSpikes(TimedSpikes),
    /// Pressure-plate spikes
    TriggerSpikes(TriggerSpikes),
}

/// A single-cell, non-moving object: a pickup or a trap.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StaticObject {
    /// Behavior payload
    pub kind: StaticKind,
    /// Shared entity record
    pub entity: Entity,
}

impl StaticObject {
    fn with_kind(id: EntityId, kind: StaticKind, cell: (i32, i32)) -> Self {
        let walkable = match &kind {
            StaticKind::TimedSpikes(spikes) => spikes.is_retracted(),
            // Fire, trigger spikes (start retracted) and pickups are all open
            _ => true,
        };
        let entity = Entity::new(
            id,
            1.0,
            1.0,
            Vec2::from_cell(cell.0, cell.1),
            BoxSpec::shrunk(
                1.0,
                STATIC_BOX_W_FACTOR,
                STATIC_BOX_H_FACTOR,
                STATIC_BOX_H_OFFSET,
            ),
            walkable,
            f32::MAX,
        );
        Self { kind, entity }
    }

    /// The exit key.
    pub fn key(id: EntityId, cell: (i32, i32)) -> Self {
        Self::with_kind(id, StaticKind::Key, cell)
    }

    /// An uncollected heart.
    pub fn health(id: EntityId, cell: (i32, i32)) -> Self {
        Self::with_kind(id, StaticKind::Health { collected: false }, cell)
    }

    /// A collectible light.
    pub fn lighting(id: EntityId, cell: (i32, i32)) -> Self {
        Self::with_kind(id, StaticKind::Lighting, cell)
    }

    /// A fire trap, ready to burn.
    pub fn fire(id: EntityId, cell: (i32, i32)) -> Self {
        Self::with_kind(id, StaticKind::Fire(FireTrap::new()), cell)
    }

    /// Timed spikes, starting retracted or extended.
    pub fn timed_spikes(id: EntityId, cell: (i32, i32), retracted: bool) -> Self {
        Self::with_kind(id, StaticKind::TimedSpikes(TimedSpikes::new(retracted)), cell)
    }

    /// Trigger spikes, starting retracted and unarmed.
    pub fn trigger_spikes(id: EntityId, cell: (i32, i32)) -> Self {
        Self::with_kind(id, StaticKind::TriggerSpikes(TriggerSpikes::new()), cell)
    }

    /// This object's entity id.
    #[inline]
    pub fn id(&self) -> EntityId {
        self.entity.id
    }

    /// Whether characters may stand on this object's cell.
    #[inline]
    pub fn is_walkable(&self) -> bool {
        self.entity.is_walkable()
    }

    /// Whether this object has been destroyed (collected).
    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.entity.is_destroyed()
    }

    /// Current bounding box.
    #[inline]
    pub fn bounding_box(&self) -> &Rect {
        self.entity.bounding_box()
    }

    /// Advance trap clocks. `player_distance` gates earshot-only sounds.
    pub fn update(&mut self, delta: f32, player_distance: f32, events: &mut Vec<GameEvent>) {
        self.entity.update(delta);
        match &mut self.kind {
            StaticKind::Fire(fire) => fire.update(delta),
            StaticKind::TimedSpikes(spikes) => {
                spikes.update(&mut self.entity, delta, player_distance, events)
            }
            StaticKind::TriggerSpikes(spikes) => {
                spikes.update(&mut self.entity, delta, player_distance, events)
            }
            _ => {}
        }
    }

    /// Effects of touching this object right now. Trap cooldowns are consumed
    /// by this call, so the caller must act on the returned actions.
    pub fn collision_actions(
        &mut self,
        events: &mut Vec<GameEvent>,
    ) -> Option<&'static [CollisionAction]> {
        match &mut self.kind {
            StaticKind::Key => Some(&[CollisionAction::PickUp]),
            StaticKind::Health { .. } => Some(&[CollisionAction::HeartUp]),
            StaticKind::Lighting => Some(&[CollisionAction::LightOn]),
            StaticKind::Fire(fire) => fire.collision_actions(),
            StaticKind::TimedSpikes(spikes) => spikes.collision_actions(),
            StaticKind::TriggerSpikes(spikes) => spikes.collision_actions(&self.entity, events),
        }
    }

    /// Damage dealt to whoever this object's `TakeDamage` action hits.
    pub fn damage_done(&self) -> f32 {
        match &self.kind {
            StaticKind::Fire(_) => FireTrap::DAMAGE,
            StaticKind::TimedSpikes(_) => TimedSpikes::DAMAGE,
            StaticKind::TriggerSpikes(_) => TriggerSpikes::DAMAGE,
            _ => 0.0,
        }
    }

    /// Pin duration applied by this object's `Stuck` action.
    pub fn stuck_duration(&self) -> f32 {
        match &self.kind {
            StaticKind::TimedSpikes(spikes) => spikes.stuck_duration(),
            StaticKind::TriggerSpikes(spikes) => spikes.stuck_duration(),
            _ => 0.0,
        }
    }

    /// Sound accompanying this object's damage, if any.
    pub fn contact_sound(&self) -> Option<SoundCue> {
        match &self.kind {
            StaticKind::Fire(_) => Some(SoundCue::FireCrackle),
            _ => None,
        }
    }
}

//! Entity Model
//!
//! Shared state for everything that lives in the maze: tiles, static objects,
//! enemies and the player all embed an [`Entity`] record and layer their own
//! behavior on top. Polymorphic dispatch happens at the grid/player boundary
//! through per-variant enums instead of an inheritance hierarchy.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::rect::Rect;
use crate::core::vec2::Vec2;
use crate::DAMAGE_IMMUNITY_WINDOW;

/// Unique entity identifier, allocated by the grid at construction time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The four discrete movement/facing directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Positive y
    Up,
    /// Negative y
    Down,
    /// Negative x
    Left,
    /// Positive x
    Right,
}

impl Direction {
    /// All directions, in a fixed order (used for random picks and probing).
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Offset a position by `distance` along this direction (one axis only).
    #[inline]
    pub fn step(self, position: Vec2, distance: f32) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(position.x, position.y + distance),
            Direction::Down => Vec2::new(position.x, position.y - distance),
            Direction::Left => Vec2::new(position.x - distance, position.y),
            Direction::Right => Vec2::new(position.x + distance, position.y),
        }
    }
}

/// Declarative effect tags an entity emits when touched.
///
/// The player's collision interpreter reads these; the emitting entity
/// supplies the associated values (damage done, stuck duration, sound).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionAction {
    /// Apply the entity's `damage_done()` to the toucher
    TakeDamage,
    /// Collect the key
    PickUp,
    /// Gain one health
    HeartUp,
    /// Reach the exit (victory if the key is held)
    Exit,
    /// Pin the toucher in place for the entity's `stuck_duration()`
    Stuck,
    /// Collect the light
    LightOn,
}

/// Sound effect references handed to the audio collaborator.
///
/// The simulation never plays audio; it only names the cue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    /// The player dashed
    Dash,
    /// The player swung
    Attack,
    /// A ghost touched the player
    GhostContact,
    /// A ghost noticed the player
    GhostBreath,
    /// Fire burned the player
    FireCrackle,
    /// Spikes came out nearby
    SpikesTrigger,
    /// The key was collected
    KeyPickup,
    /// The exit unlocked
    DoorsOpen,
    /// A heart was collected
    HeartCollect,
    /// The light was collected
    LightSwitch,
}

/// Per-type bounding-box shape: factors shrink the box relative to the
/// entity's nominal size, offsets move it off the bottom-left corner.
///
/// Invariant: factor in (0, 1], so the box stays inside the nominal cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxSpec {
    /// Fraction of the entity width the box covers
    pub w_factor: f32,
    /// X offset of the box from the entity position
    pub w_offset: f32,
    /// Fraction of the entity height the box covers
    pub h_factor: f32,
    /// Y offset of the box from the entity position
    pub h_offset: f32,
}

impl BoxSpec {
    /// Box exactly matching the entity's nominal size.
    pub const FULL: Self = Self {
        w_factor: 1.0,
        w_offset: 0.0,
        h_factor: 1.0,
        h_offset: 0.0,
    };

    /// Symmetric shrink: the width factor is centered, the height offset is
    /// explicit (most entities want leeway at the bottom of the sprite).
    pub fn shrunk(width: f32, w_factor: f32, h_factor: f32, h_offset: f32) -> Self {
        Self {
            w_factor,
            w_offset: (1.0 - w_factor) / 2.0 * width,
            h_factor,
            h_offset,
        }
    }

    /// The bounding box for an entity of the given size at `position`.
    #[inline]
    pub fn rect_at(&self, position: Vec2, width: f32, height: f32) -> Rect {
        Rect::new(
            position.x + self.w_offset,
            position.y + self.h_offset,
            width * self.w_factor,
            height * self.h_factor,
        )
    }
}

/// Shared state embedded in every game object.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Entity {
    /// Unique id
    pub id: EntityId,
    /// Nominal width in tile units
    pub width: f32,
    /// Nominal height in tile units
    pub height: f32,
    /// Bottom-left position
    position: Vec2,
    /// Current bounding box, recomputed on every position change
    bounding_box: Rect,
    /// Bounding-box shape for this entity type
    box_spec: BoxSpec,
    /// Whether other entities may occupy this one's space
    walkable: bool,
    destroyed: bool,
    health: f32,
    /// Seconds since this entity last took damage (drives the immunity window)
    time_since_damage: f32,
}

impl Entity {
    /// Create a new entity and compute its initial bounding box.
    pub fn new(
        id: EntityId,
        width: f32,
        height: f32,
        position: Vec2,
        box_spec: BoxSpec,
        walkable: bool,
        health: f32,
    ) -> Self {
        let bounding_box = box_spec.rect_at(position, width, height);
        Self {
            id,
            width,
            height,
            position,
            bounding_box,
            box_spec,
            walkable,
            destroyed: false,
            health,
            time_since_damage: f32::MAX,
        }
    }

    /// Advance the damage-immunity clock.
    pub fn update(&mut self, delta: f32) {
        // Saturate instead of overflowing to infinity on long-lived entities
        if self.time_since_damage < f32::MAX / 2.0 {
            self.time_since_damage += delta;
        }
    }

    /// Current position.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Move the entity and recompute its bounding box.
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
        self.bounding_box = self.box_spec.rect_at(self.position, self.width, self.height);
    }

    /// Current bounding box.
    #[inline]
    pub fn bounding_box(&self) -> &Rect {
        &self.bounding_box
    }

    /// The bounding box this entity would have at another position.
    ///
    /// Used as the candidate box when testing move feasibility.
    #[inline]
    pub fn box_at(&self, x: f32, y: f32) -> Rect {
        self.box_spec.rect_at(Vec2::new(x, y), self.width, self.height)
    }

    /// Whether other entities may share this one's space.
    #[inline]
    pub fn is_walkable(&self) -> bool {
        self.walkable
    }

    /// Change walkability (spikes do this as they extend and retract).
    pub fn set_walkable(&mut self, walkable: bool) {
        self.walkable = walkable;
    }

    /// Whether this entity has been destroyed.
    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Mark this entity destroyed. It becomes inert and gets pruned from its
    /// container at the end of the tick.
    pub fn destroy(&mut self) {
        self.destroyed = true;
        debug!(entity = %self.id, "entity destroyed");
    }

    /// Current health.
    #[inline]
    pub fn health(&self) -> f32 {
        self.health
    }

    /// Set health directly, bypassing the immunity window (heart pickups).
    pub fn set_health(&mut self, health: f32) {
        self.health = health;
    }

    /// Apply damage, honoring the per-entity immunity window.
    ///
    /// A second hit within [`DAMAGE_IMMUNITY_WINDOW`] of the previous one is a
    /// no-op, as is any hit on a destroyed entity. Returns whether the damage
    /// was applied.
    pub fn take_damage(&mut self, damage: f32) -> bool {
        if self.destroyed || self.time_since_damage <= DAMAGE_IMMUNITY_WINDOW {
            return false;
        }
        self.health -= damage;
        self.time_since_damage = 0.0;
        debug!(
            entity = %self.id,
            damage,
            remaining = self.health,
            "entity took damage"
        );
        if self.health <= 0.0 {
            self.destroy();
        }
        true
    }
}

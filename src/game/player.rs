//! Player
//!
//! Player state (health, collected flags, attack and dash clocks) plus the
//! two pieces of logic that belong to the player rather than the grid: the
//! attack reach geometry and the collision-action interpreter that turns
//! touch effects emitted by tiles, statics and enemies into player state
//! changes.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::rect::Rect;
use crate::core::vec2::Vec2;
use crate::game::character::Character;
use crate::game::entity::{BoxSpec, CollisionAction, Direction, Entity, EntityId, SoundCue};
use crate::game::enemy::Enemy;
use crate::game::events::GameEvent;
use crate::game::grid::Grid;
use crate::game::item::{StaticKind, StaticObject};
use crate::game::tile::Tile;

/// Nominal sprite width in tile units.
pub const PLAYER_WIDTH: f32 = 0.75;
/// Nominal sprite height in tile units.
pub const PLAYER_HEIGHT: f32 = PLAYER_WIDTH * 2.0;
/// Walking speed in tiles per second.
pub const PLAYER_SPEED: f32 = 4.0;
/// Health at the start of a level.
pub const STARTING_HEALTH: f32 = 5.0;

/// A swing lasts this long in total.
pub const ATTACK_DURATION: f32 = 0.4;
/// Damage only lands during the first part of the swing.
const ATTACK_DAMAGE_WINDOW: f32 = 0.3;
/// Damage a swing deals inside its damage window.
pub const ATTACK_DAMAGE: f32 = 1.0;

/// Distance a full dash covers, in tiles.
pub const DASH_DISTANCE: f32 = 2.0;
/// How long the dash animation plays after a full dash.
pub const DASH_DURATION: f32 = 0.15;
/// Time after a dash before the next one is allowed.
pub const DASH_COOLDOWN: f32 = 1.0;
/// The dash path is swept in this many sub-steps so a wall mid-path stops it
/// at the wall rather than at the far side.
const DASH_STEPS: u32 = 20;

const BOX_W_FACTOR: f32 = 0.88;
const BOX_H_FACTOR: f32 = 0.5;

fn player_box_spec() -> BoxSpec {
    BoxSpec::shrunk(
        PLAYER_WIDTH,
        BOX_W_FACTOR,
        BOX_H_FACTOR,
        PLAYER_HEIGHT * 0.05,
    )
}

/// The player character.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    /// Shared entity record
    pub entity: Entity,
    /// Movement state
    pub character: Character,
    animation_time: f32,
    /// Seconds the player remains pinned; movement is refused while positive
    stuck_duration: f32,
    /// Seconds since the last hit, drives the bleed overlay
    bleeding_time: f32,

    dash_time: f32,
    dashing: bool,

    attacking: bool,
    attack_time: f32,
    attack_bounding_box: Rect,

    key_collected: bool,
    light_collected: bool,
    victory: bool,
}

impl Player {
    /// A fresh player at the given position, full health, nothing collected.
    pub fn new(id: EntityId, position: Vec2) -> Self {
        let entity = Entity::new(
            id,
            PLAYER_WIDTH,
            PLAYER_HEIGHT,
            position,
            player_box_spec(),
            false,
            STARTING_HEALTH,
        );
        Self {
            entity,
            character: Character::new(PLAYER_SPEED, Direction::Down),
            animation_time: 0.0,
            stuck_duration: 0.0,
            bleeding_time: f32::MAX,
            dash_time: DASH_COOLDOWN + 1.0,
            dashing: false,
            attacking: false,
            attack_time: 0.0,
            attack_bounding_box: Rect::EMPTY,
            key_collected: false,
            light_collected: false,
            victory: false,
        }
    }

    /// Advance all players clocks for this frame.
    pub fn update(&mut self, delta: f32) {
        self.entity.update(delta);
        self.character.update(delta);
        self.animation_time += delta;
        self.dash_time += delta;
        if self.bleeding_time < f32::MAX / 2.0 {
            self.bleeding_time += delta;
        }
        if self.stuck_duration > 0.0 {
            self.stuck_duration -= delta;
        }
        if self.dashing && self.dash_time > DASH_DURATION {
            self.dashing = false;
        }
        if self.attacking {
            self.attack_time += delta;
        }
    }

    /// Start a swing. No-op while one is already in progress.
    pub fn attack(&mut self, events: &mut Vec<GameEvent>) {
        if self.attacking {
            return;
        }
        self.attacking = true;
        self.attack_time = 0.0;
        self.animation_time = 0.0;
        self.update_attack_bounding_box();
        events.push(GameEvent::Sound(SoundCue::Attack));
        events.push(GameEvent::PlayerAttacked);
    }

    /// End the swing once it has run its full duration.
    pub fn end_attack_if_done(&mut self) {
        if self.attacking && self.attack_time > ATTACK_DURATION {
            self.attacking = false;
            self.attack_bounding_box = Rect::EMPTY;
        }
    }

    /// Damage the current swing deals. Zero during the follow-through.
    pub fn damage_done(&self) -> f32 {
        if self.attack_time < ATTACK_DAMAGE_WINDOW {
            ATTACK_DAMAGE
        } else {
            0.0
        }
    }

    /// Recompute the swing's reach from the current bounding box. The reach
    /// extends past the body on the facing side and is padded asymmetrically
    /// so the swing arc feels generous without hitting behind the player.
    pub fn update_attack_bounding_box(&mut self) {
        let body = *self.entity.bounding_box();
        let mut b = body;
        match self.character.direction {
            Direction::Up => {
                b.y = body.y + body.h * 0.4;
                b.w = body.w * 1.3;
                b.x = body.x - b.w * 0.1;
            }
            Direction::Down => {
                b.y = body.y - body.h * 0.3;
                b.w = body.w * 1.3;
                b.x = body.x - b.w * 0.2;
            }
            Direction::Left => {
                b.x = body.x - body.w * 0.5;
                b.h = body.h * 1.3;
                b.y = body.y - b.h * 0.2;
            }
            Direction::Right => {
                b.x = body.x + body.w * 0.4;
                b.h = body.h * 1.3;
                b.y = body.y - b.h * 0.2;
            }
        }
        self.attack_bounding_box = b;
    }

    /// Whether a swing is in progress.
    #[inline]
    pub fn is_attacking(&self) -> bool {
        self.attacking
    }

    /// The current swing's reach ([`Rect::EMPTY`] outside a swing).
    #[inline]
    pub fn attack_bounding_box(&self) -> &Rect {
        &self.attack_bounding_box
    }

    /// Whether the dash animation is playing.
    #[inline]
    pub fn is_dashing(&self) -> bool {
        self.dashing
    }

    /// Whether spikes currently pin the player in place.
    #[inline]
    pub fn is_stuck_in_trap(&self) -> bool {
        self.stuck_duration > 0.0
    }

    /// Whether the key has been collected.
    #[inline]
    pub fn has_key(&self) -> bool {
        self.key_collected
    }

    /// Whether the light has been collected.
    #[inline]
    pub fn has_light(&self) -> bool {
        self.light_collected
    }

    /// Whether the exit has been reached with the key.
    #[inline]
    pub fn has_won(&self) -> bool {
        self.victory
    }

    /// Animation clock (resets on facing changes and swings).
    #[inline]
    pub fn animation_time(&self) -> f32 {
        self.animation_time
    }

    /// Seconds since the player last took a hit.
    #[inline]
    pub fn bleeding_time(&self) -> f32 {
        self.bleeding_time
    }
}

/// Walk one axis-aligned step. Facing updates even when the step is refused;
/// being pinned or mid-dash refuses outright. Returns whether the player
/// actually moved.
pub fn move_player(grid: &mut Grid, direction: Direction, delta: f32) -> bool {
    if grid.player().is_stuck_in_trap() || grid.player().is_dashing() {
        return false;
    }
    let previous = grid.player().character.direction;
    let moved = grid.move_player_step(direction, delta);
    if moved {
        let player = grid.player_mut();
        if previous != direction {
            player.animation_time = 0.0;
        }
        if player.attacking {
            player.update_attack_bounding_box();
        }
    }
    moved
}

/// Dash: a swept burst of up to two tiles in the facing direction. The dash
/// swings the weapon and sweeps the attack box along the whole path, so
/// anything in the corridor gets hit. Stops at the first blocked sub-step.
pub fn dash(grid: &mut Grid) {
    if grid.player().is_stuck_in_trap() || grid.player().dash_time <= DASH_COOLDOWN {
        return;
    }

    grid.player_attack_start();
    grid.push_event(GameEvent::Sound(SoundCue::Dash));

    let direction = grid.player().character.direction;
    let step = DASH_DISTANCE / DASH_STEPS as f32;
    let mut moved = 0.0;

    for _ in 0..DASH_STEPS {
        let pos = grid.player().entity.position();
        let next = direction.step(pos, step);
        let stepped = grid.attempt_move_player(next.x, next.y);
        if stepped {
            grid.player_mut().entity.set_position(next.x, next.y);
            moved += step;
        }
        grid.player_mut().update_attack_bounding_box();
        grid.player_attack_sweep();
        if !stepped {
            break;
        }
    }

    if moved > 0.0 {
        let player = grid.player_mut();
        player.dashing = true;
        // A cut-short dash ends (and cools down) proportionally sooner
        player.dash_time = if moved >= DASH_DISTANCE {
            0.0
        } else {
            DASH_DURATION * (1.0 - moved / DASH_DISTANCE)
        };
        player.character.record_move(direction);
        grid.push_event(GameEvent::PlayerDashed { distance: moved });
    }
}

/// A mutable view of whatever the player is touching, for the collision
/// interpreter below.
pub enum CollisionTarget<'a> {
    /// A terrain tile
    Tile(&'a mut Tile),
    /// A pickup or trap
    Static(&'a mut StaticObject),
    /// A ghost
    Enemy(&'a mut Enemy),
}

impl CollisionTarget<'_> {
    fn collision_actions(
        &mut self,
        events: &mut Vec<GameEvent>,
    ) -> Option<&'static [CollisionAction]> {
        match self {
            CollisionTarget::Tile(tile) => tile.collision_actions(),
            CollisionTarget::Static(object) => object.collision_actions(events),
            CollisionTarget::Enemy(enemy) => enemy.collision_actions(),
        }
    }

    fn damage_done(&self) -> f32 {
        match self {
            CollisionTarget::Tile(_) => 0.0,
            CollisionTarget::Static(object) => object.damage_done(),
            CollisionTarget::Enemy(enemy) => enemy.damage_done(),
        }
    }

    fn stuck_duration(&self) -> f32 {
        match self {
            CollisionTarget::Static(object) => object.stuck_duration(),
            _ => 0.0,
        }
    }

    fn contact_sound(&self) -> Option<SoundCue> {
        match self {
            CollisionTarget::Tile(_) => None,
            CollisionTarget::Static(object) => object.contact_sound(),
            CollisionTarget::Enemy(enemy) => enemy.contact_sound(),
        }
    }
}

/// Apply the touch effects of one target to the player. Each action the
/// target emits right now is interpreted exactly once; repeat-contact
/// throttling lives in the targets' own cooldowns.
pub fn resolve_collision(
    player: &mut Player,
    mut target: CollisionTarget<'_>,
    events: &mut Vec<GameEvent>,
) {
    let Some(actions) = target.collision_actions(events) else {
        return;
    };
    for action in actions {
        match action {
            CollisionAction::TakeDamage => {
                let applied = player.entity.take_damage(target.damage_done());
                // The hit registers even inside the immunity window: the
                // bleed overlay restarts and the contact sound plays
                player.bleeding_time = 0.0;
                if let Some(cue) = target.contact_sound() {
                    events.push(GameEvent::Sound(cue));
                }
                if applied {
                    events.push(GameEvent::DamageTaken {
                        entity: player.entity.id,
                        amount: target.damage_done(),
                        remaining: player.entity.health(),
                    });
                }
            }
            CollisionAction::Stuck => {
                let duration = target.stuck_duration();
                if duration > 0.0 {
                    player.stuck_duration = duration;
                    debug!(duration, "player pinned");
                    events.push(GameEvent::PlayerStuck { duration });
                }
            }
            CollisionAction::PickUp => {
                if !player.key_collected {
                    if let CollisionTarget::Static(object) = &mut target {
                        player.key_collected = true;
                        object.entity.destroy();
                        events.push(GameEvent::Sound(SoundCue::KeyPickup));
                        events.push(GameEvent::Sound(SoundCue::DoorsOpen));
                        events.push(GameEvent::KeyCollected);
                    }
                }
            }
            CollisionAction::HeartUp => {
                if let CollisionTarget::Static(object) = &mut target {
                    if let StaticKind::Health { collected } = &mut object.kind {
                        if !*collected {
                            *collected = true;
                            let health = (player.entity.health() + 1.0).max(0.0);
                            player.entity.set_health(health);
                            object.entity.destroy();
                            events.push(GameEvent::Sound(SoundCue::HeartCollect));
                            events.push(GameEvent::HeartCollected { health });
                        }
                    }
                }
            }
            CollisionAction::LightOn => {
                if !player.light_collected {
                    if let CollisionTarget::Static(object) = &mut target {
                        player.light_collected = true;
                        object.entity.destroy();
                        events.push(GameEvent::Sound(SoundCue::LightSwitch));
                        events.push(GameEvent::LightCollected);
                    }
                }
            }
            CollisionAction::Exit => {
                if player.key_collected && !player.victory {
                    player.victory = true;
                    events.push(GameEvent::VictoryReached);
                }
            }
        }
    }
}

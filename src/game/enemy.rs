//! Enemies
//!
//! The ghost is the only mobile enemy. It drifts through walls (its own cell
//! is always walkable and it ignores blockage while chasing), wanders
//! randomly when the player is far, and beelines at the player once they come
//! within engagement range. Each ghost carries its own seeded rng so replays
//! stay deterministic regardless of spawn order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::rng::DeterministicRng;
use crate::core::vec2::Vec2;
use crate::game::character::Character;
use crate::game::entity::{BoxSpec, CollisionAction, Direction, Entity, EntityId, SoundCue};
use crate::game::events::GameEvent;
use crate::game::grid::Grid;

/// Distance at which a ghost notices the player and gives chase.
pub const ENGAGE_RADIUS: f32 = 4.0;
/// Seconds between random direction changes while wandering.
const DIRECTION_CHANGE_INTERVAL: f32 = 1.75;
/// A ghost hurts the player at most once per this many seconds of contact.
const CONTACT_COOLDOWN: f32 = 2.0;
/// Minimum quiet time before the engage sound plays again.
const ENGAGE_SOUND_COOLDOWN: f32 = 5.0;

const GHOST_SPEED: f32 = 0.75;
const GHOST_HEALTH: f32 = 1.0;

/// A ghost: the mobile enemy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Enemy {
    /// Shared entity record
    pub entity: Entity,
    /// Movement state
    pub character: Character,
    animation_time: f32,
    /// Seconds since this ghost last hurt the player
    time_since_contact: f32,
    time_since_direction_change: f32,
    time_since_engage: f32,
    engaged: bool,
    rng: DeterministicRng,
}

impl Enemy {
    /// Spawn a ghost at the given cell. The seed drives only this ghost's
    /// wander decisions.
    pub fn ghost(id: EntityId, cell: (i32, i32), seed: u64) -> Self {
        let entity = Entity::new(
            id,
            1.0,
            1.0,
            Vec2::from_cell(cell.0, cell.1),
            // Small box centered in the sprite
            BoxSpec {
                w_factor: 0.6,
                w_offset: 0.2,
                h_factor: 0.6,
                h_offset: 0.2,
            },
            // Other movers pass straight through a ghost
            true,
            GHOST_HEALTH,
        );
        Self {
            entity,
            character: Character::new(GHOST_SPEED, Direction::Down),
            animation_time: 0.0,
            time_since_contact: CONTACT_COOLDOWN + 1.0,
            time_since_direction_change: 0.0,
            time_since_engage: ENGAGE_SOUND_COOLDOWN + 1.0,
            engaged: false,
            rng: DeterministicRng::new(seed),
        }
    }

    /// Advance this ghost's clocks for the frame.
    pub fn update(&mut self, delta: f32) {
        self.entity.update(delta);
        self.character.update(delta);
        self.animation_time += delta;
        self.time_since_contact += delta;
        self.time_since_direction_change += delta;
        self.time_since_engage += delta;
    }

    /// Touch effects. Contact hurts at most once per cooldown; the timer only
    /// resets when the action is actually handed out.
    pub fn collision_actions(&mut self) -> Option<&'static [CollisionAction]> {
        if !self.entity.is_destroyed() && self.time_since_contact > CONTACT_COOLDOWN {
            self.time_since_contact = 0.0;
            Some(&[CollisionAction::TakeDamage])
        } else {
            None
        }
    }

    /// Damage a contact deals to the player.
    pub fn damage_done(&self) -> f32 {
        1.0
    }

    /// Sound accompanying a contact.
    pub fn contact_sound(&self) -> Option<SoundCue> {
        Some(SoundCue::GhostContact)
    }

    /// Whether this ghost is currently chasing the player.
    #[inline]
    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Animation clock (resets on direction changes).
    #[inline]
    pub fn animation_time(&self) -> f32 {
        self.animation_time
    }
}

/// One AI step for the enemy at `idx`. Chases inside the engagement radius,
/// wanders outside it.
pub fn take_action(grid: &mut Grid, idx: usize, delta: f32) {
    if grid.enemy(idx).entity.is_destroyed() {
        return;
    }
    let player_pos = grid.player().entity.position();
    let pos = grid.enemy(idx).entity.position();

    if pos.distance(player_pos) < ENGAGE_RADIUS {
        let newly_engaged = !grid.enemy(idx).engaged;
        if newly_engaged {
            let id = {
                let enemy = grid.enemy_mut(idx);
                enemy.engaged = true;
                debug!(entity = %enemy.entity.id, "ghost engaged");
                enemy.entity.id
            };
            if grid.enemy(idx).time_since_engage > ENGAGE_SOUND_COOLDOWN {
                grid.push_event(GameEvent::Sound(SoundCue::GhostBreath));
            }
            grid.enemy_mut(idx).time_since_engage = 0.0;
            grid.push_event(GameEvent::GhostEngaged { entity: id });
        }
        chase(grid, idx, delta);
    } else {
        grid.enemy_mut(idx).engaged = false;
        wander(grid, idx, delta);
    }
}

/// Drift straight at the player, ignoring blockage. The move attempt is still
/// made so that passing over the player registers contact.
fn chase(grid: &mut Grid, idx: usize, delta: f32) {
    let player_pos = grid.player().entity.position();
    let enemy = grid.enemy(idx);
    let pos = enemy.entity.position();
    let speed = enemy.character.speed;

    let to_player = player_pos - pos;
    let distance = to_player.length();
    if distance <= f32::EPSILON {
        return;
    }
    let target = pos + to_player.scale(speed * delta / distance);

    let direction = if to_player.x.abs() > to_player.y.abs() {
        if to_player.x > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if to_player.y > 0.0 {
        Direction::Up
    } else {
        Direction::Down
    };
    grid.enemy_mut(idx).character.record_move(direction);

    // Contact side effects fire here; the position update is unconditional
    grid.attempt_move_enemy(idx, target.x, target.y);
    grid.enemy_mut(idx).entity.set_position(target.x, target.y);
}

/// Pick a fresh random direction every couple of seconds and amble along it.
/// A ghost boxed in on all four sides phases out through the nearest wall by
/// falling back to the chase move.
fn wander(grid: &mut Grid, idx: usize, delta: f32) {
    {
        let enemy = grid.enemy_mut(idx);
        if enemy.time_since_direction_change > DIRECTION_CHANGE_INTERVAL {
            enemy.time_since_direction_change = 0.0;
            let current = enemy.character.direction;
            let mut next = current;
            while next == current {
                next = Direction::ALL[enemy.rng.next_int(4) as usize];
            }
            enemy.character.direction = next;
            enemy.animation_time = 0.0;
        }
    }

    let direction = grid.enemy(idx).character.direction;
    if !grid.move_enemy(idx, direction, delta) && grid.enemy_is_stuck(idx, delta) {
        chase(grid, idx, delta);
    }
}

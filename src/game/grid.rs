//! The Maze Grid
//!
//! Owns every entity in a level and arbitrates all movement through the
//! collision protocol: a mover proposes a target position, the grid builds
//! the candidate bounding box, checks the (up to four) cells it covers plus
//! every mobile entity, applies touch side effects, and accepts or refuses
//! the move.
//!
//! Layouts are sparse cell-to-code maps; anything the layout leaves open is
//! filled with floor. [`Grid::generate`] additionally scatters pickups and
//! extra spikes over the open cells with the level rng, so a seed fully
//! determines the maze.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::core::rect::Rect;
use crate::core::rng::DeterministicRng;
use crate::core::vec2::Vec2;
use crate::game::enemy::Enemy;
use crate::game::entity::{Direction, EntityId};
use crate::game::events::GameEvent;
use crate::game::item::StaticObject;
use crate::game::player::{self, CollisionTarget, Player};
use crate::game::tile::{Tile, TileKind};

/// Scatter counts for [`Grid::generate`].
const DECOR_HEARTS: u32 = 3;
const DECOR_LIGHTS: u32 = 1;
const DECOR_SPIKES_RETRACTED: u32 = 2;
const DECOR_SPIKES_EXTENDED: u32 = 2;

/// Entry-point tiles spawn the player slightly off the cell corner so the
/// shrunken body box sits centered in the doorway.
const ENTRY_X_OFFSET: f32 = 0.125;

/// A layout the grid cannot be built from.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The layout names an object code the grid doesn't know
    #[error("unknown object code {code} at cell ({x}, {y})")]
    UnknownObjectCode { code: u8, x: i32, y: i32 },
    /// The layout places an object outside the grid
    #[error("cell ({x}, {y}) lies outside the {width}x{height} grid")]
    CellOutOfRange {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    /// Zero or negative dimensions
    #[error("grid dimensions must be positive, got {width}x{height}")]
    EmptyGrid { width: i32, height: i32 },
}

/// A reference to something a query box overlapped. Plain identifiers, so
/// collision queries stay side-effect free; callers look the entity up again
/// when they want to touch it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionRef {
    /// The tile at the given cell
    Tile { x: i32, y: i32 },
    /// The static object at the given cell
    Static { cell: (i32, i32) },
    /// The enemy at the given index
    Enemy { index: usize },
    /// The player
    Player,
}

/// The maze: every entity in a level, plus the collision protocol that
/// arbitrates all movement between them.
#[derive(Debug)]
pub struct Grid {
    width: i32,
    height: i32,
    level: u32,
    /// Row-major, exactly one tile per cell
    tiles: Vec<Tile>,
    statics: BTreeMap<(i32, i32), StaticObject>,
    enemies: Vec<Enemy>,
    player: Player,
    pending_events: Vec<GameEvent>,
}

impl Grid {
    /// Build a grid from an exact layout. Cells the layout leaves open become
    /// plain floor; nothing extra is placed.
    pub fn from_objects(
        width: i32,
        height: i32,
        objects: &BTreeMap<(i32, i32), u8>,
        level: u32,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::build(width, height, objects, level, seed, false)
    }

    /// Build a grid from a layout and scatter pickups and extra spikes over
    /// the open cells. This is how levels are normally instantiated.
    pub fn generate(
        width: i32,
        height: i32,
        objects: &BTreeMap<(i32, i32), u8>,
        level: u32,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::build(width, height, objects, level, seed, true)
    }

    fn build(
        width: i32,
        height: i32,
        objects: &BTreeMap<(i32, i32), u8>,
        level: u32,
        seed: u64,
        decorate: bool,
    ) -> Result<Self, ConfigError> {
        if width <= 0 || height <= 0 {
            return Err(ConfigError::EmptyGrid { width, height });
        }
        let mut rng = DeterministicRng::new(seed);
        let mut next_id = 0u32;
        let mut alloc = || {
            let id = EntityId(next_id);
            next_id += 1;
            id
        };

        let cells = (width as usize) * (height as usize);
        let mut tile_slots: Vec<Option<Tile>> = vec![None; cells];
        let mut statics: BTreeMap<(i32, i32), StaticObject> = BTreeMap::new();
        let mut enemies: Vec<Enemy> = Vec::new();
        let mut player_position = Vec2::new(1.0, 1.0);

        for (&(x, y), &code) in objects {
            if x < 0 || y < 0 || x >= width || y >= height {
                return Err(ConfigError::CellOutOfRange {
                    x,
                    y,
                    width,
                    height,
                });
            }
            let cell = (x, y);
            let slot = (y as usize) * (width as usize) + (x as usize);
            match code {
                0 => tile_slots[slot] = Some(Tile::new(alloc(), TileKind::Wall, cell)),
                1 => {
                    tile_slots[slot] = Some(Tile::new(alloc(), TileKind::EntryPoint, cell));
                    player_position = Vec2::new(x as f32 + ENTRY_X_OFFSET, y as f32);
                }
                2 => tile_slots[slot] = Some(Tile::new(alloc(), TileKind::Exit, cell)),
                3 => {
                    // Early levels only get fire; later ones mix in plates
                    let trap = if level >= 2 && rng.next_bool(0.5) {
                        StaticObject::trigger_spikes(alloc(), cell)
                    } else {
                        StaticObject::fire(alloc(), cell)
                    };
                    statics.insert(cell, trap);
                }
                4 => enemies.push(Enemy::ghost(alloc(), cell, rng.next_u64())),
                5 => {
                    statics.insert(cell, StaticObject::key(alloc(), cell));
                }
                6 => {
                    statics.insert(cell, StaticObject::health(alloc(), cell));
                }
                7 => {
                    statics.insert(cell, StaticObject::timed_spikes(alloc(), cell, true));
                }
                8 => {
                    statics.insert(cell, StaticObject::timed_spikes(alloc(), cell, false));
                }
                9 => {
                    statics.insert(cell, StaticObject::lighting(alloc(), cell));
                }
                code => return Err(ConfigError::UnknownObjectCode { code, x, y }),
            }
        }

        if decorate {
            let plan: [(u32, u8); 4] = [
                (DECOR_HEARTS, 6),
                (DECOR_LIGHTS, 9),
                (DECOR_SPIKES_RETRACTED, 7),
                (DECOR_SPIKES_EXTENDED, 8),
            ];
            'outer: for (count, code) in plan {
                for _ in 0..count {
                    let Some(cell) =
                        sample_open_cell(&mut rng, width, height, &tile_slots, &statics)
                    else {
                        break 'outer;
                    };
                    let object = match code {
                        6 => StaticObject::health(alloc(), cell),
                        9 => StaticObject::lighting(alloc(), cell),
                        7 => StaticObject::timed_spikes(alloc(), cell, true),
                        _ => StaticObject::timed_spikes(alloc(), cell, false),
                    };
                    statics.insert(cell, object);
                }
            }
        }

        // Everything still open becomes floor
        let mut tiles = Vec::with_capacity(cells);
        for (slot, maybe_tile) in tile_slots.into_iter().enumerate() {
            let cell = (
                (slot % width as usize) as i32,
                (slot / width as usize) as i32,
            );
            tiles.push(match maybe_tile {
                Some(tile) => tile,
                None => Tile::floor(alloc(), cell, level, &mut rng),
            });
        }

        let player = Player::new(alloc(), player_position);

        debug!(
            width,
            height,
            level,
            statics = statics.len(),
            enemies = enemies.len(),
            "grid built"
        );
        Ok(Self {
            width,
            height,
            level,
            tiles,
            statics,
            enemies,
            player,
            pending_events: Vec::new(),
        })
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// The level number this grid was built for.
    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// The player.
    #[inline]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The player, mutably.
    #[inline]
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// All live enemies.
    #[inline]
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// The enemy at `index`.
    #[inline]
    pub fn enemy(&self, index: usize) -> &Enemy {
        &self.enemies[index]
    }

    /// The enemy at `index`, mutably.
    #[inline]
    pub fn enemy_mut(&mut self, index: usize) -> &mut Enemy {
        &mut self.enemies[index]
    }

    /// All live static objects, keyed by cell.
    #[inline]
    pub fn statics(&self) -> &BTreeMap<(i32, i32), StaticObject> {
        &self.statics
    }

    /// The tile at `(x, y)`, if the cell is in range.
    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(&self.tiles[self.tile_index(x, y)])
    }

    #[inline]
    fn tile_index(&self, x: i32, y: i32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    #[inline]
    fn cell_in_range(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    #[inline]
    fn target_in_bounds(&self, x: f32, y: f32) -> bool {
        x >= 0.0 && x < self.width as f32 && y >= 0.0 && y < self.height as f32
    }

    /// Queue an event for this tick.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }

    /// Drain accumulated events, leaving the queue empty.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // -----------------------------------------------------------------------
    // Collision protocol
    // -----------------------------------------------------------------------

    /// Can the player stand at `(x, y)`? Touch side effects fire along the
    /// way: every overlapped tile, static and enemy gets to act on the player
    /// before its walkability is consulted, and the first unwalkable one
    /// refuses the move.
    pub fn attempt_move_player(&mut self, x: f32, y: f32) -> bool {
        if !self.target_in_bounds(x, y) {
            return false;
        }
        let candidate = self.player.entity.box_at(x, y);
        for (cx, cy) in candidate.corner_cells() {
            if !self.cell_in_range(cx, cy) {
                continue;
            }
            let idx = self.tile_index(cx, cy);
            if candidate.overlaps(self.tiles[idx].bounding_box()) {
                player::resolve_collision(
                    &mut self.player,
                    CollisionTarget::Tile(&mut self.tiles[idx]),
                    &mut self.pending_events,
                );
                if !self.tiles[idx].is_walkable() {
                    return false;
                }
            }
            if let Some(object) = self.statics.get_mut(&(cx, cy)) {
                if candidate.overlaps(object.bounding_box()) {
                    player::resolve_collision(
                        &mut self.player,
                        CollisionTarget::Static(object),
                        &mut self.pending_events,
                    );
                    if !object.is_walkable() {
                        return false;
                    }
                }
            }
        }
        for enemy in &mut self.enemies {
            if candidate.overlaps(enemy.entity.bounding_box()) {
                player::resolve_collision(
                    &mut self.player,
                    CollisionTarget::Enemy(enemy),
                    &mut self.pending_events,
                );
                if !enemy.entity.is_walkable() {
                    return false;
                }
            }
        }
        true
    }

    /// Can the enemy at `index` stand at `(x, y)`? Terrain and statics veto
    /// without side effects; walking over the player registers contact and
    /// always refuses, so a ghost never occupies the player's cell "legally"
    /// even though the chase move overrides the refusal.
    pub fn attempt_move_enemy(&mut self, index: usize, x: f32, y: f32) -> bool {
        if !self.target_in_bounds(x, y) {
            return false;
        }
        let candidate = self.enemies[index].entity.box_at(x, y);
        for (cx, cy) in candidate.corner_cells() {
            if !self.cell_in_range(cx, cy) {
                continue;
            }
            let tile = &self.tiles[self.tile_index(cx, cy)];
            if candidate.overlaps(tile.bounding_box()) && !tile.is_walkable() {
                return false;
            }
            if let Some(object) = self.statics.get(&(cx, cy)) {
                if candidate.overlaps(object.bounding_box()) && !object.is_walkable() {
                    return false;
                }
            }
        }
        for (i, other) in self.enemies.iter().enumerate() {
            if i != index
                && candidate.overlaps(other.entity.bounding_box())
                && !other.entity.is_walkable()
            {
                return false;
            }
        }
        if candidate.overlaps(self.player.entity.bounding_box()) {
            player::resolve_collision(
                &mut self.player,
                CollisionTarget::Enemy(&mut self.enemies[index]),
                &mut self.pending_events,
            );
            return false;
        }
        true
    }

    /// Everything overlapping `area`, except the entity with id `exclude`.
    /// Pure query: nothing is touched, so this is safe to call mid-iteration
    /// and from rendering code.
    pub fn get_collisions(&self, area: &Rect, exclude: EntityId) -> Vec<CollisionRef> {
        let mut hits = Vec::new();
        for (cx, cy) in area.corner_cells() {
            if !self.cell_in_range(cx, cy) {
                continue;
            }
            let tile = &self.tiles[self.tile_index(cx, cy)];
            if tile.id() != exclude && area.overlaps(tile.bounding_box()) {
                hits.push(CollisionRef::Tile { x: cx, y: cy });
            }
            if let Some(object) = self.statics.get(&(cx, cy)) {
                if object.id() != exclude && area.overlaps(object.bounding_box()) {
                    hits.push(CollisionRef::Static { cell: (cx, cy) });
                }
            }
        }
        for (index, enemy) in self.enemies.iter().enumerate() {
            if enemy.entity.id != exclude && area.overlaps(enemy.entity.bounding_box()) {
                hits.push(CollisionRef::Enemy { index });
            }
        }
        if self.player.entity.id != exclude && area.overlaps(self.player.entity.bounding_box()) {
            hits.push(CollisionRef::Player);
        }
        hits
    }

    // -----------------------------------------------------------------------
    // Movement
    // -----------------------------------------------------------------------

    /// One axis-aligned player step at walking speed. Facing and the moving
    /// flag update even when the step is refused.
    pub fn move_player_step(&mut self, direction: Direction, delta: f32) -> bool {
        let distance = self.player.character.speed * delta;
        self.player.character.record_move(direction);
        let target = direction.step(self.player.entity.position(), distance);
        if self.attempt_move_player(target.x, target.y) {
            self.player.entity.set_position(target.x, target.y);
            true
        } else {
            false
        }
    }

    /// One axis-aligned step for the enemy at `index`.
    pub fn move_enemy(&mut self, index: usize, direction: Direction, delta: f32) -> bool {
        let distance = self.enemies[index].character.speed * delta;
        self.enemies[index].character.record_move(direction);
        let target = direction.step(self.enemies[index].entity.position(), distance);
        if self.attempt_move_enemy(index, target.x, target.y) {
            self.enemies[index].entity.set_position(target.x, target.y);
            true
        } else {
            false
        }
    }

    /// Whether a one-step move attempt in every direction is refused for
    /// the enemy at `index`.
    pub fn enemy_is_stuck(&mut self, index: usize, delta: f32) -> bool {
        let distance = self.enemies[index].character.speed * delta;
        let position = self.enemies[index].entity.position();
        Direction::ALL.iter().all(|&direction| {
            let target = direction.step(position, distance);
            !self.attempt_move_enemy(index, target.x, target.y)
        })
    }

    // -----------------------------------------------------------------------
    // Combat and upkeep
    // -----------------------------------------------------------------------

    /// Start a player swing.
    pub fn player_attack_start(&mut self) {
        self.player.attack(&mut self.pending_events);
    }

    /// Apply the current swing to everything inside the attack box. Terrain
    /// shrugs it off; statics and enemies take the swing's current damage.
    pub fn player_attack_sweep(&mut self) {
        if !self.player.is_attacking() {
            return;
        }
        let area = *self.player.attack_bounding_box();
        let damage = self.player.damage_done();
        for hit in self.get_collisions(&area, self.player.entity.id) {
            let landed = match hit {
                CollisionRef::Static { cell } => self.statics.get_mut(&cell).and_then(|object| {
                    object
                        .entity
                        .take_damage(damage)
                        .then(|| (object.entity.id, object.entity.health()))
                }),
                CollisionRef::Enemy { index } => {
                    let entity = &mut self.enemies[index].entity;
                    entity.take_damage(damage).then(|| (entity.id, entity.health()))
                }
                CollisionRef::Tile { .. } | CollisionRef::Player => None,
            };
            if let Some((entity, remaining)) = landed {
                self.pending_events.push(GameEvent::DamageTaken {
                    entity,
                    amount: damage,
                    remaining,
                });
            }
        }
    }

    /// Touch pass: resolve everything currently overlapping the player's
    /// body, whether or not anyone moved this frame. Standing in fire burns.
    pub fn player_touch_sweep(&mut self) {
        let area = *self.player.entity.bounding_box();
        for hit in self.get_collisions(&area, self.player.entity.id) {
            match hit {
                CollisionRef::Tile { x, y } => {
                    let idx = self.tile_index(x, y);
                    player::resolve_collision(
                        &mut self.player,
                        CollisionTarget::Tile(&mut self.tiles[idx]),
                        &mut self.pending_events,
                    );
                }
                CollisionRef::Static { cell } => {
                    if let Some(object) = self.statics.get_mut(&cell) {
                        player::resolve_collision(
                            &mut self.player,
                            CollisionTarget::Static(object),
                            &mut self.pending_events,
                        );
                    }
                }
                CollisionRef::Enemy { index } => {
                    player::resolve_collision(
                        &mut self.player,
                        CollisionTarget::Enemy(&mut self.enemies[index]),
                        &mut self.pending_events,
                    );
                }
                CollisionRef::Player => {}
            }
        }
    }

    /// Advance every entity's clocks for this frame.
    pub fn update_timers(&mut self, delta: f32) {
        let player_position = self.player.entity.position();
        for object in self.statics.values_mut() {
            let distance = object.entity.position().distance(player_position);
            object.update(delta, distance, &mut self.pending_events);
        }
        for enemy in &mut self.enemies {
            enemy.update(delta);
        }
        self.player.update(delta);
    }

    /// Drop destroyed statics and enemies, reporting each removal.
    pub fn prune_destroyed(&mut self) {
        let events = &mut self.pending_events;
        self.statics.retain(|_, object| {
            if object.is_destroyed() {
                events.push(GameEvent::EntityDestroyed {
                    entity: object.id(),
                });
                false
            } else {
                true
            }
        });
        self.enemies.retain(|enemy| {
            if enemy.entity.is_destroyed() {
                events.push(GameEvent::EntityDestroyed {
                    entity: enemy.entity.id,
                });
                false
            } else {
                true
            }
        });
    }
}

/// Pick a uniformly random cell that has neither a tile nor a static object,
/// by rejection sampling. Returns `None` when the board has no open cell
/// left.
fn sample_open_cell(
    rng: &mut DeterministicRng,
    width: i32,
    height: i32,
    tile_slots: &[Option<Tile>],
    statics: &BTreeMap<(i32, i32), StaticObject>,
) -> Option<(i32, i32)> {
    let any_open = (0..height).any(|y| {
        (0..width).any(|x| {
            tile_slots[(y as usize) * (width as usize) + (x as usize)].is_none()
                && !statics.contains_key(&(x, y))
        })
    });
    if !any_open {
        return None;
    }
    loop {
        let x = rng.next_int(width as u32) as i32;
        let y = rng.next_int(height as u32) as i32;
        let slot = (y as usize) * (width as usize) + (x as usize);
        if tile_slots[slot].is_none() && !statics.contains_key(&(x, y)) {
            return Some((x, y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::item::StaticKind;

    /// 3x3 room: walls all around, entry in the middle.
    fn walled_cell() -> Grid {
        let mut objects = BTreeMap::new();
        for x in 0..3 {
            for y in 0..3 {
                objects.insert((x, y), if (x, y) == (1, 1) { 1 } else { 0 });
            }
        }
        Grid::from_objects(3, 3, &objects, 1, 42).unwrap()
    }

    #[test]
    fn test_entry_point_spawn_offset() {
        let grid = walled_cell();
        let pos = grid.player().entity.position();
        assert!((pos.x - 1.125).abs() < 1e-6);
        assert_eq!(pos.y, 1.0);
    }

    #[test]
    fn test_unknown_code_is_fatal() {
        let mut objects = BTreeMap::new();
        objects.insert((0, 0), 42u8);
        let err = Grid::from_objects(2, 2, &objects, 1, 0).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownObjectCode { code: 42, x: 0, y: 0 }
        ));
    }

    #[test]
    fn test_out_of_range_cell_is_fatal() {
        let mut objects = BTreeMap::new();
        objects.insert((0, 0), 1u8);
        objects.insert((5, 5), 0u8);
        let err = Grid::from_objects(2, 2, &objects, 1, 0).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::CellOutOfRange { x: 5, y: 5, .. }
        ));
    }

    #[test]
    fn test_walls_veto_all_directions() {
        let mut grid = walled_cell();
        for direction in Direction::ALL {
            assert!(
                !grid.move_player_step(direction, 0.1),
                "{direction:?} should be blocked"
            );
            // Facing updates even on refusal
            assert_eq!(grid.player().character.direction, direction);
        }
    }

    #[test]
    fn test_small_steps_move_within_room() {
        let mut grid = walled_cell();
        let before = grid.player().entity.position();
        assert!(grid.move_player_step(Direction::Up, 0.01));
        let after = grid.player().entity.position();
        assert!(after.y > before.y);
        assert_eq!(after.x, before.x);
    }

    #[test]
    fn test_out_of_bounds_is_refused() {
        let mut grid = walled_cell();
        assert!(!grid.attempt_move_player(-0.5, 1.0));
        assert!(!grid.attempt_move_player(1.0, 3.5));
    }

    #[test]
    fn test_key_then_exit_corridor() {
        // entry, key, exit in a row
        let mut objects = BTreeMap::new();
        objects.insert((0, 0), 1u8);
        objects.insert((1, 0), 5u8);
        objects.insert((2, 0), 2u8);
        let mut grid = Grid::from_objects(3, 1, &objects, 1, 7).unwrap();

        assert!(!grid.player().has_key());
        for _ in 0..10 {
            grid.move_player_step(Direction::Right, 0.1);
        }
        assert!(grid.player().has_key(), "walking the corridor collects the key");
        assert!(grid.player().has_won(), "reaching the exit with the key wins");
        let events = grid.take_events();
        assert!(events.contains(&GameEvent::KeyCollected));
        assert!(events.contains(&GameEvent::VictoryReached));
    }

    #[test]
    fn test_exit_refuses_without_key() {
        let mut objects = BTreeMap::new();
        objects.insert((0, 0), 1u8);
        objects.insert((2, 0), 2u8);
        let mut grid = Grid::from_objects(3, 1, &objects, 1, 7).unwrap();

        for _ in 0..10 {
            grid.move_player_step(Direction::Right, 0.1);
        }
        assert!(!grid.player().has_won());
        // The door is solid: the player is held short of the exit cell
        assert!(grid.player().entity.position().x < 2.0);
    }

    #[test]
    fn test_get_collisions_excludes_self_and_is_pure() {
        let mut objects = BTreeMap::new();
        objects.insert((0, 0), 1u8);
        objects.insert((1, 0), 5u8);
        let grid = Grid::from_objects(3, 1, &objects, 1, 7).unwrap();

        let player_id = grid.player().entity.id;
        // Covers the player's cell and the key's cell
        let area = Rect::new(0.5, 0.0, 1.4, 0.9);
        let hits = grid.get_collisions(&area, player_id);
        assert!(!hits.contains(&CollisionRef::Player));
        assert!(hits
            .iter()
            .any(|h| matches!(h, CollisionRef::Static { cell: (1, 0) })));
        // Pure query: the key is still there, unclaimed
        assert!(!grid.player().has_key());
        assert!(grid.statics().contains_key(&(1, 0)));
    }

    #[test]
    fn test_generate_is_seed_deterministic() {
        let mut objects = BTreeMap::new();
        objects.insert((0, 0), 1u8);
        for x in 0..8 {
            objects.insert((x, 3), 0u8);
        }
        let a = Grid::generate(8, 4, &objects, 2, 99).unwrap();
        let b = Grid::generate(8, 4, &objects, 2, 99).unwrap();

        let cells_a: Vec<_> = a.statics().keys().copied().collect();
        let cells_b: Vec<_> = b.statics().keys().copied().collect();
        assert_eq!(cells_a, cells_b);
        assert!(!cells_a.is_empty(), "decoration placed something");
    }

    #[test]
    fn test_generate_skips_decoration_when_full() {
        let mut objects = BTreeMap::new();
        for x in 0..2 {
            for y in 0..2 {
                objects.insert((x, y), 0u8);
            }
        }
        objects.insert((0, 0), 1u8);
        let grid = Grid::generate(2, 2, &objects, 1, 5).unwrap();
        assert!(grid.statics().is_empty());
    }

    #[test]
    fn test_trap_code_is_fire_on_level_one() {
        let mut objects = BTreeMap::new();
        objects.insert((0, 0), 1u8);
        objects.insert((1, 0), 3u8);
        let grid = Grid::from_objects(2, 1, &objects, 1, 0).unwrap();
        assert!(matches!(
            grid.statics().get(&(1, 0)).unwrap().kind,
            StaticKind::Fire(_)
        ));
    }

    #[test]
    fn test_prune_reports_removals() {
        let mut objects = BTreeMap::new();
        objects.insert((0, 0), 1u8);
        objects.insert((1, 0), 5u8);
        let mut grid = Grid::from_objects(2, 1, &objects, 1, 0).unwrap();

        let key_id = grid.statics().get(&(1, 0)).unwrap().id();
        grid.statics.get_mut(&(1, 0)).unwrap().entity.destroy();
        grid.prune_destroyed();

        assert!(grid.statics().is_empty());
        assert!(grid
            .take_events()
            .contains(&GameEvent::EntityDestroyed { entity: key_id }));
    }
}

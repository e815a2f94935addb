//! Maze Tiles
//!
//! One tile per grid cell. Tiles are indestructible terrain: walls block
//! movement, floors don't, the exit door blocks movement and emits the
//! exit action when touched.

use serde::{Deserialize, Serialize};

use crate::core::rect::Rect;
use crate::core::rng::DeterministicRng;
use crate::core::vec2::Vec2;
use crate::game::entity::{BoxSpec, CollisionAction, Entity, EntityId};

/// Tile bounding boxes are shrunk slightly so that a character hugging a wall
/// can still slide into an adjacent gap.
const TILE_BOX: BoxSpec = BoxSpec {
    w_factor: 0.9,
    w_offset: 0.05,
    h_factor: 0.9,
    h_offset: 0.05,
};

/// Number of grass floor variants available to the renderer.
const GRASS_VARIANTS: u8 = 3;

/// What a tile is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    /// Solid, unwalkable
    Wall,
    /// Overgrown floor, early levels. The variant only affects rendering.
    Grass { variant: u8 },
    /// Dungeon floor, later levels
    StoneFloor,
    /// Walkable floor marking the player spawn
    EntryPoint,
    /// The exit door, solid until victory
    Exit,
}

/// One cell of terrain.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tile {
    /// What this tile is
    pub kind: TileKind,
    entity: Entity,
}

impl Tile {
    /// A tile of the given kind at the given cell.
    pub fn new(id: EntityId, kind: TileKind, cell: (i32, i32)) -> Self {
        let walkable = !matches!(kind, TileKind::Wall | TileKind::Exit);
        let entity = Entity::new(
            id,
            1.0,
            1.0,
            Vec2::from_cell(cell.0, cell.1),
            TILE_BOX,
            walkable,
            f32::MAX,
        );
        Self { kind, entity }
    }

    /// The floor tile appropriate for the given level, gaps in the layout are
    /// filled with these. Grass picks a cosmetic variant from the level rng.
    pub fn floor(id: EntityId, cell: (i32, i32), level: u32, rng: &mut DeterministicRng) -> Self {
        let kind = if level >= 2 {
            TileKind::StoneFloor
        } else {
            TileKind::Grass {
                variant: rng.next_int(GRASS_VARIANTS as u32) as u8,
            }
        };
        Self::new(id, kind, cell)
    }

    /// This tile's entity id.
    #[inline]
    pub fn id(&self) -> EntityId {
        self.entity.id
    }

    /// Whether characters may stand on this tile.
    #[inline]
    pub fn is_walkable(&self) -> bool {
        self.entity.is_walkable()
    }

    /// This tile's bounding box.
    #[inline]
    pub fn bounding_box(&self) -> &Rect {
        self.entity.bounding_box()
    }

    /// Effects this tile has on a player touching it.
    pub fn collision_actions(&self) -> Option<&'static [CollisionAction]> {
        match self.kind {
            TileKind::Exit => Some(&[CollisionAction::Exit]),
            _ => None,
        }
    }

    /// Terrain shrugs off attacks.
    pub fn take_damage(&mut self, _damage: f32) -> bool {
        false
    }
}

//! Visual Frame Selection
//!
//! The simulation exposes just enough for a renderer: every animated entity
//! carries an animation clock, and this module maps (state, clock) to a
//! [`Frame`], a texture key plus frame index. The registry is plain data
//! built once and passed by reference wherever frames are resolved; nothing
//! here touches simulation state.

use serde::{Deserialize, Serialize};

use crate::game::enemy::Enemy;
use crate::game::entity::Direction;
use crate::game::item::{StaticKind, StaticObject};
use crate::game::player::Player;
use crate::game::tile::{Tile, TileKind};

/// Names a sprite sheet strip. The renderer owns the actual textures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextureKey {
    /// Player standing still, per facing
    PlayerIdle(Direction),
    /// Player walking, per facing
    PlayerWalk(Direction),
    /// Player swinging, per facing
    PlayerAttack(Direction),
    /// Ghost drifting, per facing
    GhostWalk(Direction),
    /// Fire trap flame
    Fire,
    /// Spikes extending or out
    SpikesOut,
    /// Spikes retracting or in
    SpikesIn,
    /// Heart pickup
    Heart,
    /// Exit key pickup
    Key,
    /// Light pickup
    Lightbulb,
    /// Wall tile
    Wall,
    /// Grass floor tile, by cosmetic variant
    Grass(u8),
    /// Stone floor tile
    StoneFloor,
    /// Spawn tile
    EntryPoint,
    /// Exit door tile
    ExitDoor,
}

/// One resolved animation frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Which strip to draw from
    pub key: TextureKey,
    /// Zero-based frame within the strip
    pub index: u32,
}

/// Timing for one animation strip.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationSpec {
    /// Frames in the strip
    pub frames: u32,
    /// Seconds each frame is held
    pub frame_duration: f32,
    /// Whether the strip wraps around or holds its last frame
    pub looping: bool,
}

impl AnimationSpec {
    const STILL: Self = Self {
        frames: 1,
        frame_duration: 1.0,
        looping: false,
    };

    /// Frame index for a given animation clock.
    fn index_at(&self, clock: f32) -> u32 {
        let raw = (clock / self.frame_duration).max(0.0) as u32;
        if self.looping {
            raw % self.frames
        } else {
            raw.min(self.frames - 1)
        }
    }
}

/// Frame timings for every strip. One instance is built at startup and
/// shared by reference.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnimationRegistry;

impl AnimationRegistry {
    /// The built-in timing table.
    pub fn standard() -> Self {
        Self
    }

    /// Timing for one strip. Keys without a moving strip get a single
    /// held frame.
    pub fn spec(&self, key: TextureKey) -> AnimationSpec {
        match key {
            TextureKey::PlayerWalk(_) => AnimationSpec {
                frames: 4,
                frame_duration: 0.1,
                looping: true,
            },
            TextureKey::PlayerAttack(_) => AnimationSpec {
                frames: 4,
                frame_duration: 0.1,
                looping: false,
            },
            TextureKey::GhostWalk(_) => AnimationSpec {
                frames: 3,
                frame_duration: 0.15,
                looping: true,
            },
            TextureKey::Fire => AnimationSpec {
                frames: 4,
                frame_duration: 0.1,
                looping: true,
            },
            TextureKey::SpikesOut => AnimationSpec {
                frames: 4,
                frame_duration: 0.1,
                looping: false,
            },
            TextureKey::SpikesIn => AnimationSpec {
                frames: 4,
                frame_duration: 0.075,
                looping: false,
            },
            _ => AnimationSpec::STILL,
        }
    }

    /// Resolve a frame from a strip and an animation clock.
    pub fn frame(&self, key: TextureKey, clock: f32) -> Frame {
        Frame {
            key,
            index: self.spec(key).index_at(clock),
        }
    }

    /// The player's current frame: attacking beats walking beats idle.
    pub fn player_frame(&self, player: &Player) -> Frame {
        let direction = player.character.direction;
        let key = if player.is_attacking() {
            TextureKey::PlayerAttack(direction)
        } else if player.character.is_moving() {
            TextureKey::PlayerWalk(direction)
        } else {
            TextureKey::PlayerIdle(direction)
        };
        self.frame(key, player.animation_time())
    }

    /// A ghost's current frame, facing its travel direction.
    pub fn enemy_frame(&self, enemy: &Enemy) -> Frame {
        self.frame(
            TextureKey::GhostWalk(enemy.character.direction),
            enemy.animation_time(),
        )
    }

    /// A placed object's current frame. Spikes switch strip when they
    /// retract.
    pub fn static_frame(&self, object: &StaticObject) -> Frame {
        match &object.kind {
            StaticKind::Key => self.frame(TextureKey::Key, 0.0),
            StaticKind::Health { .. } => self.frame(TextureKey::Heart, 0.0),
            StaticKind::Lighting => self.frame(TextureKey::Lightbulb, 0.0),
            StaticKind::Fire(fire) => self.frame(TextureKey::Fire, fire.animation_time()),
            StaticKind::TimedSpikes(spikes) => {
                let key = if spikes.is_retracted() {
                    TextureKey::SpikesIn
                } else {
                    TextureKey::SpikesOut
                };
                self.frame(key, spikes.animation_time())
            }
            StaticKind::TriggerSpikes(spikes) => {
                let key = if spikes.is_retracted() {
                    TextureKey::SpikesIn
                } else {
                    TextureKey::SpikesOut
                };
                self.frame(key, spikes.animation_time())
            }
        }
    }

    /// A tile's frame. Tiles never animate.
    pub fn tile_frame(&self, tile: &Tile) -> Frame {
        let key = match tile.kind {
            TileKind::Wall => TextureKey::Wall,
            TileKind::Grass { variant } => TextureKey::Grass(variant),
            TileKind::StoneFloor => TextureKey::StoneFloor,
            TileKind::EntryPoint => TextureKey::EntryPoint,
            TileKind::Exit => TextureKey::ExitDoor,
        };
        self.frame(key, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec2::Vec2;
    use crate::game::entity::EntityId;

    #[test]
    fn test_looping_and_clamped_indices() {
        let registry = AnimationRegistry::standard();

        // Fire loops: 4 frames at 0.1s
        assert_eq!(registry.frame(TextureKey::Fire, 0.05).index, 0);
        assert_eq!(registry.frame(TextureKey::Fire, 0.25).index, 2);
        assert_eq!(registry.frame(TextureKey::Fire, 0.45).index, 0);

        // Spikes-out clamps on the last frame
        assert_eq!(registry.frame(TextureKey::SpikesOut, 5.0).index, 3);
    }

    #[test]
    fn test_player_frame_priority() {
        let registry = AnimationRegistry::standard();
        let mut player = Player::new(EntityId(0), Vec2::new(1.0, 1.0));
        let mut events = Vec::new();

        assert!(matches!(
            registry.player_frame(&player).key,
            TextureKey::PlayerIdle(_)
        ));

        player.character.record_move(Direction::Left);
        assert_eq!(
            registry.player_frame(&player).key,
            TextureKey::PlayerWalk(Direction::Left)
        );

        player.attack(&mut events);
        assert_eq!(
            registry.player_frame(&player).key,
            TextureKey::PlayerAttack(Direction::Left)
        );
    }

    #[test]
    fn test_spike_frames_follow_state() {
        let registry = AnimationRegistry::standard();
        let retracted = StaticObject::timed_spikes(EntityId(1), (0, 0), true);
        let extended = StaticObject::timed_spikes(EntityId(2), (0, 0), false);

        assert_eq!(registry.static_frame(&retracted).key, TextureKey::SpikesIn);
        assert_eq!(registry.static_frame(&extended).key, TextureKey::SpikesOut);
    }
}

//! Game simulation: entities, the grid, and the per-frame update pipeline.

pub mod character;
pub mod enemy;
pub mod entity;
pub mod events;
pub mod grid;
pub mod input;
pub mod item;
pub mod player;
pub mod tick;
pub mod tile;
pub mod trap;
pub mod visual;
